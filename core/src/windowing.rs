// core/src/windowing.rs
//
// Dag- og vindusindeksering: deler sample-strømmen inn i kalenderdøgn (UTC)
// og markerer start/stopp-indekser for brukerdefinerte analysevinduer
// (basetime + periode) per dag. Alt skjer inkrementelt, blokk for blokk;
// en dag som er lukket revideres aldri.

use serde::{Deserialize, Serialize};

use crate::error::ReadError;
use crate::models::SampleBuffers;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Default-kapasitet for dag-slots per fil.
pub const DEFAULT_MAX_DAYS: usize = 25;

/// Ett analysevindu: starter `base_hours` inn i døgnet og varer
/// `period_hours`. Vinduet kan krysse midnatt (base 20, periode 10 stopper
/// kl. 06 neste dag) og tilhører dagen det starter i.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowDef {
    pub base_hours: f64,
    pub period_hours: f64,
}

/// Validert, ordnet vindusliste. Overlappende definisjoner er tillatt; hver
/// definisjon indekseres uavhengig.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    windows: Vec<WindowDef>,
}

impl WindowSpec {
    /// Tom spesifikasjon: ingen vindusindeksering, kun dagranger.
    pub fn none() -> Self {
        Self { windows: Vec::new() }
    }

    /// Bygg fra (base, periode)-par og valider grensene.
    pub fn new(pairs: &[(f64, f64)]) -> Result<Self, ReadError> {
        let spec = Self {
            windows: pairs
                .iter()
                .map(|&(base, period)| WindowDef { base_hours: base, period_hours: period })
                .collect(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Krav: 0 <= base < 24 og 0 < periode <= 24. Brukes også etter
    /// deserialisering, som ellers går utenom `new`.
    pub fn validate(&self) -> Result<(), ReadError> {
        for w in &self.windows {
            let base_ok = (0.0..24.0).contains(&w.base_hours);
            let period_ok = w.period_hours > 0.0 && w.period_hours <= 24.0;
            if !base_ok || !period_ok {
                return Err(ReadError::InvalidWindow {
                    base: w.base_hours,
                    period: w.period_hours,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowDef> {
        self.windows.iter()
    }
}

/// Start/stopp-indekser per (dag, vindu)-slot. `None` i en av endene er
/// sentinelen "vinduet er ikke fullstendig dekket av data".
#[derive(Debug, Clone, Serialize)]
pub struct WindowIndex {
    n_windows: usize,
    max_days: usize,
    start: Vec<Option<usize>>,
    stop: Vec<Option<usize>>,
}

impl WindowIndex {
    pub fn allocate(n_windows: usize, max_days: usize) -> Self {
        Self {
            n_windows,
            max_days,
            start: vec![None; n_windows * max_days],
            stop: vec![None; n_windows * max_days],
        }
    }

    pub fn n_windows(&self) -> usize {
        self.n_windows
    }

    /// `Some((start, stop))` bare når begge grensene faktisk ble observert i
    /// datastrømmen. Stopp er eksklusiv.
    pub fn get(&self, day: usize, window: usize) -> Option<(usize, usize)> {
        if window >= self.n_windows || day >= self.max_days {
            return None;
        }
        let i = day * self.n_windows + window;
        match (self.start[i], self.stop[i]) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    fn set_start(&mut self, day: usize, window: usize, index: usize) {
        if day < self.max_days {
            self.start[day * self.n_windows + window] = Some(index);
        }
    }

    fn set_stop(&mut self, day: usize, window: usize, index: usize) {
        if day < self.max_days {
            self.stop[day * self.n_windows + window] = Some(index);
        }
    }
}

/// Dag-fase for en terskel i sekunder-av-døgn: øker med én hver gang
/// tidslinjen passerer terskelen.
fn phase(t: f64, threshold_sec: f64) -> i64 {
    ((t - threshold_sec) / SECONDS_PER_DAY).floor() as i64
}

#[derive(Debug, Clone, Copy)]
struct OpenWindow {
    day: usize,
    start_wall: f64,
}

/// Løpende tilstand for én vindusdefinisjon.
#[derive(Debug, Clone)]
struct WindowCursor {
    start_sec: f64,
    stop_sec: f64,
    period_sec: f64,
    start_phase: i64,
    stop_phase: i64,
    open: Option<OpenWindow>,
}

impl WindowCursor {
    fn new(def: &WindowDef) -> Self {
        let start_sec = def.base_hours * SECONDS_PER_HOUR;
        let stop_sec =
            (def.base_hours + def.period_hours).rem_euclid(24.0) * SECONDS_PER_HOUR;
        Self {
            start_sec,
            stop_sec,
            period_sec: def.period_hours * SECONDS_PER_HOUR,
            start_phase: 0,
            stop_phase: 0,
            open: None,
        }
    }

    fn reset_phases(&mut self, t: f64) {
        self.start_phase = phase(t, self.start_sec);
        self.stop_phase = phase(t, self.stop_sec);
    }
}

/// Inkrementell dag/vindus-indeksering over tidsordnede blokker.
///
/// Mates med én blokk om gangen (`index_block`) og avsluttes med `finalize`
/// når strømmen er ferdig; `SampleBuffers::day_start`/`day_stop` og
/// `WindowIndex` muteres på plass. Dag-slots utover `max_days` droppes stille.
#[derive(Debug)]
pub struct DayWindowIndexer {
    max_days: usize,
    started: bool,
    day: usize,
    prev_day_number: i64,
    last_t: f64,
    last_dt: f64,
    cursors: Vec<WindowCursor>,
}

impl DayWindowIndexer {
    pub fn new(spec: &WindowSpec, max_days: usize) -> Self {
        Self {
            max_days,
            started: false,
            day: 0,
            prev_day_number: 0,
            last_t: 0.0,
            last_dt: 0.0,
            cursors: spec.iter().map(WindowCursor::new).collect(),
        }
    }

    /// Indekser samples fra én blokk: `count` samples fra absolutt posisjon
    /// `offset`, med første sample ved epoketid `t0` og spacing `1/fs`.
    pub fn index_block(
        &mut self,
        fs: f64,
        t0: f64,
        offset: usize,
        count: usize,
        bufs: &mut SampleBuffers,
        index: &mut WindowIndex,
    ) {
        let dt = 1.0 / fs;
        self.last_dt = dt;

        for j in 0..count {
            let t = t0 + j as f64 * dt;
            let i = offset + j;
            let day_number = (t / SECONDS_PER_DAY).floor() as i64;

            if !self.started {
                self.started = true;
                self.day = 0;
                if self.max_days > 0 {
                    bufs.day_start.push(i);
                }
                // Virtuelt forrige sample rett før start: et vindu som
                // begynner nøyaktig på terskelen regnes dermed som krysset.
                for c in self.cursors.iter_mut() {
                    c.reset_phases(t - dt);
                }
            } else {
                if day_number != self.prev_day_number {
                    self.close_day(i, bufs);
                }
                if t - self.last_t > dt * 1.5 {
                    // Datagap: terskler som falt i hullet er ikke observert,
                    // og vinduer som sto åpne er ikke fullstendig dekket.
                    for c in self.cursors.iter_mut() {
                        c.reset_phases(t - dt);
                        c.open = None;
                    }
                }
            }
            self.prev_day_number = day_number;

            // Stopp håndteres før start slik at (base 0, periode 24)
            // fliser døgnet eksakt ved midnatt.
            for (w, c) in self.cursors.iter_mut().enumerate() {
                let stop_phase = phase(t, c.stop_sec);
                if stop_phase > c.stop_phase {
                    c.stop_phase = stop_phase;
                    if let Some(open) = c.open.take() {
                        index.set_stop(open.day, w, i);
                    }
                }
                let start_phase = phase(t, c.start_sec);
                if start_phase > c.start_phase {
                    c.start_phase = start_phase;
                    if self.day < self.max_days {
                        index.set_start(self.day, w, i);
                        c.open = Some(OpenWindow { day: self.day, start_wall: t });
                    }
                }
            }

            self.last_t = t;
        }
    }

    /// Lukk siste dag ved `n` (totalt antall samples) og avgjør skjebnen til
    /// vinduer som fortsatt står åpne: de lukkes ved `n` bare når dataene
    /// faktisk når vinduets nominelle slutt (innen ett sample-intervall);
    /// ellers beholder slotten sentinelen.
    pub fn finalize(&mut self, n: usize, bufs: &mut SampleBuffers, index: &mut WindowIndex) {
        if self.started
            && self.day < self.max_days
            && bufs.day_start.len() > bufs.day_stop.len()
        {
            bufs.day_stop.push(n);
        }
        for (w, c) in self.cursors.iter_mut().enumerate() {
            if let Some(open) = c.open.take() {
                let nominal_end = open.start_wall + c.period_sec;
                if self.last_t + self.last_dt >= nominal_end - 1e-9 {
                    index.set_stop(open.day, w, n);
                }
            }
        }
    }

    fn close_day(&mut self, i: usize, bufs: &mut SampleBuffers) {
        if self.day < self.max_days {
            bufs.day_stop.push(i);
        }
        self.day += 1;
        if self.day < self.max_days {
            bufs.day_start.push(i);
        }
    }
}
