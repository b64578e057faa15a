use serde::Serialize;

use crate::error::{ReadError, ReadWarning};
use crate::layout::SAMPLES_PER_BLOCK;
use crate::windowing::WindowIndex;

/// Kalibrerings- og stream-metadata fra headeren.
///
/// `sampling_rate_hz` kan korrigeres nøyaktig én gang av blokkdekoderen
/// (`rate_mismatch_count` teller opp til 1 og blir stående); resten er
/// uforanderlig etter header-parsen. `max_block_sequence_seen` vedlikeholdes
/// av leseren underveis.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderInfo {
    pub sampling_rate_hz: f64,
    pub gain: [f64; 3],   // per akse (x, y, z)
    pub offset: [f64; 3], // per akse (x, y, z)
    pub volts: f64,
    pub lux: f64,
    pub declared_page_count: i64,
    pub max_block_sequence_seen: i64,
    pub rate_mismatch_count: u32,
}

impl HeaderInfo {
    /// Skala for lyskanalen (lux per volt-enhet).
    pub fn light_scale(&self) -> f64 {
        self.lux / self.volts
    }

    /// Øvre grense for antall samples i filen, fra deklarert sidetall.
    pub fn sample_capacity(&self) -> usize {
        self.declared_page_count.max(0) as usize * SAMPLES_PER_BLOCK
    }
}

/// Parallelle sample-arrays, indeksert på absolutt sampleposisjon.
///
/// Allokeres én gang fra deklarert sidetall før blokkløkka starter og skrives
/// på plass; dekoderen reallokerer aldri. `day_stop` er eksklusive grenser.
#[derive(Debug, Clone)]
pub struct SampleBuffers {
    /// Sekunder siden epoch (UTC), med brøkdel.
    pub timestamp: Vec<f64>,
    /// Kalibrert akselerasjon per sample (x, y, z).
    pub accel: Vec<[f64; 3]>,
    pub light: Vec<f64>,
    /// Blokk-granulær: samme verdi replikert over blokkas 300 samples.
    pub temperature: Vec<f64>,
    pub day_start: Vec<usize>,
    pub day_stop: Vec<usize>,
    /// Høyvannsmerke for faktisk dekodede samples.
    pub n_samples: usize,
}

impl SampleBuffers {
    pub fn allocate(capacity: usize, max_days: usize) -> Self {
        Self {
            timestamp: vec![0.0; capacity],
            accel: vec![[0.0; 3]; capacity],
            light: vec![0.0; capacity],
            temperature: vec![0.0; capacity],
            day_start: Vec::with_capacity(max_days),
            day_stop: Vec::with_capacity(max_days),
            n_samples: 0,
        }
    }

    /// Kutt arrayene ned til det som faktisk ble dekodet.
    pub fn truncate(&mut self) {
        let n = self.n_samples;
        self.timestamp.truncate(n);
        self.accel.truncate(n);
        self.light.truncate(n);
        self.temperature.truncate(n);
    }

    /// Antall avsluttede dager.
    pub fn day_count(&self) -> usize {
        self.day_stop.len()
    }
}

/// Alt som kommer ut av én fil.
///
/// Ved blokk-fatal feil er `error` satt og buffrene inneholder alt som rakk
/// å bli dekodet før feilen; header-feil gir aldri noe `Recording`.
#[derive(Debug)]
pub struct Recording {
    pub header: HeaderInfo,
    pub samples: SampleBuffers,
    pub windows: WindowIndex,
    pub warnings: Vec<ReadWarning>,
    pub error: Option<ReadError>,
}
