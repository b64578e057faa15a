// core/src/timestamp.rs
use chrono::{TimeZone, Utc};

use crate::layout;

/// Klokkefelter fra en blokks `Page Time`-linje.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockStamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
}

fn field<T: std::str::FromStr>(stamp: &str, pos: (usize, usize)) -> Option<T> {
    layout::stamp_field(stamp, pos)?.trim().parse().ok()
}

/// Hent klokkefeltene fra stempel-linjen. Ren substring-uthenting på faste
/// posisjoner; `None` hvis linjen er for kort eller et felt ikke er et tall.
pub fn parse_clock_stamp(stamp: &str) -> Option<ClockStamp> {
    Some(ClockStamp {
        year: field(stamp, layout::STAMP_YEAR)?,
        month: field(stamp, layout::STAMP_MONTH)?,
        day: field(stamp, layout::STAMP_DAY)?,
        hour: field(stamp, layout::STAMP_HOUR)?,
        minute: field(stamp, layout::STAMP_MINUTE)?,
        second: field(stamp, layout::STAMP_SECOND)?,
        millis: field(stamp, layout::STAMP_MILLIS)?,
    })
}

/// Epoketid (UTC, sekunder med brøkdel) for blokkas første sample.
/// Kalenderfeltene konverteres via UTC uten tidssone/DST-justering;
/// `None` for umulige datoer.
pub fn block_epoch(stamp: &ClockStamp) -> Option<f64> {
    let dt = Utc
        .with_ymd_and_hms(
            stamp.year,
            stamp.month,
            stamp.day,
            stamp.hour,
            stamp.minute,
            stamp.second,
        )
        .single()?;
    Some(dt.timestamp() as f64 + f64::from(stamp.millis) / 1000.0)
}

/// Fyll tidsstempler for én blokk: sample `j` får `t0 + j/fs`.
/// Strengt stigende innen blokka; på tvers av blokker styrer blokkenes egne
/// klokkestempler, og monotoni re-valideres ikke her.
pub fn fill_block_timestamps(ts: &mut [f64], t0: f64, fs: f64) {
    for (j, slot) in ts.iter_mut().enumerate() {
        *slot = t0 + j as f64 / fs;
    }
}
