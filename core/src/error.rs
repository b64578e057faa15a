// core/src/error.rs
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Fatale feil fra dekodingen. Header-feil gir ingen delresultater; blokk-feil
/// stopper lesingen, men alt som er dekodet før blokka beholdes (se
/// `Recording::error`).
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("header line {line}: {reason}")]
    HeaderFormat { line: usize, reason: &'static str },

    #[error("block {block}: stream ended at the timestamp line")]
    MissingTimestamp { block: i64 },

    #[error("block {block}: truncated block ({got} of {expected} bytes)")]
    TruncatedBlock { block: i64, got: usize, expected: usize },

    #[error(
        "block {block}: sampling rate {block_hz} Hz differs from {header_hz} Hz \
         and the rate was already corrected once"
    )]
    SamplingRateMismatch { block: i64, block_hz: f64, header_hz: f64 },

    #[error("block {block}: unparseable clock stamp {stamp:?}")]
    BadTimestamp { block: i64, stamp: String },

    #[error("block {block}: {reason}")]
    BlockFormat { block: i64, reason: &'static str },

    #[error("block {block}: sequence number outside the declared page count {pages}")]
    SequenceOutOfRange { block: i64, pages: i64 },

    #[error("invalid window definition: base {base} h, period {period} h")]
    InvalidWindow { base: f64, period: f64 },
}

/// Ikke-fatale hendelser. Hver logges én gang og samles i
/// `Recording::warnings`; ingen delt meldingsbuffer på tvers av kall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReadWarning {
    /// Første gang en blokk oppgir en annen fs enn headeren: headeren
    /// korrigeres og dekodingen fortsetter. Neste avvik er fatalt.
    SamplingRateCorrected { block: i64, header_hz: f64, block_hz: f64 },
    /// Hull eller duplikat i sekvensnumrene; overhoppede områder i buffrene
    /// forblir nullfylt.
    SequenceGap { block: i64, expected: i64 },
    UnexpectedExtension { extension: String },
}

impl fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadWarning::SamplingRateCorrected { block, header_hz, block_hz } => write!(
                f,
                "block ({block}) fs [{block_hz:.2}] is not the same as header fs \
                 [{header_hz:.2}]; setting fs to block fs"
            ),
            ReadWarning::SequenceGap { block, expected } => write!(
                f,
                "block ({block}) does not follow expected sequence {expected}; \
                 skipped range stays zero-filled"
            ),
            ReadWarning::UnexpectedExtension { extension } => write!(
                f,
                "unexpected file extension {extension:?}; expected a GENEActiv .bin export"
            ),
        }
    }
}
