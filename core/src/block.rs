// core/src/block.rs
use std::io::BufRead;

use crate::error::{ReadError, ReadWarning};
use crate::layout::{
    self, BLOCK_DATA_LINE, BLOCK_RATE_COLUMN, BLOCK_RATE_LINE, BLOCK_SEQUENCE_COLUMN,
    BLOCK_SEQUENCE_LINE, BLOCK_STAMP_LINE, BLOCK_TEMPERATURE_COLUMN, BLOCK_TEMPERATURE_LINE,
    DATA_LINE_LEN, SAMPLES_PER_BLOCK, STAMP_MAX_LEN,
};
use crate::models::{HeaderInfo, SampleBuffers};
use crate::timestamp;

/// Resultatet av én dekodet blokk: det orkestratoren trenger for å fylle
/// tidsstempler og kjøre dagindeksering etterpå.
#[derive(Debug)]
pub struct DecodedBlock {
    pub sequence: i64,
    /// Absolutt skriveposisjon: sekvensnummer × samples per blokk.
    pub offset: usize,
    /// Epoketid for blokkas første sample.
    pub t0: f64,
    pub warning: Option<ReadWarning>,
}

/// Dekod én blokk fra strømmen inn i buffrene. `Ok(None)` betyr ren EOF ved
/// blokkstart. Ingenting skrives til buffrene før datalinjen har passert
/// lengdesjekken, så en feilet blokk etterlater aldri halvskrevne samples.
pub fn read_block<R: BufRead>(
    reader: &mut R,
    header: &mut HeaderInfo,
    bufs: &mut SampleBuffers,
) -> Result<Option<DecodedBlock>, ReadError> {
    // Beste gjett på blokk-id før sekvenslinjen er lest (kun til feilmelding).
    let mut block = header.max_block_sequence_seen + 1;

    let mut line = String::new();
    let mut sequence = 0i64;
    let mut t0 = 0.0f64;
    let mut temperature = 0.0f64;
    let mut warning = None;

    for lineno in 1..BLOCK_DATA_LINE {
        line.clear();
        let got = reader.read_line(&mut line)?;
        if got == 0 {
            if lineno == 1 {
                return Ok(None); // ren EOF mellom blokker
            }
            if lineno == BLOCK_STAMP_LINE {
                return Err(ReadError::MissingTimestamp { block });
            }
            return Err(ReadError::TruncatedBlock { block, got: 0, expected: 1 });
        }

        match lineno {
            BLOCK_SEQUENCE_LINE => {
                let value = layout::column_value(&line, BLOCK_SEQUENCE_COLUMN)
                    .ok_or(ReadError::BlockFormat {
                        block,
                        reason: "sequence number failed to parse",
                    })?;
                sequence = value as i64;
                if sequence < 0 {
                    return Err(ReadError::BlockFormat {
                        block,
                        reason: "negative sequence number",
                    });
                }
                block = sequence;
                // Buffrene er dimensjonert fra deklarert sidetall; en blokk
                // utenfor ville skrevet forbi kapasiteten.
                if sequence >= header.declared_page_count {
                    return Err(ReadError::SequenceOutOfRange {
                        block,
                        pages: header.declared_page_count,
                    });
                }
            }
            BLOCK_STAMP_LINE => {
                let stamp: String = line
                    .trim_end_matches(|c| c == '\r' || c == '\n')
                    .chars()
                    .take(STAMP_MAX_LEN)
                    .collect();
                let clock = timestamp::parse_clock_stamp(&stamp)
                    .ok_or_else(|| ReadError::BadTimestamp { block, stamp: stamp.clone() })?;
                t0 = timestamp::block_epoch(&clock)
                    .ok_or(ReadError::BadTimestamp { block, stamp })?;
            }
            BLOCK_TEMPERATURE_LINE => {
                temperature = layout::column_value(&line, BLOCK_TEMPERATURE_COLUMN).ok_or(
                    ReadError::BlockFormat {
                        block,
                        reason: "temperature field failed to parse",
                    },
                )?;
            }
            BLOCK_RATE_LINE => {
                let block_hz = layout::column_value(&line, BLOCK_RATE_COLUMN).ok_or(
                    ReadError::BlockFormat {
                        block,
                        reason: "sampling rate field failed to parse",
                    },
                )?;
                if block_hz != header.sampling_rate_hz {
                    if header.rate_mismatch_count == 0 {
                        // Tolerer nøyaktig én stille korreksjon per fil.
                        header.rate_mismatch_count = 1;
                        let w = ReadWarning::SamplingRateCorrected {
                            block,
                            header_hz: header.sampling_rate_hz,
                            block_hz,
                        };
                        log::warn!("{w}");
                        header.sampling_rate_hz = block_hz;
                        warning = Some(w);
                    } else {
                        return Err(ReadError::SamplingRateMismatch {
                            block,
                            block_hz,
                            header_hz: header.sampling_rate_hz,
                        });
                    }
                }
            }
            _ => {} // metadata-linje uten felt vi trenger
        }
    }

    // Datalinjen: minst 3600 hex-tegn pluss terminator.
    line.clear();
    let got = reader.read_line(&mut line)?;
    if got < DATA_LINE_LEN + 1 {
        return Err(ReadError::TruncatedBlock { block, got, expected: DATA_LINE_LEN + 1 });
    }
    if !line.as_bytes()[..DATA_LINE_LEN].iter().all(|b| b.is_ascii_hexdigit()) {
        return Err(ReadError::BlockFormat { block, reason: "non-hex characters in data line" });
    }
    let data = &line[..DATA_LINE_LEN];

    // Alt validert: nå kan blokka skrives.
    let offset = sequence as usize * SAMPLES_PER_BLOCK;
    for slot in &mut bufs.temperature[offset..offset + SAMPLES_PER_BLOCK] {
        *slot = temperature;
    }

    let light_scale = header.light_scale();
    for s in 0..SAMPLES_PER_BLOCK {
        let group = &data[s * 12..(s + 1) * 12];
        let mut accel = [0.0f64; 3];
        for (axis, value) in accel.iter_mut().enumerate() {
            let raw = hex_field(group, axis * 3)
                .ok_or(ReadError::BlockFormat { block, reason: "non-hex characters in data line" })?;
            *value = (twos_complement(raw) as f64 * 100.0 - header.offset[axis])
                / header.gain[axis];
        }
        let light_raw = hex_field(group, 9)
            .ok_or(ReadError::BlockFormat { block, reason: "non-hex characters in data line" })?;
        bufs.accel[offset + s] = accel;
        // Lys er 10 effektive bits: de to nederste forkastes før skalering.
        bufs.light[offset + s] = (light_raw >> 2) as f64 * light_scale;
    }

    bufs.n_samples = bufs.n_samples.max(offset + SAMPLES_PER_BLOCK);

    Ok(Some(DecodedBlock { sequence, offset, t0, warning }))
}

/// Ett 3-sifret hex-felt fra en 12-tegns samplegruppe.
fn hex_field(group: &str, at: usize) -> Option<i64> {
    i64::from_str_radix(&group[at..at + 3], 16).ok()
}

/// 12-bit to-komplement: verdier over 2047 er negative.
fn twos_complement(raw: i64) -> i64 {
    if raw > 2047 {
        raw - 4096
    } else {
        raw
    }
}
