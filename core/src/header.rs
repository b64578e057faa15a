// core/src/header.rs
use std::io::BufRead;

use crate::error::ReadError;
use crate::layout::{self, Extract, HeaderField, HEADER_LAYOUT, HEADER_LINES};
use crate::models::HeaderInfo;

/// Les nøyaktig 59 headerlinjer og fyll `HeaderInfo`.
///
/// Parsingen er strengt posisjonell og styrt av tabellen i `layout`:
/// linjer som ikke står der leses og forkastes. All korrupsjon her er fatal
/// for filen; ingen retry og ingen delresultater.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<HeaderInfo, ReadError> {
    let mut info = HeaderInfo {
        sampling_rate_hz: 0.0,
        gain: [0.0; 3],
        offset: [0.0; 3],
        volts: 0.0,
        lux: 0.0,
        declared_page_count: 0,
        max_block_sequence_seen: -1,
        rate_mismatch_count: 0,
    };

    let mut line = String::new();
    for lineno in 1..=HEADER_LINES {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(ReadError::HeaderFormat {
                line: lineno,
                reason: "stream ended inside the header",
            });
        }

        let spec = match HEADER_LAYOUT.iter().find(|f| f.line == lineno) {
            Some(spec) => spec,
            None => continue,
        };

        let value = match spec.extract {
            Extract::KeyValue => layout::key_value(&line),
            Extract::Column(column) => layout::column_value(&line, column),
        }
        .ok_or(ReadError::HeaderFormat {
            line: lineno,
            reason: "numeric field failed to parse",
        })?;

        match spec.field {
            HeaderField::SamplingRate => info.sampling_rate_hz = value,
            HeaderField::Gain(axis) => info.gain[axis] = value,
            HeaderField::Offset(axis) => info.offset[axis] = value,
            HeaderField::Volts => info.volts = value,
            HeaderField::Lux => info.lux = value,
            HeaderField::PageCount => info.declared_page_count = value as i64,
        }
    }

    Ok(info)
}
