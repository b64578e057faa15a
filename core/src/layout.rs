// core/src/layout.rs
//
// Fastlåst linje/kolonne-layout for GENEActiv .bin-eksporter. All
// posisjonsinfo samles her som data; parserne itererer tabellene i stedet
// for å hardkode offsets inne i kontrollflyten.

/// Antall linjer i headeren.
pub const HEADER_LINES: usize = 59;

/// Samples per blokk (3600 hex-tegn / 12 tegn per sample).
pub const SAMPLES_PER_BLOCK: usize = 300;

/// Lengden på hex-delen av datalinjen i en blokk.
pub const DATA_LINE_LEN: usize = 3600;

/// Maks antall tegn som leses fra klokkestempel-linjen.
pub const STAMP_MAX_LEN: usize = 40;

/// Hvilket header-felt en linje fyller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    SamplingRate,
    /// Kalibrerings-gain for akse 0..=2 (x, y, z).
    Gain(usize),
    /// Kalibrerings-offset for akse 0..=2 (x, y, z).
    Offset(usize),
    Volts,
    Lux,
    PageCount,
}

/// Hvordan verdien hentes ut av linjen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// Numerisk prefiks av verdien etter første kolon (`key:value`).
    KeyValue,
    /// Numerisk prefiks fra fast byte-kolonne.
    Column(usize),
}

/// Én meningsbærende header-linje.
#[derive(Debug)]
pub struct HeaderLine {
    /// 1-indeksert linjenummer i headeren.
    pub line: usize,
    pub extract: Extract,
    pub field: HeaderField,
}

/// Layout-tabell for headeren. Linjer som ikke står her leses og forkastes.
pub const HEADER_LAYOUT: &[HeaderLine] = &[
    HeaderLine { line: 20, extract: Extract::KeyValue, field: HeaderField::SamplingRate },
    HeaderLine { line: 48, extract: Extract::KeyValue, field: HeaderField::Gain(0) },
    HeaderLine { line: 49, extract: Extract::KeyValue, field: HeaderField::Offset(0) },
    HeaderLine { line: 50, extract: Extract::KeyValue, field: HeaderField::Gain(1) },
    HeaderLine { line: 51, extract: Extract::KeyValue, field: HeaderField::Offset(1) },
    HeaderLine { line: 52, extract: Extract::KeyValue, field: HeaderField::Gain(2) },
    HeaderLine { line: 53, extract: Extract::KeyValue, field: HeaderField::Offset(2) },
    HeaderLine { line: 54, extract: Extract::Column(6), field: HeaderField::Volts },
    HeaderLine { line: 55, extract: Extract::Column(4), field: HeaderField::Lux },
    HeaderLine { line: 58, extract: Extract::Column(16), field: HeaderField::PageCount },
];

// Blokk-layout, 1-indeksert relativt til blokkstart. Linje 1-2, 5 og 7-8
// er metadata som hoppes over.
pub const BLOCK_SEQUENCE_LINE: usize = 3;
pub const BLOCK_SEQUENCE_COLUMN: usize = 16;
pub const BLOCK_STAMP_LINE: usize = 4;
pub const BLOCK_TEMPERATURE_LINE: usize = 6;
pub const BLOCK_TEMPERATURE_COLUMN: usize = 12;
pub const BLOCK_RATE_LINE: usize = 9;
pub const BLOCK_RATE_COLUMN: usize = 22;
pub const BLOCK_DATA_LINE: usize = 10;

// Substring-posisjoner (offset, lengde) i klokkestempelet
// `Page Time:YYYY-MM-DD hh:mm:ss:mmm`. Kun substring-uthenting, ingen
// delimiter-parsing.
pub const STAMP_YEAR: (usize, usize) = (10, 4);
pub const STAMP_MONTH: (usize, usize) = (15, 2);
pub const STAMP_DAY: (usize, usize) = (18, 2);
pub const STAMP_HOUR: (usize, usize) = (21, 2);
pub const STAMP_MINUTE: (usize, usize) = (24, 2);
pub const STAMP_SECOND: (usize, usize) = (27, 2);
pub const STAMP_MILLIS: (usize, usize) = (30, 3);

/// Numerisk prefiks à la `strtod`: hopp over innledende blanke, les fortegn,
/// sifre og maks ett desimalpunkt, stopp på første tegn som ikke passer.
/// `None` hvis det ikke finnes noe siffer i det hele tatt; feltverdier kan
/// altså ha etterfølgende enhet ("100 Hz") uten at det feiler.
pub fn numeric_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse::<f64>().ok()
}

/// Tall fra fast byte-kolonne. Linjer kortere enn kolonnen gir `None`.
pub fn column_value(line: &str, column: usize) -> Option<f64> {
    line.get(column..).and_then(numeric_prefix)
}

/// Tall fra verdien i en `key:value`-linje.
pub fn key_value(line: &str) -> Option<f64> {
    let (_, value) = line.split_once(':')?;
    numeric_prefix(value)
}

/// Fast substring fra klokkestempelet.
pub fn stamp_field(stamp: &str, (offset, len): (usize, usize)) -> Option<&str> {
    stamp.get(offset..offset + len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_prefix_stops_at_unit() {
        assert_eq!(numeric_prefix("100 Hz"), Some(100.0));
        assert_eq!(numeric_prefix("-1094"), Some(-1094.0));
        assert_eq!(numeric_prefix("21.5\r\n"), Some(21.5));
        assert_eq!(numeric_prefix("  3.5.7"), Some(3.5));
        assert_eq!(numeric_prefix("Hz"), None);
        assert_eq!(numeric_prefix(""), None);
    }

    #[test]
    fn key_value_reads_after_first_colon() {
        assert_eq!(key_value("Measurement Frequency:100 Hz"), Some(100.0));
        assert_eq!(key_value("x offset:-2008"), Some(-2008.0));
        assert_eq!(key_value("ingen kolon her"), None);
    }

    #[test]
    fn column_value_handles_short_lines() {
        assert_eq!(column_value("Number of Pages:57", 16), Some(57.0));
        assert_eq!(column_value("kort", 16), None);
    }
}
