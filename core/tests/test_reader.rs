// core/tests/test_reader.rs
//
// Orkestratoren ende-til-ende: flerblokkfiler, fs-korreksjon med én gangs
// toleranse, sekvensgap, dagpartisjonering og filhåndtering.
use std::fs;
use std::io::Cursor;

use geneactiv_core::{BinReader, ReadError, ReadWarning, Recording, WindowSpec};

const GAIN: [i64; 3] = [25889, 26007, 25651];
const OFFSET: [i64; 3] = [-2008, 1094, 0];

fn header_text(fs: f64, pages: usize) -> String {
    let mut lines = Vec::with_capacity(59);
    for i in 1..=59 {
        let line = match i {
            20 => format!("Measurement Frequency:{fs} Hz"),
            48 => format!("x gain:{}", GAIN[0]),
            49 => format!("x offset:{}", OFFSET[0]),
            50 => format!("y gain:{}", GAIN[1]),
            51 => format!("y offset:{}", OFFSET[1]),
            52 => format!("z gain:{}", GAIN[2]),
            53 => format!("z offset:{}", OFFSET[2]),
            54 => "Volts:100".to_string(),
            55 => "Lux:1000".to_string(),
            58 => format!("Number of Pages:{pages}"),
            _ => format!("Header Line {i}"),
        };
        lines.push(line);
    }
    lines.join("\n") + "\n"
}

fn block_text(seq: i64, stamp: &str, temp: f64, fs: f64) -> String {
    let data = "014ffe80d011".repeat(300);
    format!(
        "Recorded Data\n\
         Device Unique Serial Code:012966\n\
         Sequence Number:{seq}\n\
         Page Time:{stamp}\n\
         Unassigned:\n\
         Temperature:{temp}\n\
         Battery voltage:4.05\n\
         Device Status:Recording\n\
         Measurement Frequency:{fs}\n\
         {data}\n"
    )
}

fn read(text: &str, windows: WindowSpec) -> Recording {
    BinReader::new(windows)
        .read_from(&mut Cursor::new(text.as_bytes()))
        .expect("header skal parse")
}

#[test]
fn test_two_blocks_give_strictly_increasing_timestamps() {
    let text = header_text(100.0, 2)
        + &block_text(0, "2016-01-01 10:00:00:000", 21.0, 100.0)
        + &block_text(1, "2016-01-01 10:00:03:000", 22.0, 100.0);
    let rec = read(&text, WindowSpec::none());

    assert!(rec.error.is_none(), "got {:?}", rec.error);
    assert!(rec.warnings.is_empty(), "got {:?}", rec.warnings);
    assert_eq!(rec.samples.n_samples, 600);
    assert_eq!(rec.header.max_block_sequence_seen, 1);

    // 1451642400 = 2016-01-01 10:00:00 UTC
    assert_eq!(rec.samples.timestamp[0], 1_451_642_400.0);
    for pair in rec.samples.timestamp.windows(2) {
        let spacing = pair[1] - pair[0];
        assert!(spacing > 0.0, "timestamps skal være strengt stigende");
        assert!((spacing - 0.01).abs() < 1e-6, "spacing {spacing}");
    }

    // temperatur er blokk-granulær
    assert_eq!(rec.samples.temperature[299], 21.0);
    assert_eq!(rec.samples.temperature[300], 22.0);
}

#[test]
fn test_first_rate_mismatch_warns_then_second_is_fatal() {
    let text = header_text(100.0, 3)
        + &block_text(0, "2016-01-01 10:00:00:000", 21.0, 100.0)
        + &block_text(1, "2016-01-01 10:00:03:000", 21.0, 85.7)
        + &block_text(2, "2016-01-01 10:00:06:500", 21.0, 60.0);
    let rec = read(&text, WindowSpec::none());

    // blokk 1 tolereres: header-fs korrigeres og blokka dekodes under ny fs
    assert_eq!(rec.header.sampling_rate_hz, 85.7);
    assert_eq!(rec.header.rate_mismatch_count, 1);
    assert!(rec.warnings.contains(&ReadWarning::SamplingRateCorrected {
        block: 1,
        header_hz: 100.0,
        block_hz: 85.7,
    }));
    let spacing = rec.samples.timestamp[301] - rec.samples.timestamp[300];
    assert!((spacing - 1.0 / 85.7).abs() < 1e-6);

    // blokk 2 avviker igjen: fatal, men de to første blokkene beholdes
    assert!(
        matches!(
            rec.error,
            Some(ReadError::SamplingRateMismatch { block: 2, block_hz, header_hz })
                if block_hz == 60.0 && header_hz == 85.7
        ),
        "got {:?}",
        rec.error
    );
    assert_eq!(rec.samples.n_samples, 600);
}

#[test]
fn test_sequence_gap_warns_and_leaves_zero_fill() {
    let text = header_text(100.0, 3)
        + &block_text(0, "2016-01-01 10:00:00:000", 21.0, 100.0)
        + &block_text(2, "2016-01-01 10:00:06:000", 21.0, 100.0);
    let rec = read(&text, WindowSpec::none());

    assert!(rec.error.is_none(), "got {:?}", rec.error);
    assert!(rec.warnings.contains(&ReadWarning::SequenceGap { block: 2, expected: 1 }));
    assert_eq!(rec.samples.n_samples, 900);
    // hullet forblir nullfylt
    assert!(rec.samples.timestamp[300..600].iter().all(|&t| t == 0.0));
    assert!(rec.samples.accel[300..600].iter().all(|a| *a == [0.0; 3]));
    // blokka etter hullet lander på sin sekvensavledede posisjon
    assert_eq!(rec.samples.timestamp[600], 1_451_642_406.0);
}

#[test]
fn test_overdeclared_page_count_stops_at_clean_eof() {
    let text = header_text(100.0, 5)
        + &block_text(0, "2016-01-01 10:00:00:000", 21.0, 100.0)
        + &block_text(1, "2016-01-01 10:00:03:000", 21.0, 100.0);
    let rec = read(&text, WindowSpec::none());

    assert!(rec.error.is_none(), "got {:?}", rec.error);
    assert_eq!(rec.samples.n_samples, 600);
    assert_eq!(rec.samples.timestamp.len(), 600);
}

#[test]
fn test_one_full_day_window_partitions_two_days() {
    // fs valgt så én blokk på 300 samples spenner omtrent ett døgn; blokkenes
    // klokkestempler resynkroniserer ved hver midnatt.
    let fs = 0.003472;
    let text = header_text(fs, 2)
        + &block_text(0, "2016-01-01 00:00:00:000", 21.0, fs)
        + &block_text(1, "2016-01-02 00:00:00:000", 21.0, fs);
    let rec = read(&text, WindowSpec::new(&[(0.0, 24.0)]).unwrap());

    assert!(rec.error.is_none(), "got {:?}", rec.error);
    assert_eq!(rec.samples.n_samples, 600);

    // dagene partisjonerer bufferet i to sammenhengende, ikke-overlappende
    // ranger som dekker alle samples
    assert_eq!(rec.samples.day_start, vec![0, 300]);
    assert_eq!(rec.samples.day_stop, vec![300, 600]);
    assert_eq!(rec.samples.day_count(), 2);

    // (base 0, periode 24) speiler dagrangene
    assert_eq!(rec.windows.get(0, 0), Some((0, 300)));
    assert_eq!(rec.windows.get(1, 0), Some((300, 600)));
}

#[test]
fn test_non_bin_extension_warns_but_decodes() {
    let path = "tests/tmp_reader_data.random";
    let text = header_text(100.0, 1) + &block_text(0, "2016-01-01 10:00:00:000", 21.0, 100.0);
    fs::write(path, &text).expect("kunne ikke skrive testfil");

    let rec = BinReader::default().read(path).expect("header skal parse");
    assert!(rec
        .warnings
        .iter()
        .any(|w| matches!(w, ReadWarning::UnexpectedExtension { .. })));
    assert_eq!(rec.samples.n_samples, 300);

    fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let err = BinReader::default().read("tests/finnes_ikke.bin").unwrap_err();
    assert!(matches!(err, ReadError::Io(_)), "got {err:?}");
}
