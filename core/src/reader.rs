// core/src/reader.rs
//
// Orkestratoren: Start → HeaderParsed → (BlockParsed)* → EndOfFile | Fatal.
// Leseren eier header og buffere for hele filens dekoding og låner dem ut
// mutbart til ett steg om gangen; ingenting deles på tvers av filer.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::block;
use crate::error::{ReadError, ReadWarning};
use crate::header;
use crate::layout::SAMPLES_PER_BLOCK;
use crate::models::{Recording, SampleBuffers};
use crate::timestamp;
use crate::windowing::{DayWindowIndexer, WindowIndex, WindowSpec, DEFAULT_MAX_DAYS};

/// Leser GENEActiv .bin-filer til kalibrerte, tidsindekserte strømmer.
///
/// Vinduene og dagkapasiteten settes én gang; hvert `read`-kall har sin egen
/// header/buffer-tilstand, så ulike filer kan dekodes parallelt med hver sin
/// leser uten delt mutabel tilstand.
#[derive(Debug, Clone)]
pub struct BinReader {
    pub windows: WindowSpec,
    pub max_days: usize,
}

impl Default for BinReader {
    fn default() -> Self {
        Self { windows: WindowSpec::none(), max_days: DEFAULT_MAX_DAYS }
    }
}

impl BinReader {
    pub fn new(windows: WindowSpec) -> Self {
        Self { windows, ..Self::default() }
    }

    /// Les en fil fra disk. Annen filendelse enn `.bin` gir en advarsel,
    /// ikke en feil.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Recording, ReadError> {
        let path = path.as_ref();
        let mut warnings = Vec::new();

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !extension.eq_ignore_ascii_case("bin") {
            let w = ReadWarning::UnexpectedExtension { extension: extension.to_string() };
            log::warn!("{w}");
            warnings.push(w);
        }

        let mut reader = BufReader::new(File::open(path)?);
        self.read_stream(&mut reader, warnings)
    }

    /// Les fra en vilkårlig bufret strøm (testbart uten filsystem).
    pub fn read_from<R: BufRead>(&self, reader: &mut R) -> Result<Recording, ReadError> {
        self.read_stream(reader, Vec::new())
    }

    fn read_stream<R: BufRead>(
        &self,
        reader: &mut R,
        mut warnings: Vec<ReadWarning>,
    ) -> Result<Recording, ReadError> {
        // Header først; korrupsjon her gir ingen delresultater.
        let mut header = header::read_header(reader)?;
        log::debug!(
            "header: fs={} Hz, {} pages declared",
            header.sampling_rate_hz,
            header.declared_page_count
        );

        let mut samples = SampleBuffers::allocate(header.sample_capacity(), self.max_days);
        let mut windows = WindowIndex::allocate(self.windows.len(), self.max_days);
        let mut indexer = DayWindowIndexer::new(&self.windows, self.max_days);

        let mut error = None;
        for _ in 0..header.declared_page_count.max(0) {
            let decoded = match block::read_block(reader, &mut header, &mut samples) {
                Ok(Some(decoded)) => decoded,
                Ok(None) => break, // ren EOF ved blokkstart
                Err(e) => {
                    // Blokk-fatal: behold alt som er dekodet så langt.
                    error = Some(e);
                    break;
                }
            };

            // Sekvensgap er ikke fatalt; hullet forblir nullfylt.
            let expected = header.max_block_sequence_seen + 1;
            if decoded.sequence != expected {
                let w = ReadWarning::SequenceGap { block: decoded.sequence, expected };
                log::warn!("{w}");
                warnings.push(w);
            }
            header.max_block_sequence_seen =
                header.max_block_sequence_seen.max(decoded.sequence);

            // Tidsstempler for blokka, deretter dag/vindus-indeksering,
            // alltid med gjeldende (ev. korrigerte) fs.
            let fs = header.sampling_rate_hz;
            timestamp::fill_block_timestamps(
                &mut samples.timestamp[decoded.offset..decoded.offset + SAMPLES_PER_BLOCK],
                decoded.t0,
                fs,
            );
            indexer.index_block(
                fs,
                decoded.t0,
                decoded.offset,
                SAMPLES_PER_BLOCK,
                &mut samples,
                &mut windows,
            );

            if let Some(w) = decoded.warning {
                warnings.push(w);
            }
        }

        indexer.finalize(samples.n_samples, &mut samples, &mut windows);
        samples.truncate();

        Ok(Recording { header, samples, windows, warnings, error })
    }
}

/// Engangslesing med default dagkapasitet.
pub fn read_bin(path: impl AsRef<Path>, windows: WindowSpec) -> Result<Recording, ReadError> {
    BinReader::new(windows).read(path)
}
