//! geneactiv_core: leser GENEActiv .bin-eksporter til kalibrerte,
//! tidsindekserte sensorstrømmer med dag- og vindusindeksering.

pub mod block;
pub mod error;
pub mod header;
pub mod layout;
pub mod models;
pub mod reader;
pub mod storage;
pub mod timestamp;
pub mod windowing;

#[cfg(feature = "python")]
mod py;

pub use error::{ReadError, ReadWarning};
pub use models::{HeaderInfo, Recording, SampleBuffers};
pub use reader::{read_bin, BinReader};
pub use storage::{load_windows, save_windows};
pub use windowing::{DayWindowIndexer, WindowDef, WindowIndex, WindowSpec, DEFAULT_MAX_DAYS};
