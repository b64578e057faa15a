// Binding mot Python. Samme JSON-inn/JSON-ut-stil som resten av tooling-et:
// payload som JSON-streng, svar som JSON-streng, feil som PyValueError med
// path fra serde_path_to_error.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use serde::Deserialize;
use serde_json::json;
use serde_path_to_error as spte;

use crate::reader::BinReader;
use crate::windowing::{WindowSpec, DEFAULT_MAX_DAYS};

// ──────────────────────────────────────────────────────────────────────────────
// INPUT: { file, bases?, periods?, max_days? }
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ReadBinIn {
    file: String,
    #[serde(default)]
    bases: Vec<f64>,
    #[serde(default)]
    periods: Vec<f64>,
    #[serde(default)]
    max_days: Option<usize>,
}

fn call_read_bin_from_json(json_in: &str) -> Result<String, String> {
    let mut de = serde_json::Deserializer::from_str(json_in);
    let parsed: ReadBinIn = spte::deserialize(&mut de)
        .map_err(|e| format!("parse error (ReadBinIn) at {}: {}", e.path(), e))?;

    if parsed.bases.len() != parsed.periods.len() {
        return Err("bases og periods må ha samme lengde".into());
    }
    let pairs: Vec<(f64, f64)> = parsed
        .bases
        .iter()
        .copied()
        .zip(parsed.periods.iter().copied())
        .collect();
    let windows = WindowSpec::new(&pairs).map_err(|e| e.to_string())?;

    let reader = BinReader { windows, max_days: parsed.max_days.unwrap_or(DEFAULT_MAX_DAYS) };
    let rec = reader.read(&parsed.file).map_err(|e| e.to_string())?;

    let out = json!({
        "header": rec.header,
        "n_samples": rec.samples.n_samples,
        "timestamp": rec.samples.timestamp,
        "accel": rec.samples.accel,
        "light": rec.samples.light,
        "temperature": rec.samples.temperature,
        "day_start": rec.samples.day_start,
        "day_stop": rec.samples.day_stop,
        "windows": rec.windows,
        "warnings": rec.warnings,
        "error": rec.error.map(|e| e.to_string()),
    });
    Ok(out.to_string())
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
fn read_bin_json(json_str: &str) -> PyResult<String> {
    call_read_bin_from_json(json_str).map_err(PyValueError::new_err)
}

#[pymodule]
fn geneactiv_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(read_bin_json, m)?)?;
    Ok(())
}
