use std::error::Error;
use std::path::Path;

use crate::windowing::WindowSpec;

/// Leser vindusdefinisjoner fra disk (JSON).
/// Hvis filen ikke finnes, returneres en tom spesifikasjon.
pub fn load_windows(path: &str) -> Result<WindowSpec, Box<dyn Error>> {
    if Path::new(path).exists() {
        let contents = std::fs::read_to_string(path)?;
        let spec: WindowSpec = serde_json::from_str(&contents)?;
        // Deserialisering går utenom `WindowSpec::new`, så grensene må
        // sjekkes her.
        spec.validate()?;
        log::info!("vindus-spec lastet fra {} ({} vinduer)", path, spec.len());
        Ok(spec)
    } else {
        log::warn!("fant ikke vindus-spec på {}, bruker tom spec", path);
        Ok(WindowSpec::none())
    }
}

/// Lagrer vindusdefinisjoner til disk som JSON (pretty-print).
pub fn save_windows(spec: &WindowSpec, path: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(spec)?;
    std::fs::write(path, json)?;
    log::info!("vindus-spec lagret til {} ({} vinduer)", path, spec.len());
    Ok(())
}
