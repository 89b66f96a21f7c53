//! # File I/O Module
//!
//! Reads the JSON inputs of the engine: polygonal section records,
//! calculation requests and design-code overrides. Nothing here writes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rcb_core::design_code::DesignCode;
//! use rcb_core::file_io::load_section;
//! use rcb_core::calculations::section::analyze;
//! use std::path::Path;
//!
//! let section = load_section(Path::new("tee_girder.json")).unwrap();
//! let result = analyze(&section, &DesignCode::nscp_2015()).unwrap();
//! println!("φMn = {:.1} kN·m", result.phi_mn_knm);
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::calculations::{CalculationRequest, PolygonSection};
use crate::design_code::DesignCode;
use crate::errors::{CalcError, CalcResult};

/// Read a file to a string, mapping failures to [`CalcError::FileError`].
fn read_to_string(path: &Path) -> CalcResult<String> {
    let mut file = File::open(path).map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Parse a JSON file into `T`.
fn load_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let contents = read_to_string(path)?;
    let value = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "loaded input file");
    Ok(value)
}

/// Load and validate a polygonal section record.
///
/// # Errors
///
/// * `FileError` - the file cannot be opened or read
/// * `SerializationError` - the file is not a section record
/// * `InvalidInput` - the record fails [`PolygonSection::validate`]
pub fn load_section(path: &Path) -> CalcResult<PolygonSection> {
    let section: PolygonSection = load_json(path)?;
    section.validate()?;
    Ok(section)
}

/// Load a tagged calculation request.
///
/// The request is validated when it runs, not here.
pub fn load_request(path: &Path) -> CalcResult<CalculationRequest> {
    load_json(path)
}

/// Load and validate a design-code override.
pub fn load_design_code(path: &Path) -> CalcResult<DesignCode> {
    let code: DesignCode = load_json(path)?;
    code.validate()?;
    Ok(code)
}
