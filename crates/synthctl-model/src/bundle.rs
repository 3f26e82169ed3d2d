//! Script and bundle file collaborators.
//!
//! Bundles travel on the wire as base64-encoded zip archives. The CLI
//! accepts either a `.zip` path (encoded here) or an already-encoded base64
//! string passed through verbatim.

use crate::error::ModelError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Whether the given path names a zip archive.
pub fn is_zip_file(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Read a zip bundle and encode it as standard base64 text.
pub fn read_zip_file_to_base64(path: &str) -> Result<String, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::FileRead {
        path: path.to_string(),
        source,
    })?;
    Ok(STANDARD.encode(bytes))
}

/// Read a script file (.js/.side) as text.
pub fn read_script_file(path: &str) -> Result<String, ModelError> {
    std::fs::read_to_string(path).map_err(|source| ModelError::FileRead {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn zip_detection_by_extension() {
        assert!(is_zip_file("bundle.zip"));
        assert!(is_zip_file("BUNDLE.ZIP"));
        assert!(!is_zip_file("script.js"));
        assert!(!is_zip_file("zip"));
    }

    #[test]
    fn zip_encoding_is_standard_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"PK\x03\x04test").unwrap();

        let encoded = read_zip_file_to_base64(path.to_str().unwrap()).unwrap();
        assert_eq!(encoded, STANDARD.encode(b"PK\x03\x04test"));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = read_zip_file_to_base64("/nonexistent/bundle.zip").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bundle.zip"));
    }
}
