//! Canonical title assignment

use crate::error::MalformedUploadError;
use crate::types::EngineConfig;

/// Extension of a file name, including the leading dot
///
/// # Errors
/// `MalformedUploadError::MissingExtension` if there is no `.` or nothing follows the last one
pub fn file_extension(file_name: &str) -> Result<&str, MalformedUploadError> {
    match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() => Ok(&file_name[idx..]),
        _ => Err(MalformedUploadError::MissingExtension {
            file_name: file_name.to_string(),
        }),
    }
}

/// `{label}{extension}` for an uploaded file
///
/// # Errors
/// - `MalformedUploadError::MissingExtension`
/// - `MalformedUploadError::UnsupportedExtension` if `config` does not accept the extension
pub fn canonical_title(
    label: &str,
    file_name: &str,
    config: &EngineConfig,
) -> Result<String, MalformedUploadError> {
    let extension = file_extension(file_name)?;
    if !config.accepts(extension) {
        return Err(MalformedUploadError::UnsupportedExtension {
            file_name: file_name.to_string(),
            extension: extension.to_string(),
        });
    }
    Ok(format!("{label}{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_extension_verbatim() {
        let title = canonical_title("Physician Cv", "photo.jpeg", &EngineConfig::default()).unwrap();
        assert_eq!(title, "Physician Cv.jpeg");

        let title = canonical_title("W9", "scan.final.PDF", &EngineConfig::default()).unwrap();
        assert_eq!(title, "W9.PDF");
    }

    #[test]
    fn missing_extension_is_malformed() {
        for name in ["README", "trailing."] {
            assert!(matches!(
                file_extension(name),
                Err(MalformedUploadError::MissingExtension { .. })
            ));
        }
    }

    #[test]
    fn unsupported_extension_is_malformed() {
        let err = canonical_title("W9", "virus.exe", &EngineConfig::default()).unwrap_err();
        assert_eq!(
            err,
            MalformedUploadError::UnsupportedExtension {
                file_name: "virus.exe".into(),
                extension: ".exe".into()
            }
        );
    }
}
