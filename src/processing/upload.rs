use crate::config::Settings;
use crate::utils::IdentityError;
use std::fs;
use std::path::Path;

/// Lower-case, dot-prefixed extension of `path`, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Rejects images with an extension outside `allowed_extensions` or larger
/// than `max_upload_mb`.
pub fn check_upload(path: &Path, settings: &Settings) -> Result<(), IdentityError> {
    let extension = extension_of(path);
    if !settings.allowed_extensions.contains(&extension) {
        let allowed = settings
            .allowed_extensions
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        return Err(IdentityError::UnsupportedExtension(extension, allowed));
    }

    let size = fs::metadata(path)
        .map_err(|e| IdentityError::io(path, e))?
        .len();
    if size > settings.max_upload_bytes() {
        return Err(IdentityError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit_mb: settings.max_upload_mb,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(suffix: &str, bytes: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(&vec![0u8; bytes]).unwrap();
        file
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("kimlik.JPG")), ".jpg");
        assert_eq!(extension_of(Path::new("form")), "");
    }

    #[test]
    fn test_accepts_allowed_image() {
        let file = temp_file(".PNG", 16);
        assert!(check_upload(file.path(), &Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_extension() {
        let file = temp_file(".gif", 16);
        let err = check_upload(file.path(), &Settings::default()).unwrap_err();
        assert!(matches!(err, IdentityError::UnsupportedExtension(ext, _) if ext == ".gif"));
    }

    #[test]
    fn test_rejects_oversize() {
        let settings = Settings {
            max_upload_mb: 0,
            ..Settings::default()
        };
        let file = temp_file(".jpg", 1);
        assert!(matches!(
            check_upload(file.path(), &settings),
            Err(IdentityError::FileTooLarge { size: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = check_upload(Path::new("/nonexistent/kimlik.jpg"), &Settings::default()).unwrap_err();
        assert!(matches!(err, IdentityError::Io { .. }));
    }
}
