use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::AppError;

/// Writes `contents` to `<dir>/<stem>.tex`, creating `dir` if needed.
///
/// An existing file is only replaced when `force` is set.
pub fn write_tex(dir: &Path, stem: &str, contents: &str, force: bool) -> Result<PathBuf, AppError> {
    if !dir.exists() {
        warn!("TeX directory does not exist: {}", dir.display());
        fs::create_dir_all(dir)?;
        info!("Created TeX directory: {}", dir.display());
    }

    let path = dir.join(format!("{stem}.tex"));
    if path.exists() {
        if !force {
            return Err(AppError::OutputExists(path));
        }
        warn!("Overwriting existing file: {}", path.display());
    }

    fs::write(&path, contents)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_directory_and_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested/tex");
        let path = write_tex(&dir, "jane", "\\begin{document}", false).unwrap();
        assert_eq!(path, dir.join("jane.tex"));
        assert_eq!(fs::read_to_string(path).unwrap(), "\\begin{document}");
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let root = tempfile::tempdir().unwrap();
        write_tex(root.path(), "jane", "one", false).unwrap();
        let err = write_tex(root.path(), "jane", "two", false).unwrap_err();
        assert!(matches!(err, AppError::OutputExists(_)));
        assert_eq!(
            fs::read_to_string(root.path().join("jane.tex")).unwrap(),
            "one"
        );
    }

    #[test]
    fn test_overwrites_with_force() {
        let root = tempfile::tempdir().unwrap();
        write_tex(root.path(), "jane", "one", false).unwrap();
        write_tex(root.path(), "jane", "two", true).unwrap();
        assert_eq!(
            fs::read_to_string(root.path().join("jane.tex")).unwrap(),
            "two"
        );
    }
}
