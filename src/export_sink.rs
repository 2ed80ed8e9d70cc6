//! Where exported files end up: a native save dialog when the environment
//! can show one, otherwise the configured export directory.

use crate::error::SilicaError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Whether a native file dialog can be shown here.
pub fn native_dialog_available() -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveTarget {
    Dialog { start_dir: PathBuf },
    Directory(PathBuf),
}

impl SaveTarget {
    /// Dialog only when asked for and available.
    pub fn detect(export_dir: &Path, allow_dialog: bool) -> Self {
        if allow_dialog && native_dialog_available() {
            SaveTarget::Dialog {
                start_dir: export_dir.to_path_buf(),
            }
        } else {
            SaveTarget::Directory(export_dir.to_path_buf())
        }
    }

    /// Write `contents`. `Ok(None)` when the user cancelled the dialog.
    pub fn save(&self, file_name: &str, contents: &str) -> Result<Option<PathBuf>, SilicaError> {
        let path = match self {
            SaveTarget::Dialog { start_dir } => {
                let picked = rfd::FileDialog::new()
                    .set_directory(start_dir)
                    .set_file_name(file_name)
                    .save_file();
                match picked {
                    Some(path) => path,
                    None => return Ok(None),
                }
            }
            SaveTarget::Directory(dir) => {
                fs::create_dir_all(dir)?;
                dir.join(file_name)
            }
        };
        fs::write(&path, contents)?;
        info!(path = %path.display(), bytes = contents.len(), "Export written");
        Ok(Some(path))
    }
}

/// Ask for a results file to import. `None` without a dialog or on cancel.
pub fn pick_import_file(start_dir: &Path) -> Option<PathBuf> {
    if !native_dialog_available() {
        return None;
    }
    rfd::FileDialog::new()
        .set_directory(start_dir)
        .add_filter("JSON", &["json"])
        .pick_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_directory_target_writes_file() {
        let td = tempdir().unwrap();
        let dir = td.path().join("exports");
        let target = SaveTarget::detect(&dir, false);
        assert_eq!(target, SaveTarget::Directory(dir.clone()));
        let path = target.save("silica.json", "{}").unwrap().unwrap();
        assert_eq!(path, dir.join("silica.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
    }

    #[test]
    fn test_existing_file_is_replaced() {
        let td = tempdir().unwrap();
        let target = SaveTarget::Directory(td.path().to_path_buf());
        target.save("silica_primers.tsv", "old").unwrap();
        let path = target.save("silica_primers.tsv", "new").unwrap().unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
    }

    #[test]
    fn test_unwritable_directory_is_error() {
        let td = tempdir().unwrap();
        let blocker = td.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let target = SaveTarget::Directory(blocker.join("sub"));
        assert!(matches!(target.save("a.json", "{}"), Err(SilicaError::Io(_))));
    }
}
