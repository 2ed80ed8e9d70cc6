use std::fs;
use std::path::Path;

/// Convert CRLF and lone CR line endings to LF.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Read primer sequences from a FASTA file for use as `fastaText`.
pub fn load_fasta_text(path: &Path) -> Result<String, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Could not read FASTA file '{}': {e}", path.display()))?;
    let text = normalize_line_endings(&raw);
    if text.trim().is_empty() {
        return Err(format!("FASTA file '{}' is empty", path.display()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_line_endings() {
        assert_eq!(normalize_line_endings(">a\r\nACGT\r\n"), ">a\nACGT\n");
        assert_eq!(normalize_line_endings(">a\rACGT"), ">a\nACGT");
        assert_eq!(normalize_line_endings(">a\nACGT\n"), ">a\nACGT\n");
    }

    #[test]
    fn test_load_from_file() {
        let td = tempdir().unwrap();
        let path = td.path().join("primers.fa");
        fs::write(&path, ">FGA_f\r\nGCCCCATAGGTTTTGAACTCA\r\n").unwrap();
        assert_eq!(
            load_fasta_text(&path).unwrap(),
            ">FGA_f\nGCCCCATAGGTTTTGAACTCA\n"
        );
    }

    #[test]
    fn test_empty_or_missing_file_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("empty.fa");
        fs::write(&path, "\r\n  \n").unwrap();
        assert!(load_fasta_text(&path).unwrap_err().contains("is empty"));
        assert!(load_fasta_text(&td.path().join("none.fa")).is_err());
    }
}
