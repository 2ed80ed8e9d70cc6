use serde::{Deserialize, Serialize};
use silica_render::BrowserTarget;
use silica_render::links::UCSC_TRACKS_URL;
use std::collections::HashMap;
use std::fs;

pub const DEFAULT_GENOME_CATALOG_JSON: &str = include_str!("../assets/genome_browsers.json");

/// Catalog entry describing how one service genome maps onto an external
/// genome browser.
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GenomeCatalogEntry {
    pub description: Option<String>,
    /// Browser database key; genomes without one get no browser links.
    pub browser_db: Option<String>,
    #[serde(default)]
    pub chrom_prefix: String,
    pub tracks_url: Option<String>,
}

/// Genome identifier (the service's genome file name) → catalog entry.
#[derive(Debug, Clone, Default)]
pub struct GenomeCatalog {
    entries: HashMap<String, GenomeCatalogEntry>,
}

impl GenomeCatalog {
    pub fn from_json_str(text: &str) -> Result<Self, String> {
        let entries: HashMap<String, GenomeCatalogEntry> = serde_json::from_str(text)
            .map_err(|e| format!("Could not parse genome catalog: {e}"))?;
        Ok(Self { entries })
    }

    pub fn from_json_file(path: &str) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Could not read genome catalog '{path}': {e}"))?;
        Self::from_json_str(&text).map_err(|e| format!("{e} ('{path}')"))
    }

    /// Built-in catalog, or the one at `path` when given.
    pub fn load(path: Option<&str>) -> Result<Self, String> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Self::from_json_str(DEFAULT_GENOME_CATALOG_JSON),
        }
    }

    pub fn list_genomes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn entry(&self, genome_id: &str) -> Option<&GenomeCatalogEntry> {
        self.entries.get(genome_id.trim())
    }

    /// The external database key for a genome, if it has one.
    pub fn browser_db(&self, genome_id: &str) -> Option<&str> {
        self.entry(genome_id)
            .and_then(|e| e.browser_db.as_deref())
            .filter(|db| !db.trim().is_empty())
    }

    pub fn browser_target(&self, genome_id: &str) -> Option<BrowserTarget> {
        let entry = self.entry(genome_id)?;
        let db = self.browser_db(genome_id)?;
        Some(BrowserTarget {
            db: db.to_string(),
            chrom_prefix: entry.chrom_prefix.clone(),
            tracks_url: entry
                .tracks_url
                .clone()
                .unwrap_or_else(|| UCSC_TRACKS_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silica_protocol::SAMPLE_GENOME;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_catalog_maps_sample_genome() {
        let catalog = GenomeCatalog::load(None).unwrap();
        assert_eq!(catalog.browser_db(SAMPLE_GENOME), Some("hg19"));
        let target = catalog.browser_target(SAMPLE_GENOME).unwrap();
        assert_eq!(target.chrom_prefix, "chr");
        assert_eq!(target.tracks_url, UCSC_TRACKS_URL);
    }

    #[test]
    fn test_unknown_or_unmapped_genome_has_no_target() {
        let catalog = GenomeCatalog::load(None).unwrap();
        assert!(catalog.browser_target("Unknown.fa.gz").is_none());
        assert!(catalog
            .browser_target("Arabidopsis_thaliana.TAIR10.dna.toplevel.fa.gz")
            .is_none());
        assert!(catalog.browser_target("").is_none());
    }

    #[test]
    fn test_catalog_from_file() {
        let td = tempdir().unwrap();
        let path = td.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"toy.fa.gz": {"browser_db": "toyDb1", "tracks_url": "https://browser.example/tracks"}}"#,
        )
        .unwrap();
        let catalog = GenomeCatalog::load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(catalog.list_genomes(), vec!["toy.fa.gz".to_string()]);
        let target = catalog.browser_target("toy.fa.gz").unwrap();
        assert_eq!(
            target.region_url("II", 5, 9),
            "https://browser.example/tracks?db=toyDb1&position=II:5-9"
        );
    }

    #[test]
    fn test_bad_catalog_file_reports_path() {
        let td = tempdir().unwrap();
        let path = td.path().join("catalog.json");
        fs::write(&path, "[1, 2").unwrap();
        let err = GenomeCatalog::load(Some(&path.to_string_lossy())).unwrap_err();
        assert!(err.contains("catalog.json"));
    }
}
