use serde::{Deserialize, Serialize};

pub const UCSC_TRACKS_URL: &str = "https://genome.ucsc.edu/cgi-bin/hgTracks";

/// Server-generated bulk download artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DownloadKind {
    AmpliconCsv,
    AmpliconJson,
    PrimerCsv,
    PrimerJson,
}

impl DownloadKind {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::AmpliconCsv => "ac",
            Self::AmpliconJson => "aj",
            Self::PrimerCsv => "pc",
            Self::PrimerJson => "pj",
        }
    }
}

/// `{api_url}/download/{identifier}-{suffix}`
pub fn download_url(api_url: &str, identifier: &str, kind: DownloadKind) -> String {
    format!(
        "{}/download/{identifier}-{}",
        api_url.trim_end_matches('/'),
        kind.suffix()
    )
}

/// Address of the result page for a finished job.
pub fn permalink(link_base: &str, identifier: &str) -> String {
    let sep = if link_base.ends_with('/') { "" } else { "/" };
    format!("{link_base}{sep}index.html?UUID={identifier}")
}

/// An external genome browser database that a submitted genome maps to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserTarget {
    /// Database key, e.g. `hg19`.
    pub db: String,
    /// Prepended to contig names that lack it (Ensembl `4` vs UCSC `chr4`).
    #[serde(default)]
    pub chrom_prefix: String,
    #[serde(default = "default_tracks_url")]
    pub tracks_url: String,
}

fn default_tracks_url() -> String {
    UCSC_TRACKS_URL.to_string()
}

impl BrowserTarget {
    pub fn new(db: &str, chrom_prefix: &str) -> Self {
        Self {
            db: db.to_string(),
            chrom_prefix: chrom_prefix.to_string(),
            tracks_url: default_tracks_url(),
        }
    }

    pub fn region_url(&self, chrom: &str, start: i64, end: i64) -> String {
        let chrom = if chrom.starts_with(&self.chrom_prefix) {
            chrom.to_string()
        } else {
            format!("{}{chrom}", self.chrom_prefix)
        };
        format!(
            "{}?db={}&position={chrom}:{start}-{end}",
            self.tracks_url, self.db
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_urls() {
        assert_eq!(
            download_url("https://example.org/api/v1/", "abc", DownloadKind::AmpliconCsv),
            "https://example.org/api/v1/download/abc-ac"
        );
        assert_eq!(
            download_url("https://example.org/api/v1", "abc", DownloadKind::PrimerJson),
            "https://example.org/api/v1/download/abc-pj"
        );
    }

    #[test]
    fn test_permalink() {
        assert_eq!(
            permalink("https://example.org/silica/", "abc123"),
            "https://example.org/silica/index.html?UUID=abc123"
        );
        assert_eq!(
            permalink("https://example.org/silica", "abc123"),
            "https://example.org/silica/index.html?UUID=abc123"
        );
    }

    #[test]
    fn test_region_url_adds_missing_prefix_once() {
        let target = BrowserTarget::new("hg19", "chr");
        assert_eq!(
            target.region_url("4", 100, 250),
            "https://genome.ucsc.edu/cgi-bin/hgTracks?db=hg19&position=chr4:100-250"
        );
        assert_eq!(
            target.region_url("chrX", 1, 2),
            "https://genome.ucsc.edu/cgi-bin/hgTracks?db=hg19&position=chrX:1-2"
        );
    }
}
