//! Client configuration. Values come from explicit settings (command line),
//! then the environment, then built-in defaults.

use silica_render::{BrowserTarget, ExportFormat, RenderContext, PAGE_SIZE};
use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_VAR: &str = "SILICA_API_URL";
pub const API_LINK_VAR: &str = "SILICA_API_LINK";
pub const EXPORT_DIR_VAR: &str = "SILICA_EXPORT_DIR";
pub const EXPORT_PREFIX_VAR: &str = "SILICA_EXPORT_PREFIX";
pub const GENOME_CATALOG_VAR: &str = "SILICA_GENOME_CATALOG";
pub const TIMEOUT_VAR: &str = "SILICA_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://0.0.0.0:3300/api/v1";
pub const DEFAULT_API_LINK: &str = "http://0.0.0.0:3300/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

fn normalized_non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// File names used for local exports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportNames {
    pub json: String,
    pub amplicons: String,
    pub primers: String,
}

impl Default for ExportNames {
    fn default() -> Self {
        Self {
            json: ExportFormat::Json.default_file_name().to_string(),
            amplicons: ExportFormat::AmpliconTable.default_file_name().to_string(),
            primers: ExportFormat::PrimerTable.default_file_name().to_string(),
        }
    }
}

impl ExportNames {
    /// `{prefix}.json`, `{prefix}_amplicons.tsv`, `{prefix}_primers.tsv`
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            json: format!("{prefix}.json"),
            amplicons: format!("{prefix}_amplicons.tsv"),
            primers: format!("{prefix}_primers.tsv"),
        }
    }

    pub fn file_name(&self, format: ExportFormat) -> &str {
        match format {
            ExportFormat::Json => &self.json,
            ExportFormat::AmpliconTable => &self.amplicons,
            ExportFormat::PrimerTable => &self.primers,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Service API root; endpoints are appended to it.
    pub api_url: String,
    /// Base address of the result page used for permalinks.
    pub link_base: String,
    pub export_dir: PathBuf,
    pub export_names: ExportNames,
    /// `None` uses the built-in catalog.
    pub genome_catalog: Option<String>,
    pub request_timeout: Duration,
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            link_base: DEFAULT_API_LINK.to_string(),
            export_dir: PathBuf::from("."),
            export_names: ExportNames::default(),
            genome_catalog: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset or blank values keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |var: &str| lookup(var).and_then(|v| normalized_non_empty(&v));
        let mut config = Self::default();
        if let Some(v) = lookup(API_URL_VAR) {
            config.api_url = v;
        }
        if let Some(v) = lookup(API_LINK_VAR) {
            config.link_base = v;
        }
        if let Some(v) = lookup(EXPORT_DIR_VAR) {
            config.export_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(EXPORT_PREFIX_VAR) {
            config.export_names = ExportNames::with_prefix(&v);
        }
        config.genome_catalog = lookup(GENOME_CATALOG_VAR);
        if let Some(secs) = lookup(TIMEOUT_VAR).and_then(|v| v.parse::<u64>().ok()) {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }
        config
    }

    pub fn render_context<'a>(&'a self, browser: Option<&'a BrowserTarget>) -> RenderContext<'a> {
        RenderContext {
            page_size: self.page_size,
            api_url: Some(&self.api_url),
            link_base: Some(&self.link_base),
            browser,
        }
    }
}
