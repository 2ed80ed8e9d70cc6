//! Headless rendering of silica result sets: the paginated view model, its
//! plain-text presentation, link builders and the export encoders.

pub mod export;
pub mod links;
pub mod text;
pub mod view;

pub use export::{export_amplicon_table, export_json, export_primer_table, ExportFormat};
pub use links::{download_url, permalink, BrowserTarget, DownloadKind};
pub use view::{
    format_penalty, format_tm, page_window, render_results, wrap_sequence, AmpliconVm, Banner,
    BannerLevel, Collection, CollectionView, PageControls, PrimerEndVm, PrimerSiteVm,
    RenderContext, ResultView, ViewOffsets, PAGE_SIZE, SEQUENCE_WRAP,
};
