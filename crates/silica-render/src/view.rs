use crate::links::{download_url, permalink, BrowserTarget, DownloadKind};
use serde::Serialize;
use silica_protocol::{Amplicon, Payload, PrimerSite, Strand};

pub const PAGE_SIZE: usize = 30;
pub const SEQUENCE_WRAP: usize = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    #[default]
    Amplicons,
    Primers,
}

impl Collection {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "a" | "amp" | "amplicon" | "amplicons" => Some(Self::Amplicons),
            "p" | "primer" | "primers" => Some(Self::Primers),
            _ => None,
        }
    }
}

/// First displayed record of each collection. Always a multiple of the page
/// size and never past the end of its collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ViewOffsets {
    pub amplicons: usize,
    pub primers: usize,
}

impl ViewOffsets {
    pub fn get(&self, collection: Collection) -> usize {
        match collection {
            Collection::Amplicons => self.amplicons,
            Collection::Primers => self.primers,
        }
    }

    pub fn get_mut(&mut self, collection: Collection) -> &mut usize {
        match collection {
            Collection::Amplicons => &mut self.amplicons,
            Collection::Primers => &mut self.primers,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerLevel {
    Success,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub level: BannerLevel,
    pub text: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub up: bool,
    pub down: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrimerEndVm {
    pub name: String,
    pub tm: String,
    pub sequence: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AmpliconVm {
    /// 1-based display number.
    pub number: u64,
    pub length_bp: u64,
    pub penalty: String,
    pub location: String,
    pub forward: PrimerEndVm,
    pub reverse: PrimerEndVm,
    pub sequence_rows: Vec<String>,
    pub browser_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrimerSiteVm {
    pub number: u64,
    pub tm: String,
    pub location: String,
    pub strand: Strand,
    pub name: String,
    pub sequence: String,
    pub genome_rows: Vec<String>,
    pub browser_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollectionView<T> {
    pub total: usize,
    pub offset: usize,
    pub stop: usize,
    pub controls: PageControls,
    pub download_csv: Option<String>,
    pub download_json: Option<String>,
    pub records: Vec<T>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub banners: Vec<Banner>,
    pub permalink: Option<String>,
    /// Tab that should be in front after this render.
    pub active: Collection,
    pub amplicons: CollectionView<AmpliconVm>,
    pub primers: CollectionView<PrimerSiteVm>,
}

/// Deployment details that change links, never record content.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub page_size: usize,
    pub api_url: Option<&'a str>,
    pub link_base: Option<&'a str>,
    pub browser: Option<&'a BrowserTarget>,
}

impl Default for RenderContext<'_> {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            api_url: None,
            link_base: None,
            browser: None,
        }
    }
}

pub fn format_penalty(penalty: f64) -> String {
    format!("{penalty:.4}")
}

pub fn format_tm(tm: f64) -> String {
    format!("{tm:.1}")
}

/// Hard-wrap a sequence into rows of `width` characters.
pub fn wrap_sequence(seq: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = seq.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|row| row.iter().collect())
        .collect()
}

/// `(start, stop)` of the visible window and which paging controls apply.
pub fn page_window(offset: usize, count: usize, page_size: usize) -> (usize, usize, PageControls) {
    let start = offset.min(count);
    let stop = start.saturating_add(page_size).min(count);
    let controls = PageControls {
        up: start != 0,
        down: stop < count,
    };
    (start, stop, controls)
}

fn amplicon_vm(amp: &Amplicon, browser: Option<&BrowserTarget>) -> AmpliconVm {
    AmpliconVm {
        number: amp.id + 1,
        length_bp: amp.length,
        penalty: format_penalty(amp.penalty),
        location: amp.location(),
        forward: PrimerEndVm {
            name: amp.for_name.clone(),
            tm: format_tm(amp.for_tm),
            sequence: amp.for_seq.clone(),
        },
        reverse: PrimerEndVm {
            name: amp.rev_name.clone(),
            tm: format_tm(amp.rev_tm),
            sequence: amp.rev_seq.clone(),
        },
        sequence_rows: wrap_sequence(&amp.seq, SEQUENCE_WRAP),
        browser_url: browser.map(|b| b.region_url(&amp.chrom, amp.for_pos, amp.rev_pos)),
    }
}

fn primer_site_vm(site: &PrimerSite, browser: Option<&BrowserTarget>) -> PrimerSiteVm {
    let len = site.seq.chars().count() as i64;
    PrimerSiteVm {
        number: site.id + 1,
        tm: format_tm(site.tm),
        location: site.location(),
        strand: site.ori,
        name: site.name.clone(),
        sequence: site.seq.clone(),
        genome_rows: wrap_sequence(&site.genome, SEQUENCE_WRAP),
        browser_url: browser.map(|b| b.region_url(&site.chrom, site.pos, site.pos + len)),
    }
}

fn collection_view<R, T>(
    records: &[R],
    offset: usize,
    ctx: &RenderContext,
    identifier: Option<&str>,
    kinds: (DownloadKind, DownloadKind),
    to_vm: impl Fn(&R) -> T,
) -> CollectionView<T> {
    let (start, stop, controls) = page_window(offset, records.len(), ctx.page_size);
    let links = match (ctx.api_url, identifier) {
        (Some(api), Some(id)) if !records.is_empty() => {
            Some((download_url(api, id, kinds.0), download_url(api, id, kinds.1)))
        }
        _ => None,
    };
    let (download_csv, download_json) = links.unzip();
    CollectionView {
        total: records.len(),
        offset: start,
        stop,
        controls,
        download_csv,
        download_json,
        records: records[start..stop].iter().map(to_vm).collect(),
    }
}

/// Build the complete view of a result set at the given offsets.
///
/// Pure: the same payload, offsets and context always give the same view.
pub fn render_results(payload: &Payload, offsets: ViewOffsets, ctx: &RenderContext) -> ResultView {
    let amp_count = payload.amplicons().len();
    let primer_count = payload.primer_sites().len();

    let mut banners = Vec::with_capacity(2);
    let mut active = Collection::Amplicons;
    if amp_count == 0 {
        banners.push(Banner {
            level: BannerLevel::Warning,
            text: "No Amplicons Found!".to_string(),
        });
        active = Collection::Primers;
    } else {
        banners.push(Banner {
            level: BannerLevel::Success,
            text: format!("{amp_count} Amplicons Found!"),
        });
    }
    if primer_count == 0 {
        banners.push(Banner {
            level: BannerLevel::Warning,
            text: "No Primer Binding Sites Found!".to_string(),
        });
    } else {
        banners.push(Banner {
            level: BannerLevel::Success,
            text: format!("{primer_count} Primer Binding Sites Found!"),
        });
    }

    let identifier = payload.identifier();
    let browser = ctx.browser;
    ResultView {
        banners,
        permalink: ctx
            .link_base
            .zip(identifier)
            .map(|(base, id)| permalink(base, id)),
        active,
        amplicons: collection_view(
            payload.amplicons(),
            offsets.amplicons,
            ctx,
            identifier,
            (DownloadKind::AmpliconCsv, DownloadKind::AmpliconJson),
            |a| amplicon_vm(a, browser),
        ),
        primers: collection_view(
            payload.primer_sites(),
            offsets.primers,
            ctx,
            identifier,
            (DownloadKind::PrimerCsv, DownloadKind::PrimerJson),
            |p| primer_site_vm(p, browser),
        ),
    }
}
