use crate::view::{
    AmpliconVm, BannerLevel, Collection, CollectionView, PageControls, PrimerSiteVm, ResultView,
};
use std::fmt::Write;

fn push_controls_hint(out: &mut String, controls: PageControls, up: &str, down: &str) {
    let mut hints = vec![];
    if controls.up {
        hints.push(up);
    }
    if controls.down {
        hints.push(down);
    }
    if !hints.is_empty() {
        let _ = writeln!(out, "[{}]", hints.join(" | "));
    }
}

fn push_downloads<T>(out: &mut String, view: &CollectionView<T>) {
    if let (Some(csv), Some(json)) = (&view.download_csv, &view.download_json) {
        let _ = writeln!(out, "Download all as CSV: {csv}");
        let _ = writeln!(out, "Download all as JSON: {json}");
    }
}

fn push_amplicon(out: &mut String, amp: &AmpliconVm) {
    let _ = writeln!(out, "Amplicon {}", amp.number);
    let _ = writeln!(out, "  Length: {} bp", amp.length_bp);
    let _ = writeln!(out, "  Penalty: {}", amp.penalty);
    let _ = writeln!(out, "  Location: {}", amp.location);
    let _ = writeln!(out, "  Forward Primer Name: {}", amp.forward.name);
    let _ = writeln!(out, "  Forward Primer Tm: {}°C", amp.forward.tm);
    let _ = writeln!(out, "  Forward Primer Sequence: {}", amp.forward.sequence);
    let _ = writeln!(out, "  Reverse Primer Name: {}", amp.reverse.name);
    let _ = writeln!(out, "  Reverse Primer Tm: {}°C", amp.reverse.tm);
    let _ = writeln!(out, "  Reverse Primer Sequence: {}", amp.reverse.sequence);
    if let Some(url) = &amp.browser_url {
        let _ = writeln!(out, "  View in Genome Browser: {url}");
    }
    let _ = writeln!(out, "  Amplicon Sequence:");
    for row in &amp.sequence_rows {
        let _ = writeln!(out, "    {row}");
    }
}

fn push_primer_site(out: &mut String, site: &PrimerSiteVm) {
    let _ = writeln!(out, "Primer Binding Site {}", site.number);
    let _ = writeln!(out, "  Primer Tm: {}°C", site.tm);
    let _ = writeln!(out, "  Location: {} on {}", site.location, site.strand);
    let _ = writeln!(out, "  Primer Name: {}", site.name);
    let _ = writeln!(out, "  Primer Sequence: {}", site.sequence);
    if let Some(url) = &site.browser_url {
        let _ = writeln!(out, "  View in Genome Browser: {url}");
    }
    let _ = writeln!(out, "  Genome Sequence:");
    for row in &site.genome_rows {
        let _ = writeln!(out, "    {row}");
    }
}

/// Banners and the result permalink.
pub fn summary_text(view: &ResultView) -> String {
    let mut out = String::new();
    for banner in &view.banners {
        let tag = match banner.level {
            BannerLevel::Success => "ok",
            BannerLevel::Warning => "warning",
        };
        let _ = writeln!(out, "[{tag}] {}", banner.text);
    }
    if let Some(link) = &view.permalink {
        let _ = writeln!(out, "Link to this result page: {link}");
    }
    out
}

/// The visible page of one collection.
pub fn collection_text(view: &ResultView, collection: Collection) -> String {
    let mut out = String::new();
    match collection {
        Collection::Amplicons => {
            let v = &view.amplicons;
            push_downloads(&mut out, v);
            if v.total > 0 {
                let _ = writeln!(out, "Amplicons {}-{} of {}", v.offset + 1, v.stop, v.total);
            }
            push_controls_hint(&mut out, v.controls, "amp-up", "amp-down");
            for amp in &v.records {
                push_amplicon(&mut out, amp);
            }
        }
        Collection::Primers => {
            let v = &view.primers;
            push_downloads(&mut out, v);
            if v.total > 0 {
                let _ = writeln!(
                    out,
                    "Primer binding sites {}-{} of {}",
                    v.offset + 1,
                    v.stop,
                    v.total
                );
            }
            push_controls_hint(&mut out, v.controls, "primer-up", "primer-down");
            for site in &v.records {
                push_primer_site(&mut out, site);
            }
        }
    }
    out
}

/// Summary followed by the page of the given collection.
pub fn full_text(view: &ResultView, collection: Collection) -> String {
    format!("{}\n{}", summary_text(view), collection_text(view, collection))
}
