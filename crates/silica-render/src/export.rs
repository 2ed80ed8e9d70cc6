use crate::view::{format_penalty, format_tm};
use silica_protocol::Payload;

pub const AMPLICON_TABLE_HEADER: [&str; 11] = [
    "Number",
    "Length",
    "Penalty",
    "Location",
    "Forward Name",
    "Forward Tm",
    "Forward Sequence",
    "Reverse Name",
    "Reverse Tm",
    "Reverse Sequence",
    "Amplicon Sequence",
];

pub const PRIMER_TABLE_HEADER: [&str; 7] = [
    "Number",
    "Primer Tm",
    "Location",
    "Strand",
    "Primer Name",
    "Primer Sequence",
    "Genome Sequence",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    AmpliconTable,
    PrimerTable,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Json, Self::AmpliconTable, Self::PrimerTable];

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "amplicons" | "amplicon" | "amplicon-tsv" => Some(Self::AmpliconTable),
            "primers" | "primer" | "primer-tsv" => Some(Self::PrimerTable),
            _ => None,
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Json => "silica.json",
            Self::AmpliconTable => "silica_amplicons.tsv",
            Self::PrimerTable => "silica_primers.tsv",
        }
    }

    /// Encode the whole payload; pagination never affects exports.
    pub fn encode(self, payload: &Payload) -> Result<String, String> {
        match self {
            Self::Json => {
                export_json(payload).map_err(|e| format!("Could not serialize results: {e}"))
            }
            Self::AmpliconTable => export_amplicon_table(payload)
                .map_err(|e| format!("Could not write amplicon table: {e}")),
            Self::PrimerTable => export_primer_table(payload)
                .map_err(|e| format!("Could not write primer table: {e}")),
        }
    }
}

/// The payload as loaded, full precision.
pub fn export_json(payload: &Payload) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn tsv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, csv::Error> {
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn export_amplicon_table(payload: &Payload) -> Result<String, csv::Error> {
    let mut writer = tsv_writer();
    writer.write_record(AMPLICON_TABLE_HEADER)?;
    for amp in payload.amplicons() {
        writer.write_record([
            (amp.id + 1).to_string(),
            amp.length.to_string(),
            format_penalty(amp.penalty),
            amp.location(),
            amp.for_name.clone(),
            format_tm(amp.for_tm),
            amp.for_seq.clone(),
            amp.rev_name.clone(),
            format_tm(amp.rev_tm),
            amp.rev_seq.clone(),
            amp.seq.clone(),
        ])?;
    }
    finish(writer)
}

pub fn export_primer_table(payload: &Payload) -> Result<String, csv::Error> {
    let mut writer = tsv_writer();
    writer.write_record(PRIMER_TABLE_HEADER)?;
    for site in payload.primer_sites() {
        writer.write_record([
            (site.id + 1).to_string(),
            format_tm(site.tm),
            site.location(),
            site.ori.to_string(),
            site.name.clone(),
            site.seq.clone(),
            site.genome.clone(),
        ])?;
    }
    finish(writer)
}
