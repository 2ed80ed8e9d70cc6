use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Binding orientation of a primer site. Changes how `Pos` is read:
/// forward sites start at `Pos`, reverse sites end there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One PCR product bounded by a forward and a reverse primer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Amplicon {
    /// Zero-based, server assigned.
    pub id: u64,
    pub length: u64,
    pub penalty: f64,
    pub chrom: String,
    pub for_pos: i64,
    pub for_tm: f64,
    pub for_name: String,
    pub for_seq: String,
    pub rev_pos: i64,
    pub rev_tm: f64,
    pub rev_name: String,
    pub rev_seq: String,
    /// Full amplicon sequence, uppercase.
    pub seq: String,
}

impl Amplicon {
    /// `chrom:forPos-revPos`
    pub fn location(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.for_pos, self.rev_pos)
    }
}

/// A single place where one primer anchors to the genome.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrimerSite {
    pub id: u64,
    pub tm: f64,
    pub chrom: String,
    pub pos: i64,
    pub ori: Strand,
    pub name: String,
    pub seq: String,
    /// Genome context around the binding site.
    pub genome: String,
}

impl PrimerSite {
    /// Genomic span covered by the primer, `(start, end)`.
    pub fn span(&self) -> (i64, i64) {
        let len = self.seq.chars().count() as i64;
        match self.ori {
            Strand::Reverse => (self.pos - len, self.pos),
            Strand::Forward => (self.pos, self.pos + len),
        }
    }

    pub fn location(&self) -> String {
        let (start, end) = self.span();
        format!("{}:{start}-{end}", self.chrom)
    }
}

const GENOME_KEY: &str = "genome";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub amplicons: Vec<Amplicon>,
    pub primers: Vec<PrimerSite>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result set of one analysis job, exactly as the service sent it.
///
/// Fields the client does not interpret are kept in `extra` so a JSON
/// export reproduces the document that was loaded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub data: PayloadData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Payload {
    pub fn new(uuid: &str, amplicons: Vec<Amplicon>, primers: Vec<PrimerSite>) -> Self {
        Self {
            data: PayloadData {
                uuid: Some(uuid.to_string()),
                amplicons,
                primers,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Job identifier. The service has placed it both inside `data` and at
    /// the top level over time; `data.uuid` wins.
    pub fn identifier(&self) -> Option<&str> {
        self.data
            .uuid
            .as_deref()
            .or_else(|| self.extra.get("uuid").and_then(Value::as_str))
            .filter(|s| !s.is_empty())
    }

    /// Genome the job was run against, when recorded with the result set.
    pub fn genome(&self) -> Option<&str> {
        self.data
            .extra
            .get(GENOME_KEY)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn set_genome(&mut self, genome: &str) {
        self.data
            .extra
            .insert(GENOME_KEY.to_string(), Value::String(genome.to_string()));
    }

    pub fn amplicons(&self) -> &[Amplicon] {
        &self.data.amplicons
    }

    pub fn primer_sites(&self) -> &[PrimerSite] {
        &self.data.primers
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorItem {
    #[serde(default)]
    pub title: String,
}

/// Error document returned with non-success statuses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub errors: Vec<ServiceErrorItem>,
}

impl ServiceErrorBody {
    pub fn titles(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.title.clone()).collect()
    }
}
