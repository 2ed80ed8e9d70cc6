use serde::{Deserialize, Serialize};

/// The primer pair the service documentation uses as its worked example.
pub const SAMPLE_FASTA: &str = ">FGA_f\nGCCCCATAGGTTTTGAACTCA\n>FGA_r\nTGATTTGTCTGTAATTGCCAGC\n";
pub const SAMPLE_GENOME: &str = "Homo_sapiens.GRCh37.dna.primary_assembly.fa.gz";

/// Everything one analysis job is submitted with.
///
/// Field names are the multipart form names the service expects, so a
/// parameter file uses the same keys. Nothing has a default: a missing key is
/// a parse error rather than a silently guessed value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobParameters {
    #[serde(rename = "fastaText")]
    pub fasta_text: String,
    pub genome: String,
    /// Maximum PCR product size in bp.
    #[serde(rename = "setAmpSize")]
    pub amp_size: u32,
    /// Minimal primer Tm in °C.
    #[serde(rename = "setTmCutoff")]
    pub tm_cutoff: f64,
    #[serde(rename = "setKmer")]
    pub kmer: u32,
    /// Maximal number of mismatches, 0 or 1.
    #[serde(rename = "setDist")]
    pub distance: u32,
    /// Keep only products with a lower penalty; -1 keeps everything.
    #[serde(rename = "setCutoffPen")]
    pub cutoff_penalty: f64,
    #[serde(rename = "setPenTmDiff")]
    pub penalty_tm_diff: f64,
    #[serde(rename = "setPenTmMismatch")]
    pub penalty_tm_mismatch: f64,
    #[serde(rename = "setPenLength")]
    pub penalty_length: f64,
    /// Monovalent ions, mMol.
    #[serde(rename = "setCtmMv")]
    pub monovalent: f64,
    /// Divalent ions, mMol.
    #[serde(rename = "setCtmDv")]
    pub divalent: f64,
    /// Annealing oligos, nMol.
    #[serde(rename = "setCtmDNA")]
    pub dna: f64,
    /// Sum of all dNTPs, mMol.
    #[serde(rename = "setCtmDNTP")]
    pub dntp: f64,
}

impl JobParameters {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Form fields in submission order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fastaText", self.fasta_text.clone()),
            ("genome", self.genome.clone()),
            ("setAmpSize", self.amp_size.to_string()),
            ("setTmCutoff", self.tm_cutoff.to_string()),
            ("setKmer", self.kmer.to_string()),
            ("setDist", self.distance.to_string()),
            ("setCutoffPen", self.cutoff_penalty.to_string()),
            ("setPenTmDiff", self.penalty_tm_diff.to_string()),
            ("setPenTmMismatch", self.penalty_tm_mismatch.to_string()),
            ("setPenLength", self.penalty_length.to_string()),
            ("setCtmMv", self.monovalent.to_string()),
            ("setCtmDv", self.divalent.to_string()),
            ("setCtmDNA", self.dna.to_string()),
            ("setCtmDNTP", self.dntp.to_string()),
        ]
    }
}

/// One selectable genome as listed by the service's genome index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeIndexEntry {
    pub name: String,
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS_JSON: &str = r#"{
  "fastaText": ">FGA_f\nGCCCCATAGGTTTTGAACTCA\n",
  "genome": "Homo_sapiens.GRCh37.dna.primary_assembly.fa.gz",
  "setAmpSize": 2000,
  "setTmCutoff": 40.0,
  "setKmer": 15,
  "setDist": 1,
  "setCutoffPen": -1.0,
  "setPenTmDiff": 0.6,
  "setPenTmMismatch": 0.4,
  "setPenLength": 0.001,
  "setCtmMv": 50.0,
  "setCtmDv": 1.5,
  "setCtmDNA": 50.0,
  "setCtmDNTP": 0.6
}"#;

    #[test]
    fn test_parse_parameters_file() {
        let params = JobParameters::from_json_str(PARAMS_JSON).unwrap();
        assert_eq!(params.amp_size, 2000);
        assert_eq!(params.kmer, 15);
        assert_eq!(params.cutoff_penalty, -1.0);
        assert_eq!(params.genome, SAMPLE_GENOME);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let text = PARAMS_JSON.replace("\"setKmer\": 15,", "");
        let err = JobParameters::from_json_str(&text).unwrap_err();
        assert!(err.to_string().contains("setKmer"));
    }

    #[test]
    fn test_form_fields_cover_every_parameter() {
        let params = JobParameters::from_json_str(PARAMS_JSON).unwrap();
        let fields = params.form_fields();
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[0].0, "fastaText");
        assert!(fields.contains(&("setPenLength", "0.001".to_string())));
        assert!(fields.contains(&("setCutoffPen", "-1".to_string())));
        assert!(fields.contains(&("setAmpSize", "2000".to_string())));
    }
}
