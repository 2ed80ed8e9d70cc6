use std::error::Error;
use std::fmt;

use crate::gateway::FailureDetail;

#[derive(Debug)]
pub enum SilicaError {
    /// A local results file could not be read back as a result set.
    ImportParse(String),
    Export(String),
    Config(String),
    Gateway(FailureDetail),
    Io(std::io::Error),
    Serde(serde_json::Error),
    Csv(csv::Error),
}

impl Error for SilicaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SilicaError::Gateway(e) => Some(e),
            SilicaError::Io(e) => Some(e),
            SilicaError::Serde(e) => Some(e),
            SilicaError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for SilicaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SilicaError::ImportParse(msg) => write!(f, "Could not import results: {msg}"),
            SilicaError::Export(msg) => write!(f, "Could not export results: {msg}"),
            SilicaError::Config(msg) => write!(f, "Invalid configuration: {msg}"),
            SilicaError::Gateway(e) => write!(f, "{e}"),
            SilicaError::Io(e) => write!(f, "{e}"),
            SilicaError::Serde(e) => write!(f, "{e}"),
            SilicaError::Csv(e) => write!(f, "{e}"),
        }
    }
}

impl From<FailureDetail> for SilicaError {
    fn from(err: FailureDetail) -> Self {
        SilicaError::Gateway(err)
    }
}

impl From<std::io::Error> for SilicaError {
    fn from(err: std::io::Error) -> Self {
        SilicaError::Io(err)
    }
}

impl From<serde_json::Error> for SilicaError {
    fn from(err: serde_json::Error) -> Self {
        SilicaError::Serde(err)
    }
}

impl From<csv::Error> for SilicaError {
    fn from(err: csv::Error) -> Self {
        SilicaError::Csv(err)
    }
}
