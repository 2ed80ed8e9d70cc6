//! Requests against the silica service. Both job requests come back as a
//! `Result<Payload, FailureDetail>`; the caller decides what to do with it.

use itertools::Itertools;
use reqwest::blocking::{Client, Response, multipart::Form};
use silica_protocol::{GenomeIndexEntry, JobParameters, Payload, ServiceErrorBody};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Why a request produced no result set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureDetail {
    /// Service unreachable, or it answered with something that is not a
    /// result or error document.
    Transport(String),
    /// The service rejected the job with one or more titled errors.
    Service(Vec<String>),
}

impl FailureDetail {
    pub fn message(&self) -> String {
        match self {
            FailureDetail::Transport(text) => text.clone(),
            FailureDetail::Service(titles) => titles.iter().join("; "),
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl Error for FailureDetail {}

/// Interpret a non-success response body.
pub fn failure_from_response(status: u16, body: &str) -> FailureDetail {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => FailureDetail::Service(parsed.titles()),
        _ => FailureDetail::Transport(format!("Request failed with status code {status}")),
    }
}

pub trait Gateway: Send + Sync {
    fn submit(&self, params: &JobParameters) -> Result<Payload, FailureDetail>;
    fn retrieve(&self, identifier: &str) -> Result<Payload, FailureDetail>;
    /// Genomes the service can search against.
    fn genome_index(&self) -> Result<Vec<GenomeIndexEntry>, FailureDetail>;
}

/// Blocking HTTP gateway; the controller runs it off the UI thread.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    api_url: Url,
}

impl HttpGateway {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, FailureDetail> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FailureDetail::Transport(format!("Could not create HTTP client: {e}")))?;
        Self::with_client(client, api_url)
    }

    pub fn with_client(client: Client, api_url: &str) -> Result<Self, FailureDetail> {
        let api_url = Url::parse(api_url)
            .map_err(|e| FailureDetail::Transport(format!("Invalid service URL '{api_url}': {e}")))?;
        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FailureDetail> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FailureDetail::Transport(format!("Service URL '{}' cannot take a path", self.api_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn read_body(response: Result<Response, reqwest::Error>) -> Result<String, FailureDetail> {
        let response = response.map_err(|e| FailureDetail::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FailureDetail::Transport(format!("Could not read service response: {e}")))?;
        if status.is_success() {
            Ok(body)
        } else {
            let failure = failure_from_response(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %failure, "Service request failed");
            Err(failure)
        }
    }

    fn read_payload(response: Result<Response, reqwest::Error>) -> Result<Payload, FailureDetail> {
        let body = Self::read_body(response)?;
        Payload::from_json_str(&body)
            .map_err(|e| FailureDetail::Transport(format!("Malformed result document: {e}")))
    }
}

impl Gateway for HttpGateway {
    fn submit(&self, params: &JobParameters) -> Result<Payload, FailureDetail> {
        let url = self.endpoint(&["upload"])?;
        let form = params
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        debug!(%url, genome = %params.genome, "Submitting job");
        Self::read_payload(self.client.post(url).multipart(form).send())
    }

    fn retrieve(&self, identifier: &str) -> Result<Payload, FailureDetail> {
        let url = self.endpoint(&["results", identifier])?;
        debug!(%url, "Retrieving job");
        Self::read_payload(self.client.get(url).send())
    }

    fn genome_index(&self) -> Result<Vec<GenomeIndexEntry>, FailureDetail> {
        let url = self.endpoint(&["genomeindex"])?;
        debug!(%url, "Fetching genome index");
        let body = Self::read_body(self.client.post(url).send())?;
        serde_json::from_str(&body)
            .map_err(|e| FailureDetail::Transport(format!("Malformed genome index: {e}")))
    }
}
