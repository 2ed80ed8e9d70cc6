//! The result-session controller: owns the session, runs gateway calls off
//! the UI thread and folds their replies back in, newest request first.

use crate::config::ClientConfig;
use crate::error::SilicaError;
use crate::gateway::{FailureDetail, Gateway};
use crate::genomes::GenomeCatalog;
use crate::session::{Completion, RequestToken, Session};
use silica_protocol::{JobParameters, Payload};
use silica_render::{Collection, ExportFormat, ResultView, render_results};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, info, warn};

struct Reply {
    token: RequestToken,
    outcome: Result<Payload, FailureDetail>,
}

enum Job {
    Submit(JobParameters),
    Retrieve(String),
}

pub struct Controller<G: Gateway + 'static> {
    gateway: Arc<G>,
    session: Session,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
    in_flight: usize,
}

impl<G: Gateway + 'static> Controller<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_session(gateway, Session::default())
    }

    pub fn with_session(gateway: G, session: Session) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            gateway: Arc::new(gateway),
            session,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Requests started whose replies have not been folded in yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn submit(&mut self, params: JobParameters) -> RequestToken {
        let token = self.session.begin_request(Some(params.genome.clone()));
        self.dispatch(token, Job::Submit(params));
        token
    }

    pub fn retrieve(&mut self, identifier: &str) -> RequestToken {
        let token = self.session.begin_request(None);
        self.dispatch(token, Job::Retrieve(identifier.to_string()));
        token
    }

    fn dispatch(&mut self, token: RequestToken, job: Job) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("silica-request-{}", token.value()))
            .spawn(move || {
                let outcome = match &job {
                    Job::Submit(params) => gateway.submit(params),
                    Job::Retrieve(identifier) => gateway.retrieve(identifier),
                };
                // The controller may be gone; nothing left to update then.
                let _ = tx.send(Reply { token, outcome });
            });
        match spawned {
            Ok(_) => {
                self.in_flight += 1;
                debug!(token = token.value(), "Request dispatched");
            }
            Err(e) => {
                warn!(error = %e, "Could not start request thread");
                self.session.complete(
                    token,
                    Err(FailureDetail::Transport(format!("Could not start request: {e}"))),
                );
            }
        }
    }

    fn apply(&mut self, reply: Reply) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.session.complete(reply.token, reply.outcome)
    }

    /// Fold in every reply that has already arrived, without blocking.
    /// Returns how many changed the session.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(reply) = self.rx.try_recv() {
            if self.apply(reply) == Completion::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Block for the next reply and fold it in. `None` when nothing is in
    /// flight.
    pub fn wait_next(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let reply = self.rx.recv().ok()?;
        Some(self.apply(reply))
    }

    /// Block until the session has left `Loading`.
    pub fn wait_settled(&mut self) {
        while self.session.is_loading() {
            if self.wait_next().is_none() {
                break;
            }
        }
    }

    pub fn page_down(&mut self, collection: Collection) -> bool {
        self.session.page_down(collection)
    }

    pub fn page_up(&mut self, collection: Collection) -> bool {
        self.session.page_up(collection)
    }

    /// Load a previously exported JSON document. On failure the session is
    /// left exactly as it was.
    pub fn import_json_str(&mut self, text: &str) -> Result<(), SilicaError> {
        let payload = Payload::from_json_str(text)
            .map_err(|e| SilicaError::ImportParse(e.to_string()))?;
        info!(
            identifier = payload.identifier().unwrap_or("-"),
            "Importing result set"
        );
        self.session.load_payload(payload);
        Ok(())
    }

    pub fn import_json_file(&mut self, path: &Path) -> Result<(), SilicaError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SilicaError::ImportParse(format!("Could not read '{}': {e}", path.display()))
        })?;
        self.import_json_str(&text)
    }

    /// Encode the loaded result set. `None` when nothing is loaded.
    pub fn export(&self, format: ExportFormat) -> Option<Result<String, SilicaError>> {
        let payload = self.session.payload()?;
        Some(format.encode(payload).map_err(SilicaError::Export))
    }

    /// Current view of the loaded result set.
    pub fn view(&self, config: &ClientConfig, catalog: &GenomeCatalog) -> Option<ResultView> {
        let loaded = self.session.loaded()?;
        let browser = loaded
            .genome
            .as_deref()
            .and_then(|g| catalog.browser_target(g));
        let ctx = config.render_context(browser.as_ref());
        Some(render_results(&loaded.payload, loaded.offsets, &ctx))
    }
}
