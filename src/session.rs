use crate::gateway::FailureDetail;
use silica_protocol::Payload;
use silica_render::{Collection, PAGE_SIZE, ViewOffsets};
use tracing::{debug, info};

/// Tag of one outgoing request. Only the newest token may change the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedResult {
    pub payload: Payload,
    pub offsets: ViewOffsets,
    /// Genome the job was submitted against, when known.
    pub genome: Option<String>,
}

impl LoadedResult {
    /// Offsets start at the first page; the genome comes from the payload.
    fn new(payload: Payload) -> Self {
        let genome = payload.genome().map(str::to_string);
        Self {
            payload,
            offsets: ViewOffsets::default(),
            genome,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Loaded(LoadedResult),
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request or an import superseded this one.
    Discarded,
}

/// The single source of truth for what is on screen.
#[derive(Clone, Debug)]
pub struct Session {
    status: SessionStatus,
    latest: u64,
    pending_genome: Option<String>,
    page_size: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Session {
    pub fn new(page_size: usize) -> Self {
        Self {
            status: SessionStatus::Idle,
            latest: 0,
            pending_genome: None,
            page_size: page_size.max(1),
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, SessionStatus::Loading)
    }

    pub fn loaded(&self) -> Option<&LoadedResult> {
        match &self.status {
            SessionStatus::Loaded(result) => Some(result),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.loaded().map(|r| &r.payload)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn advance(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Enter `Loading` for a new submit or retrieve. Any earlier result or
    /// error is dropped and every older token becomes stale.
    pub fn begin_request(&mut self, genome: Option<String>) -> RequestToken {
        let token = self.advance();
        self.pending_genome = genome;
        self.status = SessionStatus::Loading;
        debug!(token = token.0, "Session loading");
        token
    }

    /// Apply the outcome of the request tagged `token`, unless it is stale.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<Payload, FailureDetail>,
    ) -> Completion {
        if !self.is_current(token) || !self.is_loading() {
            info!(
                token = token.0,
                latest = self.latest,
                "Discarding superseded response"
            );
            return Completion::Discarded;
        }
        self.status = match outcome {
            Ok(mut payload) => {
                if let Some(genome) = self.pending_genome.take() {
                    payload.set_genome(&genome);
                }
                info!(
                    identifier = payload.identifier().unwrap_or("-"),
                    amplicons = payload.amplicons().len(),
                    primers = payload.primer_sites().len(),
                    "Result set loaded"
                );
                SessionStatus::Loaded(LoadedResult::new(payload))
            }
            Err(failure) => {
                self.pending_genome = None;
                SessionStatus::Failed(failure.message())
            }
        };
        Completion::Applied
    }

    /// Replace whatever is shown with `payload`, as after a fresh retrieval.
    /// Also supersedes requests still in flight.
    pub fn load_payload(&mut self, payload: Payload) {
        self.advance();
        self.pending_genome = None;
        self.status = SessionStatus::Loaded(LoadedResult::new(payload));
    }

    pub fn page_down(&mut self, collection: Collection) -> bool {
        let page = self.page_size;
        let SessionStatus::Loaded(result) = &mut self.status else {
            return false;
        };
        let count = match collection {
            Collection::Amplicons => result.payload.amplicons().len(),
            Collection::Primers => result.payload.primer_sites().len(),
        };
        let offset = result.offsets.get_mut(collection);
        if *offset + page < count {
            *offset += page;
            true
        } else {
            false
        }
    }

    pub fn page_up(&mut self, collection: Collection) -> bool {
        let page = self.page_size;
        let SessionStatus::Loaded(result) = &mut self.status else {
            return false;
        };
        let offset = result.offsets.get_mut(collection);
        if *offset == 0 {
            return false;
        }
        *offset = offset.saturating_sub(page);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silica_protocol::{Amplicon, PrimerSite};

    fn payload(id: &str, amps: u64, primers: u64) -> Payload {
        Payload::new(
            id,
            (0..amps)
                .map(|i| Amplicon {
                    id: i,
                    ..Default::default()
                })
                .collect(),
            (0..primers)
                .map(|i| PrimerSite {
                    id: i,
                    ..Default::default()
                })
                .collect(),
        )
    }

    #[test]
    fn test_request_lifecycle() {
        let mut session = Session::default();
        assert_eq!(session.status(), &SessionStatus::Idle);
        let token = session.begin_request(Some("hg".to_string()));
        assert!(session.is_loading());
        assert_eq!(session.complete(token, Ok(payload("a", 3, 3))), Completion::Applied);
        let loaded = session.loaded().unwrap();
        assert_eq!(loaded.offsets, ViewOffsets::default());
        assert_eq!(loaded.genome.as_deref(), Some("hg"));
    }

    #[test]
    fn test_submitted_genome_travels_with_payload() {
        let mut session = Session::default();
        let token = session.begin_request(Some("hg".to_string()));
        session.complete(token, Ok(payload("a", 1, 1)));
        let exported = session.payload().unwrap().clone();
        assert_eq!(exported.genome(), Some("hg"));

        let mut other = Session::default();
        other.load_payload(exported.clone());
        assert_eq!(other.loaded().unwrap().genome.as_deref(), Some("hg"));

        let token = other.begin_request(None);
        other.complete(token, Ok(exported));
        assert_eq!(other.loaded().unwrap().genome.as_deref(), Some("hg"));
    }

    #[test]
    fn test_failure_keeps_message_and_hides_results() {
        let mut session = Session::default();
        let token = session.begin_request(None);
        session.complete(
            token,
            Err(FailureDetail::Service(vec!["A".to_string(), "B".to_string()])),
        );
        assert_eq!(session.error_message(), Some("A; B"));
        assert!(session.payload().is_none());

        session.begin_request(None);
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_stale_token_is_discarded() {
        let mut session = Session::default();
        let first = session.begin_request(None);
        let second = session.begin_request(None);
        assert_eq!(session.complete(second, Ok(payload("b", 1, 1))), Completion::Applied);
        assert_eq!(session.complete(first, Ok(payload("a", 1, 1))), Completion::Discarded);
        assert_eq!(session.payload().unwrap().identifier(), Some("b"));
    }

    #[test]
    fn test_duplicate_completion_is_discarded() {
        let mut session = Session::default();
        let token = session.begin_request(None);
        session.complete(token, Ok(payload("a", 1, 1)));
        assert_eq!(
            session.complete(token, Err(FailureDetail::Transport("late".to_string()))),
            Completion::Discarded
        );
        assert!(session.loaded().is_some());
    }

    #[test]
    fn test_import_supersedes_in_flight_request() {
        let mut session = Session::default();
        let token = session.begin_request(None);
        session.load_payload(payload("imported", 2, 2));
        assert_eq!(session.complete(token, Ok(payload("net", 1, 1))), Completion::Discarded);
        assert_eq!(session.payload().unwrap().identifier(), Some("imported"));
    }

    #[test]
    fn test_pagination_keeps_offsets_on_page_grid() {
        let mut session = Session::default();
        session.load_payload(payload("a", 65, 10));
        assert!(!session.page_up(Collection::Amplicons));
        assert!(session.page_down(Collection::Amplicons));
        assert!(session.page_down(Collection::Amplicons));
        assert!(!session.page_down(Collection::Amplicons));
        let offsets = session.loaded().unwrap().offsets;
        assert_eq!(offsets.amplicons, 60);
        assert_eq!(offsets.primers, 0);
        assert!(!session.page_down(Collection::Primers));
        assert!(session.page_up(Collection::Amplicons));
        assert_eq!(session.loaded().unwrap().offsets.amplicons, 30);
    }

    #[test]
    fn test_pagination_invariant_holds_for_any_sequence() {
        for count in [0u64, 1, 29, 30, 31, 59, 60, 61, 95] {
            let mut session = Session::default();
            session.load_payload(payload("a", count, 0));
            for step in 0..12 {
                if step % 3 == 2 {
                    session.page_up(Collection::Amplicons);
                } else {
                    session.page_down(Collection::Amplicons);
                }
                let offset = session.loaded().unwrap().offsets.amplicons;
                assert!(offset <= count as usize);
                assert_eq!(offset % PAGE_SIZE, 0);
            }
        }
    }

    #[test]
    fn test_new_payload_resets_offsets() {
        let mut session = Session::default();
        session.load_payload(payload("a", 90, 90));
        session.page_down(Collection::Amplicons);
        session.page_down(Collection::Primers);
        let token = session.begin_request(None);
        session.complete(token, Ok(payload("b", 90, 90)));
        assert_eq!(session.loaded().unwrap().offsets, ViewOffsets::default());
    }

    #[test]
    fn test_pagination_without_results_is_noop() {
        let mut session = Session::default();
        assert!(!session.page_down(Collection::Amplicons));
        assert!(!session.page_up(Collection::Primers));
    }
}
