use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{ApiClient, HttpTransport};
use crate::session::Navigator;
use crate::storage::KeyValueStore;

pub const SEARCH_PATH: &str = "/dashboard/search";
pub const SEARCH_QUERY_PARAM: &str = "q";
pub const NO_RESULTS_TEXT: &str = "No results found";
pub const PANEL_HIDDEN_CLASS: &str = "d-none";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    pub min_query_chars: usize,
    pub debounce: Duration,
    /// Delay between blur and hiding, so a click on a result still lands.
    pub blur_grace: Duration,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            debounce: Duration::from_millis(300),
            blur_grace: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// Query too short: hide the panel now and cancel any pending dispatch.
    Clear,
    /// Replace any pending dispatch with this one after `delay`.
    Schedule { ticket: SearchTicket, delay: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPanel {
    Empty,
    Results(Vec<SearchResult>),
}

/// Keystroke sequencing for the global search box. Every input event advances
/// `latest_seq`; a response is rendered only while its ticket is still the
/// latest input.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    policy: SearchPolicy,
    latest_seq: u64,
}

impl SearchSession {
    pub fn new(policy: SearchPolicy) -> Self {
        Self {
            policy,
            latest_seq: 0,
        }
    }

    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn on_input(&mut self, raw: &str) -> SearchInput {
        self.latest_seq = self.latest_seq.saturating_add(1);
        let query = raw.trim();
        if query.chars().count() < self.policy.min_query_chars {
            return SearchInput::Clear;
        }
        SearchInput::Schedule {
            ticket: SearchTicket {
                seq: self.latest_seq,
                query: query.to_string(),
            },
            delay: self.policy.debounce,
        }
    }

    pub fn is_latest(&self, ticket: &SearchTicket) -> bool {
        ticket.seq == self.latest_seq
    }

    /// Panel contents for a response, or `None` when a newer keystroke has
    /// superseded the ticket.
    pub fn accept(&self, ticket: &SearchTicket, results: Vec<SearchResult>) -> Option<SearchPanel> {
        if !self.is_latest(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale search response"
            );
            return None;
        }
        if results.is_empty() {
            Some(SearchPanel::Empty)
        } else {
            Some(SearchPanel::Results(results))
        }
    }

    pub fn blur_delay(&self) -> Duration {
        self.policy.blur_grace
    }
}

pub async fn fetch_results<T, S, N>(
    client: &ApiClient<T, S, N>,
    ticket: &SearchTicket,
) -> Result<Vec<SearchResult>, ApiError>
where
    T: HttpTransport,
    S: KeyValueStore,
    N: Navigator,
{
    client
        .get_json(SEARCH_PATH, &[(SEARCH_QUERY_PARAM, ticket.query.as_str())])
        .await
}

/// Debounced dispatch for one scheduled ticket: waits out `delay`, then sends
/// the request only if no later keystroke arrived in the meantime. A
/// superseded ticket never reaches the transport.
pub async fn search_after_quiet<T, S, N, Sleep, SleepFut>(
    session: &RefCell<SearchSession>,
    client: &ApiClient<T, S, N>,
    ticket: SearchTicket,
    delay: Duration,
    sleep: Sleep,
) -> Result<Option<SearchPanel>, ApiError>
where
    T: HttpTransport,
    S: KeyValueStore,
    N: Navigator,
    Sleep: FnOnce(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    sleep(delay).await;
    if !session.borrow().is_latest(&ticket) {
        tracing::debug!(seq = ticket.seq, "search cancelled by later input");
        return Ok(None);
    }
    let results = fetch_results(client, &ticket).await?;
    Ok(session.borrow().accept(&ticket, results))
}
