use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{ApiClient, HttpTransport};
use crate::session::Navigator;
use crate::storage::KeyValueStore;

pub const NOTIFICATIONS_PATH: &str = "/dashboard/notifications";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const NO_NOTIFICATIONS_TEXT: &str = "No new notifications";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl Notification {
    pub fn title_class(&self) -> String {
        format!("fw-bold small text-{}", self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationBadge {
    pub text: String,
    pub visible: bool,
}

impl NotificationBadge {
    pub fn for_feed(notifications: &[Notification]) -> Self {
        Self {
            text: notifications.len().to_string(),
            visible: !notifications.is_empty(),
        }
    }

    pub fn display(&self) -> &'static str {
        if self.visible { "block" } else { "none" }
    }
}

pub async fn fetch_notifications<T, S, N>(
    client: &ApiClient<T, S, N>,
) -> Result<Vec<Notification>, ApiError>
where
    T: HttpTransport,
    S: KeyValueStore,
    N: Navigator,
{
    client.get_json(NOTIFICATIONS_PATH, &[]).await
}

/// Start/stop switch for a polling loop. Each `start` hands out a lease tied
/// to a new generation; `stop` or a later `start` invalidates older leases, and
/// a loop holding a stale lease exits at its next wake-up.
#[derive(Debug, Clone, Default)]
pub struct PollGate {
    generation: Rc<Cell<u64>>,
    running: Rc<Cell<bool>>,
}

#[derive(Debug, Clone)]
pub struct PollLease {
    generation: u64,
    gate: PollGate,
}

impl PollGate {
    pub fn start(&self) -> PollLease {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.running.set(true);
        PollLease {
            generation,
            gate: self.clone(),
        }
    }

    pub fn stop(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

impl PollLease {
    pub fn is_current(&self) -> bool {
        self.gate.generation.get() == self.generation
    }
}

/// Fixed-interval loop: one tick immediately, then one per `interval`, until
/// the lease goes stale. No backoff and no jitter; tick failures are the
/// tick's own concern.
pub async fn run_poll_loop<Tick, TickFut, Sleep, SleepFut>(
    lease: PollLease,
    interval: Duration,
    mut sleep: Sleep,
    mut tick: Tick,
) where
    Tick: FnMut() -> TickFut,
    TickFut: Future<Output = ()>,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    while lease.is_current() {
        tick().await;
        sleep(interval).await;
    }
    tracing::debug!(generation = lease.generation, "poll loop stopped");
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::http::testing::ScriptedTransport;
    use crate::session::SessionStore;
    use crate::session::testing::RecordingNavigator;
    use crate::storage::MemoryStore;

    fn note(kind: &str) -> Notification {
        Notification {
            id: Some("low_stock".to_string()),
            title: "Low Stock Alert".to_string(),
            message: "3 items are below reorder levels.".to_string(),
            time: "Just now".to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn badge_hidden_iff_feed_empty() {
        let empty = NotificationBadge::for_feed(&[]);
        assert!(!empty.visible);
        assert_eq!(empty.display(), "none");
        assert_eq!(empty.text, "0");

        let two = NotificationBadge::for_feed(&[note("warning"), note("danger")]);
        assert!(two.visible);
        assert_eq!(two.display(), "block");
        assert_eq!(two.text, "2");
    }

    #[test]
    fn title_class_is_derived_from_type() {
        assert_eq!(note("danger").title_class(), "fw-bold small text-danger");
    }

    #[test]
    fn decodes_server_payload_without_id() {
        let parsed: Vec<Notification> = serde_json::from_str(
            r#"[{"title":"Overdue Invoices","message":"2 overdue","type":"danger","time":"Today"}]"#,
        )
        .expect("decode");
        assert_eq!(parsed[0].id, None);
        assert_eq!(parsed[0].kind, "danger");
    }

    #[test]
    fn restarting_invalidates_previous_lease() {
        let gate = PollGate::default();
        let first = gate.start();
        assert!(first.is_current());

        let second = gate.start();
        assert!(!first.is_current());
        assert!(second.is_current());

        gate.stop();
        assert!(!second.is_current());
        assert!(!gate.is_running());
    }

    #[tokio::test]
    async fn loop_ticks_until_stopped() {
        let gate = PollGate::default();
        let lease = gate.start();
        let ticks = Rc::new(Cell::new(0_u32));
        let sleeps = Rc::new(RefCell::new(Vec::new()));

        let tick_count = Rc::clone(&ticks);
        let tick_gate = gate.clone();
        let recorded = Rc::clone(&sleeps);
        run_poll_loop(
            lease,
            DEFAULT_POLL_INTERVAL,
            move |interval| {
                recorded.borrow_mut().push(interval);
                futures::future::ready(())
            },
            move || {
                tick_count.set(tick_count.get() + 1);
                if tick_count.get() == 3 {
                    tick_gate.stop();
                }
                futures::future::ready(())
            },
        )
        .await;

        assert_eq!(ticks.get(), 3);
        assert_eq!(*sleeps.borrow(), vec![Duration::from_secs(60); 3]);
        assert!(!gate.is_running());
    }

    #[tokio::test]
    async fn fetch_uses_notifications_endpoint_with_token() {
        let transport = ScriptedTransport::default();
        transport.respond(200, "[]");
        let session = SessionStore::new(Rc::new(MemoryStore::default()));
        session.set_token("tok-5").expect("set token");
        let client = ApiClient::new(
            "/api/v1",
            transport.clone(),
            session,
            Rc::new(RecordingNavigator::at("/dashboard")),
        );

        let notes = fetch_notifications(&client).await.expect("notifications");

        assert!(notes.is_empty());
        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.url, "/api/v1/dashboard/notifications");
        assert_eq!(request.header("Authorization"), Some("Bearer tok-5"));
    }
}
