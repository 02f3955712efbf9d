//! Keystroke debouncing for the user search.
//!
//! Every keystroke replaces the pending search and restarts the quiet
//! period; Enter fires at once. Fired searches are numbered, and only the
//! result of the highest number may be shown, so a slow response can never
//! overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: u64,
    pub query: String,
}

/// Shared view of the latest issued ticket.
#[derive(Debug, Clone, Default)]
pub struct TicketBoard(Arc<AtomicU64>);

impl TicketBoard {
    fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Whether a result for `ticket` is still the one to display.
    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest()
    }
}

pub struct SearchDebouncer {
    delay: Duration,
    tx: mpsc::UnboundedSender<SearchRequest>,
    pending: Option<JoinHandle<()>>,
    tickets: TicketBoard,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<SearchRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = SearchDebouncer {
            delay,
            tx,
            pending: None,
            tickets: TicketBoard::default(),
        };
        (debouncer, rx)
    }

    pub fn tickets(&self) -> TicketBoard {
        self.tickets.clone()
    }

    /// A keystroke: schedule a search for `query` after the quiet period,
    /// replacing any search still waiting.
    pub fn input(&mut self, query: impl Into<String>) {
        self.cancel();
        let query = query.into();
        let deadline = Instant::now() + self.delay;
        let tx = self.tx.clone();
        let tickets = self.tickets.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            let ticket = tickets.issue();
            let _ = tx.send(SearchRequest { ticket, query });
        }));
    }

    /// Enter: drop the waiting search and fire `query` now.
    pub fn submit(&mut self, query: impl Into<String>) -> u64 {
        self.cancel();
        let ticket = self.tickets.issue();
        let _ = self.tx.send(SearchRequest { ticket, query: query.into() });
        ticket
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SEARCH_DEBOUNCE;
    use tokio::time::{advance, sleep};

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_fires_once() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        debouncer.input("a");
        advance(Duration::from_millis(200)).await;
        debouncer.input("ab");
        advance(Duration::from_millis(200)).await;
        debouncer.input("abc");

        let req = rx.recv().await.unwrap();
        assert_eq!(req, SearchRequest { ticket: 1, query: "abc".into() });

        sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_quiet_period() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        debouncer.input("bob");
        advance(Duration::from_millis(699)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(rx.recv().await.unwrap().query, "bob");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_fires_immediately_and_cancels_pending() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        debouncer.input("a");
        advance(Duration::from_millis(100)).await;
        debouncer.input("ab");
        let ticket = debouncer.submit("ab");

        assert_eq!(rx.try_recv().unwrap(), SearchRequest { ticket, query: "ab".into() });
        sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn only_latest_ticket_is_current() {
        let (mut debouncer, _rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        let board = debouncer.tickets();
        let first = debouncer.submit("a");
        let second = debouncer.submit("ab");
        assert!(!board.is_current(first));
        assert!(board.is_current(second));
    }
}
