//! Search-as-you-type debouncing.
//!
//! Keystrokes go into a [`QueryInput`]; the paired [`DebouncedQueries`]
//! yields a query only after input has been quiet for the configured period.
//! Superseded queries are dropped and never reach the query service.

use std::time::Duration;

use tokio::sync::mpsc;

/// Quiet period before a typed query is searched.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Clone)]
pub struct QueryInput {
    tx: mpsc::UnboundedSender<String>,
}

impl QueryInput {
    /// Record the latest text of the search box. Returns false once the
    /// receiving side is gone.
    pub fn push(&self, query: impl Into<String>) -> bool {
        self.tx.send(query.into()).is_ok()
    }
}

pub struct DebouncedQueries {
    rx: mpsc::UnboundedReceiver<String>,
    quiet: Duration,
}

/// Create a debounced query pipe with the given quiet period.
pub fn debounce(quiet: Duration) -> (QueryInput, DebouncedQueries) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueryInput { tx }, DebouncedQueries { rx, quiet })
}

impl DebouncedQueries {
    /// Wait for input, then for a quiet period, and return the last query typed.
    /// Returns `None` when every input handle is dropped and nothing is pending.
    pub async fn next(&mut self) -> Option<String> {
        let mut latest = self.rx.recv().await?;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.quiet) => return Some(latest),
                next = self.rx.recv() => match next {
                    Some(query) => latest = query,
                    None => return Some(latest),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_query() {
        let (input, mut queries) = debounce(DEFAULT_QUIET_PERIOD);
        input.push("p");
        input.push("po");
        input.push("pol");

        assert_eq!(queries.next().await.as_deref(), Some("pol"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_gap_yields_each_query() {
        let (input, mut queries) = debounce(Duration::from_millis(300));

        let typist = tokio::spawn(async move {
            input.push("fire");
            tokio::time::sleep(Duration::from_millis(500)).await;
            input.push("police");
            tokio::time::sleep(Duration::from_millis(100)).await;
            input.push("police station");
        });

        assert_eq!(queries.next().await.as_deref(), Some("fire"));
        assert_eq!(queries.next().await.as_deref(), Some("police station"));
        typist.await.unwrap();
        assert_eq!(queries.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_input_yields_none() {
        let (input, mut queries) = debounce(DEFAULT_QUIET_PERIOD);
        drop(input);
        assert_eq!(queries.next().await, None);
    }
}
