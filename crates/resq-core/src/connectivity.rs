//! Online/offline state tracking.
//!
//! The observer holds the current [`Connectivity`] and is fed by whatever
//! platform signal is available (a probe loop, an OS event, a flag). It emits
//! sync triggers on a single-consumer channel: one at construction when
//! starting online, and one per offline-to-online transition. UI code
//! subscribes to state changes separately, so any number of subscribers never
//! multiplies syncs.

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn from_online(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Connectivity::Online)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Connectivity::Online => "online",
            Connectivity::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WentOnline,
    WentOffline,
}

/// Why a sync was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncReason {
    ColdStart,
    Reconnected,
}

/// Receiving end of the sync trigger channel. There is exactly one per observer.
pub struct SyncTriggers {
    rx: mpsc::UnboundedReceiver<SyncReason>,
}

impl SyncTriggers {
    /// Next trigger, or `None` once the observer is gone.
    pub async fn recv(&mut self) -> Option<SyncReason> {
        self.rx.recv().await
    }

    /// A trigger that is already waiting, if any.
    pub fn try_recv(&mut self) -> Option<SyncReason> {
        self.rx.try_recv().ok()
    }
}

pub struct ConnectivityObserver {
    state: watch::Sender<Connectivity>,
    triggers: mpsc::UnboundedSender<SyncReason>,
}

impl ConnectivityObserver {
    /// Create an observer starting in `initial`, plus its trigger channel.
    pub fn new(initial: Connectivity) -> (Self, SyncTriggers) {
        let (state, _) = watch::channel(initial);
        let (tx, rx) = mpsc::unbounded_channel();

        let observer = Self {
            state,
            triggers: tx,
        };
        if initial.is_online() {
            observer.trigger(SyncReason::ColdStart);
        }
        debug!(initial = initial.label(), "Connectivity observer started");

        (observer, SyncTriggers { rx })
    }

    pub fn current(&self) -> Connectivity {
        *self.state.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.current().is_online()
    }

    /// Feed a platform signal. Returns the transition when the state changed.
    pub fn report(&self, status: Connectivity) -> Option<Transition> {
        let changed = self.state.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
        if !changed {
            return None;
        }

        match status {
            Connectivity::Online => {
                info!("Connection restored");
                self.trigger(SyncReason::Reconnected);
                Some(Transition::WentOnline)
            }
            Connectivity::Offline => {
                info!("Connection lost, serving cached data");
                Some(Transition::WentOffline)
            }
        }
    }

    /// Watch state changes. Subscribing has no effect on syncing.
    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.state.subscribe()
    }

    fn trigger(&self, reason: SyncReason) {
        if self.triggers.send(reason).is_err() {
            debug!(?reason, "No sync driver listening");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(triggers: &mut SyncTriggers) -> Vec<SyncReason> {
        std::iter::from_fn(|| triggers.try_recv()).collect()
    }

    #[test]
    fn test_cold_start_online_triggers_once() {
        let (_observer, mut triggers) = ConnectivityObserver::new(Connectivity::Online);
        assert_eq!(drain(&mut triggers), vec![SyncReason::ColdStart]);
    }

    #[test]
    fn test_cold_start_offline_does_not_trigger() {
        let (observer, mut triggers) = ConnectivityObserver::new(Connectivity::Offline);
        assert!(drain(&mut triggers).is_empty());
        assert!(!observer.is_online());
    }

    #[test]
    fn test_transitions() {
        let (observer, mut triggers) = ConnectivityObserver::new(Connectivity::Offline);

        assert_eq!(observer.report(Connectivity::Offline), None);
        assert_eq!(observer.report(Connectivity::Online), Some(Transition::WentOnline));
        assert_eq!(observer.report(Connectivity::Online), None);
        assert_eq!(observer.report(Connectivity::Offline), Some(Transition::WentOffline));
        assert_eq!(observer.report(Connectivity::Online), Some(Transition::WentOnline));

        assert_eq!(
            drain(&mut triggers),
            vec![SyncReason::Reconnected, SyncReason::Reconnected]
        );
    }

    #[test]
    fn test_going_offline_never_triggers() {
        let (observer, mut triggers) = ConnectivityObserver::new(Connectivity::Online);
        drain(&mut triggers);

        observer.report(Connectivity::Offline);
        assert!(drain(&mut triggers).is_empty());
    }

    #[test]
    fn test_subscribers_see_state_without_triggering() {
        let (observer, mut triggers) = ConnectivityObserver::new(Connectivity::Offline);
        let first = observer.subscribe();
        let second = observer.subscribe();

        observer.report(Connectivity::Online);

        assert_eq!(*first.borrow(), Connectivity::Online);
        assert_eq!(*second.borrow(), Connectivity::Online);
        assert_eq!(drain(&mut triggers), vec![SyncReason::Reconnected]);
    }

    #[test]
    fn test_report_without_driver_is_harmless() {
        let (observer, triggers) = ConnectivityObserver::new(Connectivity::Offline);
        drop(triggers);
        assert_eq!(observer.report(Connectivity::Online), Some(Transition::WentOnline));
        assert!(observer.is_online());
    }
}
