//! Application wiring for the `resq` command.
//!
//! The `App` owns the cache, one query service and one sync policy per
//! collection, and the connectivity probe. `start` reports the current network
//! state to a fresh observer and hands its triggers to a background sync
//! driver, so reads never wait on a sync.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use resq_core::{
    CacheManager, Config, ConnectionProbe, Connectivity, ConnectivityObserver, DatasetSource,
    EmergencyNumber, HttpSource, LegalInfo, LegalLibrary, NumberDirectory, ProbeReport,
    Seeded, SyncDriver, SyncOutcome, SyncPolicy, SyncReport,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A running observer together with the background driver consuming its triggers.
pub struct Session {
    pub observer: ConnectivityObserver,
    pub probe: Option<ProbeReport>,
    driver: JoinHandle<usize>,
}

impl Session {
    pub fn is_online(&self) -> bool {
        self.observer.is_online()
    }

    /// Drop the observer and wait for any sync already triggered to land.
    pub async fn finish(self) -> usize {
        drop(self.observer);
        match self.driver.await {
            Ok(rounds) => rounds,
            Err(e) => {
                debug!(error = %e, "Sync driver ended abnormally");
                0
            }
        }
    }
}

pub struct App {
    pub cache: CacheManager,
    pub numbers: NumberDirectory,
    pub legal: LegalLibrary,
    number_sync: Arc<SyncPolicy<EmergencyNumber>>,
    legal_sync: Arc<SyncPolicy<LegalInfo>>,
    probe: ConnectionProbe,
    /// Never probe or sync
    pub offline_mode: bool,
}

impl App {
    pub fn new(config: Config, ephemeral: bool, offline: bool) -> Result<Self> {
        let cache = if ephemeral {
            CacheManager::in_memory()
        } else {
            CacheManager::file(config.cache_dir()?)
        }
        .with_timeout(config.query_timeout());

        let number_sync = SyncPolicy::<EmergencyNumber>::new(cache.clone())
            .with_source(source_for(config.numbers_url.as_deref())?)
            .with_retry(config.retry_policy());
        let legal_sync = SyncPolicy::<LegalInfo>::new(cache.clone())
            .with_source(source_for(config.legal_url.as_deref())?)
            .with_retry(config.retry_policy());

        let probe = ConnectionProbe::new(config.probe_url())?;
        let offline_mode = offline || config.offline_mode;

        Ok(Self {
            numbers: NumberDirectory::new(cache.clone()),
            legal: LegalLibrary::new(cache.clone()),
            number_sync: Arc::new(number_sync),
            legal_sync: Arc::new(legal_sync),
            cache,
            probe,
            offline_mode,
        })
    }

    fn sync_driver(&self) -> SyncDriver {
        SyncDriver::new()
            .with_task(self.number_sync.clone())
            .with_task(self.legal_sync.clone())
    }

    pub async fn probe(&self) -> ProbeReport {
        self.probe.check().await
    }

    /// Probe the network (unless offline mode) and start background syncing.
    pub async fn start(&self, reports: Option<mpsc::Sender<SyncReport>>) -> Session {
        let probe = if self.offline_mode {
            None
        } else {
            Some(self.probe().await)
        };
        let initial = probe
            .as_ref()
            .map(ProbeReport::connectivity)
            .unwrap_or(Connectivity::Offline);
        info!(state = initial.label(), offline_mode = self.offline_mode, "Starting");

        let (observer, triggers) = ConnectivityObserver::new(initial);
        let mut driver = self.sync_driver();
        if let Some(tx) = reports {
            driver = driver.with_reports(tx);
        }

        Session {
            observer,
            probe,
            driver: driver.spawn(triggers),
        }
    }

    /// Run both sync policies right away, regardless of connectivity.
    pub async fn sync_now(&self) -> Vec<SyncOutcome> {
        self.sync_driver().sync_all().await
    }

    /// Poll the probe every `interval` and feed the observer until interrupted.
    pub async fn watch(&self, session: &Session, interval: Duration) {
        self.watch_until(session, interval, tokio::signal::ctrl_c()).await;
    }

    /// Poll until `stop` resolves. `stop` is polled throughout, including
    /// while a probe is in flight.
    async fn watch_until<S: Future>(&self, session: &Session, interval: Duration, stop: S) {
        tokio::pin!(stop);
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; startup already probed
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = &mut stop => {
                    info!("Stopping watch");
                    return;
                }
                _ = async {
                    ticker.tick().await;
                    let report = self.probe().await;
                    debug!(online = report.online, quality = %report.quality, "Probe");
                    session.observer.report(report.connectivity());
                } => {}
            }
        }
    }
}

fn source_for<R: Seeded>(url: Option<&str>) -> Result<Arc<dyn DatasetSource<R>>> {
    Ok(match url {
        Some(url) => Arc::new(HttpSource::<R>::new(url)?),
        None => Arc::new(resq_core::BundledSource::<R>::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_app() -> App {
        App::new(Config::default(), true, true).unwrap()
    }

    #[tokio::test]
    async fn test_offline_start_never_syncs() {
        let app = offline_app();
        let session = app.start(None).await;
        assert!(!session.is_online());
        assert!(session.probe.is_none());
        assert_eq!(session.finish().await, 0);
    }

    #[tokio::test]
    async fn test_reads_work_before_any_sync() {
        let app = offline_app();
        assert_eq!(app.numbers.get_all().await.len(), 20);
        assert_eq!(app.legal.search("dowry").await.len(), 1);
    }

    #[tokio::test]
    async fn test_sync_now_fills_cache() {
        let app = offline_app();
        let outcomes = app.sync_now().await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(SyncOutcome::is_synced));
        assert_eq!(app.cache.get_all::<LegalInfo>().await.unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_watch_stops_while_probe_in_flight() {
        // Unroutable address: the probe hangs until its own timeout
        let mut app = offline_app();
        app.probe = ConnectionProbe::with_timeout("http://10.255.255.1/", Duration::from_secs(5))
            .unwrap();
        let session = app.start(None).await;

        let stop = tokio::time::sleep(Duration::from_millis(50));
        let stopped = tokio::time::timeout(
            Duration::from_secs(2),
            app.watch_until(&session, Duration::from_millis(1), stop),
        )
        .await;

        assert!(stopped.is_ok());
        session.finish().await;
    }

    #[tokio::test]
    async fn test_reconnect_during_session_syncs() {
        let app = offline_app();
        let (tx, mut rx) = mpsc::channel(resq_core::sync::REPORT_BUFFER_SIZE);
        let session = app.start(Some(tx)).await;

        session.observer.report(Connectivity::Online);
        let report = rx.recv().await.unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(session.finish().await, 1);
    }
}
