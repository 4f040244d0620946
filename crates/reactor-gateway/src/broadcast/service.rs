//! Broadcast service
//!
//! Owns the subscriber registry and two background tasks: a ticker that
//! pushes a `stats_update` snapshot every interval, and a relay that
//! forwards every event published on the [`EventBus`] as it happens.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use reactor_core::DashboardEvent;
use reactor_service::{shutdown_channel, EventBus, ShutdownTrigger, SnapshotProvider};

use crate::connection::{generate_session_id, SubscriberRegistry};
use crate::protocol::PushMessage;

struct Running {
    trigger: ShutdownTrigger,
    handles: Vec<JoinHandle<()>>,
}

pub struct BroadcastService {
    registry: Arc<SubscriberRegistry>,
    provider: Arc<dyn SnapshotProvider>,
    events: EventBus,
    interval: Duration,
    buffer: usize,
    running: AtomicBool,
    tasks: Mutex<Option<Running>>,
}

impl BroadcastService {
    /// `buffer` bounds each subscriber's outbound queue
    pub fn new(
        provider: Arc<dyn SnapshotProvider>,
        events: EventBus,
        interval: Duration,
        buffer: usize,
    ) -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::new()),
            provider,
            events,
            interval,
            buffer: buffer.max(1),
            running: AtomicBool::new(false),
            tasks: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Register a new subscriber
    ///
    /// The `initial_stats` snapshot is queued before the subscriber joins
    /// the registry, so it is always the first message received.
    pub async fn connect(&self) -> (String, mpsc::Receiver<PushMessage>) {
        let session_id = generate_session_id();
        let (tx, rx) = mpsc::channel(self.buffer);

        let snapshot = self.provider.snapshot().await;
        if tx.try_send(PushMessage::initial_stats(&snapshot)).is_err() {
            warn!(session_id = %session_id, "Failed to queue initial stats");
        }

        self.registry.add(session_id.clone(), tx);
        info!(session_id = %session_id, total = self.registry.len(), "Dashboard client connected");
        (session_id, rx)
    }

    pub fn disconnect(&self, session_id: &str) {
        if self.registry.remove(session_id) {
            info!(session_id = %session_id, total = self.registry.len(), "Dashboard client disconnected");
        }
    }

    /// Push one `stats_update` to every subscriber
    ///
    /// No snapshot is computed while nobody is connected.
    pub async fn broadcast_tick(&self) -> usize {
        if self.registry.is_empty() {
            return 0;
        }
        let snapshot = self.provider.snapshot().await;
        self.registry.broadcast(&PushMessage::stats_update(&snapshot))
    }

    /// Forward a dashboard event to every subscriber
    pub fn relay(&self, event: DashboardEvent) -> usize {
        if self.registry.is_empty() {
            return 0;
        }
        self.registry.broadcast(&PushMessage::event(event))
    }

    /// Spawn the ticker and relay tasks
    pub fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Broadcast service is already running");
            return;
        }

        let (trigger, signal) = shutdown_channel();
        // Subscribe before spawning so no event published after start is missed
        let mut events = self.events.subscribe();

        let ticker = {
            let service = Arc::clone(self);
            let signal = signal.clone();
            tokio::spawn(async move {
                let period = service.interval;
                let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        () = signal.wait() => break,
                        _ = ticker.tick() => {
                            let sent = service.broadcast_tick().await;
                            if sent > 0 {
                                debug!(sent, "Stats update pushed");
                            }
                        }
                    }
                }
                debug!("Stats ticker stopped");
            })
        };

        let relay = {
            let service = Arc::clone(self);
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        () = signal.wait() => break,
                        received = events.recv() => match received {
                            Ok(event) => {
                                service.relay(event);
                            }
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                warn!(skipped, "Event relay lagged, events dropped");
                            }
                            Err(broadcast::error::RecvError::Closed) => {
                                info!("Event bus closed");
                                break;
                            }
                        }
                    }
                }
                debug!("Event relay stopped");
            })
        };

        *self.tasks.lock() = Some(Running {
            trigger,
            handles: vec![ticker, relay],
        });
        info!(interval = ?self.interval, "Broadcast service started");
    }

    /// Stop the background tasks and wait for them to finish
    pub async fn stop(&self) {
        let running = self.tasks.lock().take();
        let Some(running) = running else {
            return;
        };
        running.trigger.trigger();
        for handle in running.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Broadcast task ended abnormally");
            }
        }
        self.running.store(false, Ordering::SeqCst);
        info!("Broadcast service stopped");
    }
}

impl std::fmt::Debug for BroadcastService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastService")
            .field("subscribers", &self.registry.len())
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PushType;
    use async_trait::async_trait;
    use reactor_core::{AggregateSnapshot, ChatId, MessageId, OutcomeStatus};
    use std::sync::atomic::AtomicUsize;

    const PERIOD: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SnapshotProvider for Counting {
        async fn snapshot(&self) -> AggregateSnapshot {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as u64 + 1;
            AggregateSnapshot {
                total_reactions: n,
                ..AggregateSnapshot::default()
            }
        }
    }

    fn service() -> (Arc<BroadcastService>, Arc<Counting>, EventBus) {
        let provider = Arc::new(Counting::default());
        let events = EventBus::default();
        let service = Arc::new(BroadcastService::new(
            provider.clone(),
            events.clone(),
            PERIOD,
            16,
        ));
        (service, provider, events)
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_snapshot_without_subscribers() {
        let (service, provider, _events) = service();
        service.start();

        tokio::time::sleep(PERIOD * 3 + Duration::from_millis(10)).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        service.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_then_periodic() {
        let (service, provider, _events) = service();
        service.start();

        let (_session, mut rx) = service.connect().await;
        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, PushType::InitialStats);
        assert_eq!(first.data["total_reactions"], 1);

        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;
        let update = rx.recv().await.unwrap();
        assert_eq!(update.kind, PushType::StatsUpdate);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        service.stop().await;
    }

    #[tokio::test]
    async fn test_events_relayed_to_all() {
        let (service, _provider, events) = service();
        service.start();

        let (_a, mut rx_a) = service.connect().await;
        let (_b, mut rx_b) = service.connect().await;
        rx_a.recv().await.unwrap();
        rx_b.recv().await.unwrap();

        events.reaction(ChatId::new(-7), MessageId::new(3), "🔥", OutcomeStatus::Success);

        for rx in [&mut rx_a, &mut rx_b] {
            let pushed = rx.recv().await.unwrap();
            assert_eq!(pushed.kind, PushType::Reaction);
            assert_eq!(pushed.data["chat_id"], -7);
            assert_eq!(pushed.data["emoji"], "🔥");
        }

        service.stop().await;
    }

    #[tokio::test]
    async fn test_tick_drops_closed_subscriber() {
        let (service, _provider, _events) = service();
        let (_keep, mut rx_keep) = service.connect().await;
        let (_gone, rx_gone) = service.connect().await;
        drop(rx_gone);
        rx_keep.recv().await.unwrap();

        assert_eq!(service.broadcast_tick().await, 1);
        assert_eq!(service.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_and_stop() {
        let (service, _provider, events) = service();
        service.start();
        assert!(service.is_running());

        let (session, _rx) = service.connect().await;
        service.disconnect(&session);
        assert_eq!(service.subscriber_count(), 0);

        service.stop().await;
        assert!(!service.is_running());
        assert_eq!(events.chat_added(ChatId::new(1), "x"), 0);

        // stopping twice is a no-op
        service.stop().await;
    }
}
