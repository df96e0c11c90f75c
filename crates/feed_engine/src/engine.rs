use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use feed_core::{update, Effect, FeedSnapshot, FeedState, ItemId, Msg, Outcome};
use feed_logging::{feed_debug, feed_info, feed_warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::classify::classify;
use crate::config::{ConfigError, EngineConfig, FEED_TITLE};
use crate::fetch::{ReqwestTransport, Transport};
use crate::request::RequestBuilder;

/// Query-reactive pagination engine.
///
/// All state lives on a dedicated worker thread that applies messages one at
/// a time; the handle only sends messages and reads published snapshots.
pub struct FeedEngine {
    msg_tx: mpsc::UnboundedSender<Msg>,
    snapshot_rx: watch::Receiver<FeedSnapshot>,
    cancel: CancellationToken,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl FeedEngine {
    /// Starts an engine backed by the reqwest transport.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.fetch.clone()).map_err(ConfigError::Transport)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Starts an engine with a caller-supplied transport.
    pub fn with_transport(
        config: EngineConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let (endpoint, api_key) = config.validate()?;
        let state = FeedState::with_tuning(endpoint, config.tuning);
        let builder = RequestBuilder::new(api_key, config.cache_policy);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("feed-fetch")
            .enable_all()
            .build()
            .map_err(|err| ConfigError::Runtime(err.to_string()))?;

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.view());
        let cancel = CancellationToken::new();

        let worker = Worker {
            builder,
            transport,
            msg_tx: msg_tx.clone(),
            snapshot_tx,
            cancel: cancel.clone(),
            in_flight: None,
        };
        let handle = thread::Builder::new()
            .name("feed-engine".to_string())
            .spawn(move || runtime.block_on(worker.run(state, msg_rx)))
            .map_err(|err| ConfigError::Runtime(err.to_string()))?;

        feed_info!("Feed engine started for {}", config.endpoint);
        Ok(Self {
            msg_tx,
            snapshot_rx,
            cancel,
            worker: Mutex::new(Some(handle)),
        })
    }

    pub fn title(&self) -> &'static str {
        FEED_TITLE
    }

    /// Feeds raw query text into the debounce. A newly committed query
    /// clears the list and requests page 1.
    pub fn set_query(&self, text: impl Into<String>) {
        self.send(Msg::QueryEdited {
            text: text.into(),
            at: Instant::now(),
        });
    }

    pub fn notify_visible(&self, item: ItemId) {
        self.send(Msg::ItemVisible(item));
    }

    /// Requests the next page without reference to a visible item.
    pub fn load_more(&self) {
        self.send(Msg::LoadMore);
    }

    /// Re-commits the current query from page 1; the way out of `Failed`.
    pub fn restart(&self) {
        self.send(Msg::Restart);
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Stops the worker and abandons any in-flight fetch. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        let handle = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                feed_warn!("Feed engine worker panicked");
            }
            feed_info!("Feed engine stopped");
        }
    }

    fn send(&self, msg: Msg) {
        if self.msg_tx.send(msg).is_err() {
            feed_debug!("Feed engine is shut down; message dropped");
        }
    }
}

impl Drop for FeedEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    snapshot_tx: watch::Sender<FeedSnapshot>,
    cancel: CancellationToken,
    in_flight: Option<JoinHandle<()>>,
}

impl Worker {
    async fn run(mut self, mut state: FeedState, mut msg_rx: mpsc::UnboundedReceiver<Msg>) {
        loop {
            let deadline = state.next_deadline();
            let msg = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                msg = msg_rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
                _ = sleep_until(deadline) => Msg::Tick { now: Instant::now() },
            };

            let (mut next, effects) = update(state, msg);
            for effect in effects {
                self.execute(effect);
            }
            if next.consume_dirty() {
                self.snapshot_tx.send_replace(next.view());
            }
            state = next;
        }

        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch { query, ticket } => {
                let request = match self.builder.build(&query, ticket.page) {
                    Ok(request) => request,
                    Err(err) => {
                        let _ = self.msg_tx.send(Msg::FetchCompleted {
                            ticket,
                            outcome: Outcome::TransportFailed(err.to_string()),
                        });
                        return;
                    }
                };
                feed_debug!("GET {}", request.url);

                let transport = self.transport.clone();
                let msg_tx = self.msg_tx.clone();
                self.in_flight = Some(tokio::spawn(async move {
                    let outcome = match transport.execute(&request).await {
                        Ok(body) => classify(&body),
                        Err(err) => Outcome::TransportFailed(err.to_string()),
                    };
                    let _ = msg_tx.send(Msg::FetchCompleted { ticket, outcome });
                }));
            }
            Effect::CancelFetch { ticket } => {
                if let Some(task) = self.in_flight.take() {
                    feed_debug!(
                        "Cancelling page {} of generation {}",
                        ticket.page,
                        ticket.generation
                    );
                    task.abort();
                }
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}
