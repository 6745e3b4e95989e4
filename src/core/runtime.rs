//! # Runtime
//!
//! Drives `update()` and performs the effects it asks for. All state changes
//! happen on the task that owns the `Browser`; spawned tasks only ever send
//! `Action`s back over the channel.
//!
//! ```text
//!   input ──► dispatch(action) ──► update() ──► Effect
//!                  ▲                               │
//!                  │        tokio::spawn(...)      │
//!                  └──── rx ◄── tx ◄── task ◄──────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;

use crate::api::{CountrySource, FieldProfile};
use crate::core::action::{Action, Effect, update};
use crate::core::controller::SearchTicket;
use crate::core::detail::DetailResolver;
use crate::core::search::SearchResolver;
use crate::core::state::App;

pub struct Browser {
    pub app: App,
    source: Arc<dyn CountrySource>,
    resolver: SearchResolver,
    details: DetailResolver,
    debounce: Duration,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    /// The sleeping timer for the latest edit, if any.
    debounce_timer: Option<AbortHandle>,
}

impl Browser {
    pub fn new(source: Arc<dyn CountrySource>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        info!(
            "Browser using source '{}' with {}ms debounce",
            source.name(),
            debounce.as_millis()
        );
        Self {
            app: App::new(),
            resolver: SearchResolver::new(source.clone()),
            details: DetailResolver::new(source.clone()),
            source,
            debounce,
            tx,
            rx,
            debounce_timer: None,
        }
    }

    /// Applies `action` and starts whatever work it requires.
    pub fn dispatch(&mut self, action: Action) -> Effect {
        debug!("Dispatch: {:?}", action);
        let effect = update(&mut self.app, action);
        self.execute(effect.clone());
        effect
    }

    /// Waits for the next action produced by a background task.
    pub async fn next_action(&mut self) -> Option<Action> {
        self.rx.recv().await
    }

    pub fn sender(&self) -> UnboundedSender<Action> {
        self.tx.clone()
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::LoadAll { generation } => self.spawn_load_all(generation),
            Effect::StartDebounce(ticket) => self.restart_debounce(ticket),
            Effect::SpawnSearch(ticket) => self.spawn_search(ticket),
            Effect::FetchDetail { request, code } => self.spawn_detail(request, code),
            Effect::None | Effect::Discarded | Effect::Quit => {}
        }
    }

    fn restart_debounce(&mut self, ticket: SearchTicket) {
        if let Some(previous) = self.debounce_timer.take() {
            previous.abort();
        }
        let tx = self.tx.clone();
        let window = self.debounce;
        let generation = ticket.generation;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if tx.send(Action::DebounceElapsed { generation }).is_err() {
                warn!("Debounce for generation {}: receiver dropped", generation);
            }
        });
        self.debounce_timer = Some(handle.abort_handle());
    }

    fn spawn_load_all(&self, generation: u64) {
        info!("Spawning initial load (generation {})", generation);
        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_all(FieldProfile::Summary).await;
            if tx.send(Action::ListLoaded { generation, outcome }).is_err() {
                warn!("Initial load finished after receiver dropped");
            }
        });
    }

    fn spawn_search(&self, ticket: SearchTicket) {
        info!(
            "Spawning search {:?} (generation {})",
            ticket.query, ticket.generation
        );
        let resolver = self.resolver.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = resolver.resolve(&ticket.query).await;
            let generation = ticket.generation;
            if tx.send(Action::SearchSettled { generation, outcome }).is_err() {
                warn!("Search generation {}: receiver dropped", generation);
            }
        });
    }

    fn spawn_detail(&self, request: u64, code: String) {
        info!("Spawning detail fetch for {} (request {})", code, request);
        let details = self.details.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = details.resolve(&code).await;
            if tx.send(Action::DetailSettled { request, outcome }).is_err() {
                warn!("Detail request {}: receiver dropped", request);
            }
        });
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        if let Some(timer) = self.debounce_timer.take() {
            timer.abort();
        }
    }
}
