use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use refill_core::{update, AppState, AppViewModel, Msg};
use refill_engine::{render_record, EngineHandle, FileStore, KeyValueStore};
use refill_logging::refill_debug;

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::persistence::{restore_session, Stores};

/// The form a presentational shell drives: forward user intents with
/// [`FormSession::dispatch`], call [`FormSession::pump`] on every UI tick, and
/// render [`FormSession::view`] when [`FormSession::consume_dirty`] says so.
pub struct FormSession {
    state: AppState,
    runner: EffectRunner,
    inbox: VecDeque<Msg>,
}

impl FormSession {
    /// Opens a session backed by the file store and service named in `config`.
    pub fn open(config: &AppConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.state_dir.clone()));
        Self::with_parts(EngineHandle::new(config.client_settings()), store)
    }

    /// Builds a session from an engine and store, restoring persisted slots.
    pub fn with_parts(engine: EngineHandle, store: Arc<dyn KeyValueStore>) -> Self {
        let mut session = Self {
            state: AppState::new(),
            runner: EffectRunner::new(engine, Stores::new(store)),
            inbox: VecDeque::new(),
        };
        let restored = restore_session(session.runner.stores());
        session.inbox.extend(restored);
        session.drain_inbox();
        session
    }

    pub fn dispatch(&mut self, msg: Msg) {
        self.inbox.push_back(msg);
        self.drain_inbox();
    }

    /// Applies any submission completions that have arrived. Returns whether there were any.
    pub fn pump(&mut self) -> bool {
        let arrived = self.runner.poll();
        let any = !arrived.is_empty();
        self.inbox.extend(arrived);
        self.drain_inbox();
        any
    }

    /// Blocks until no submission is in flight or `timeout` elapses.
    /// Returns whether the form is idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_submitting() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.runner.wait(remaining) {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
        !self.state.is_submitting()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Text for the result pane: the latest record as indented JSON, followed by
/// any error raised alongside it (such as a failed ledger write).
    pub fn result_text(&self) -> Option<String> {
        let error = self.state.error().map(ToString::to_string);
        match (self.state.latest().map(render_record), error) {
            (Some(record), Some(error)) => Some(format!("{record}\n\n{error}")),
            (Some(record), None) => Some(record),
            (None, error) => error,
        }
    }

    fn drain_inbox(&mut self) {
        while let Some(msg) = self.inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            if !effects.is_empty() {
                refill_debug!("Running {} effects", effects.len());
                let follow_up = self.runner.run(effects);
                self.inbox.extend(follow_up);
            }
        }
    }
}
