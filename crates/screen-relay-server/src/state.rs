//! Shared application state.

use std::sync::Arc;

use screen_relay_core::SessionRegistry;
use screen_relay_notify::Notifier;
use screen_relay_store::FrameStore;

use crate::config::Config;

/// Application state shared across handlers.
///
/// Everything is constructed once at startup and injected here; handlers
/// never reach for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub store: Arc<FrameStore>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<Config>,
}
