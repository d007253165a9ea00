use crate::services::binding::BindService;
use crate::services::dedup::EventDeduplicator;
use crate::services::dispatcher::Dispatcher;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared by the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher for inbound chat messages
    pub dispatcher: Arc<Dispatcher>,
    /// Bind service for platform user bindings
    pub bind_service: Arc<dyn BindService>,
    /// Lark event verification token, empty to skip the check
    pub lark_verification_token: String,
    /// Recently handled Lark event ids
    pub lark_events: EventDeduplicator,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("dispatcher", &"Arc<Dispatcher>")
            .field("bind_service", &"Arc<dyn BindService>")
            .field(
                "lark_verification_token",
                &(!self.lark_verification_token.is_empty()),
            )
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(dispatcher: Arc<Dispatcher>, bind_service: Arc<dyn BindService>) -> Self {
        Self {
            dispatcher,
            bind_service,
            lark_verification_token: String::new(),
            lark_events: EventDeduplicator::default(),
        }
    }

    /// Require Lark callbacks to carry this verification token
    pub fn with_lark_verification_token(mut self, token: &str) -> Self {
        self.lark_verification_token = token.to_string();
        self
    }

    /// How long a handled Lark event id suppresses redeliveries
    pub fn with_lark_event_ttl(mut self, ttl: Duration) -> Self {
        self.lark_events = EventDeduplicator::new(ttl);
        self
    }
}
