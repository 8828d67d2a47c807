//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use smartmeet_store::InviteStore;
use smartmeet_templates::TemplateKind;
use smartmeet_transport::Transport;

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// The persistence adapter facade.
    pub store: Arc<InviteStore>,
    /// Email delivery channel.
    pub mailer: Arc<dyn Transport>,
    /// Messaging-app delivery channel.
    pub messenger: Arc<dyn Transport>,
    /// Kind used when a generate request names none.
    pub default_kind: TemplateKind,
    /// Process start, for the health endpoint.
    pub start_time: Instant,
}

impl AppState {
    /// Bundle the pieces into one state value.
    pub fn new(
        store: Arc<InviteStore>,
        mailer: Arc<dyn Transport>,
        messenger: Arc<dyn Transport>,
        default_kind: TemplateKind,
    ) -> Self {
        Self {
            store,
            mailer,
            messenger,
            default_kind,
            start_time: Instant::now(),
        }
    }
}
