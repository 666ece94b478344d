//! Runtime events.

use flowdeck_models::IntegrationId;

/// Events emitted by the runtime's timers and simulated operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The initial loading period ended.
    LoadingFinished,
    /// A periodic refresh ran.
    SyncRefreshed {
        /// Number of connected integrations whose last sync advanced.
        refreshed: usize,
    },
    /// A simulated connect began.
    ConnectStarted {
        integration: IntegrationId,
    },
    /// A simulated connect completed and the store was updated.
    ConnectFinished {
        integration: IntegrationId,
    },
    /// The analysis period after generating suggestions ended.
    AnalysisFinished,
}

impl RuntimeEvent {
    /// Returns the integration this event concerns, if any.
    pub fn integration(&self) -> Option<&IntegrationId> {
        match self {
            RuntimeEvent::ConnectStarted { integration }
            | RuntimeEvent::ConnectFinished { integration } => Some(integration),
            _ => None,
        }
    }
}
