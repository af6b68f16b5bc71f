// ── Apply reconciliation ──
//
// Decides which dependent services must be touched when one profile
// replaces another, and in what order. Planning is pure; execution is
// fire-and-forget dispatch into the collaborators.

use strum::Display;
use tracing::debug;

use crate::profile::ConnectionProfile;
use crate::services::{HARDWARE_DEFAULT_GAIN, Services};

/// A side effect required to bring services in line with a new profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ReconciliationAction {
    StopStreamingPlayback,
    DisconnectControlConnection,
    ResetVolumeToHardwareDefault,
}

/// Ordered actions plus whether the SSL warning must precede them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub actions: Vec<ReconciliationAction>,
    pub needs_security_confirmation: bool,
}

/// Compute the plan for replacing `old` with `new`.
///
/// Streaming is stopped before the control connection is dropped, since
/// the stream may ride on that session. The connection is dropped on every
/// apply: address, ports, password, SSL and compression all shape the wire
/// session, and it is re-established lazily on next use.
pub fn plan(old: &ConnectionProfile, new: &ConnectionProfile) -> ReconciliationPlan {
    let mut actions = Vec::with_capacity(3);

    if old.streaming_playback_enabled() && !new.streaming_playback_enabled() {
        actions.push(ReconciliationAction::StopStreamingPlayback);
    }

    actions.push(ReconciliationAction::DisconnectControlConnection);

    // Hardware volume must not inherit a stale software gain.
    if !new.software_volume {
        actions.push(ReconciliationAction::ResetVolumeToHardwareDefault);
    }

    ReconciliationPlan {
        actions,
        needs_security_confirmation: new.ssl_enabled,
    }
}

impl ReconciliationPlan {
    /// Dispatch every action in order. Nothing is awaited or rolled back.
    pub fn execute(&self, services: &Services) {
        for action in &self.actions {
            debug!(%action, "dispatching reconciliation action");
            match action {
                ReconciliationAction::StopStreamingPlayback => services.playback.stop(),
                ReconciliationAction::DisconnectControlConnection => {
                    services.connection.disconnect();
                }
                ReconciliationAction::ResetVolumeToHardwareDefault => {
                    services.audio.set_global_volume(HARDWARE_DEFAULT_GAIN);
                }
            }
        }
    }
}
