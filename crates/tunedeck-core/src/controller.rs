// ── Settings controller ──
//
// Drives one editing session: load, render, SSL warning, validate,
// reconcile, persist, finish. Rendering and dialogs belong to the
// `SettingsSurface`; the controller only tells it what to show.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::confirm::{DialogResponse, LEARN_MORE_URL, SslConfirmation};
use crate::error::CoreError;
use crate::profile::ConnectionProfile;
use crate::reconcile::{self, ReconciliationPlan};
use crate::services::Services;
use crate::store::ProfileStore;
use crate::validate::{self, RawProfileFields, ValidationError};

/// Error returned by a surface that failed to open a link.
pub type LinkError = Box<dyn std::error::Error + Send + Sync>;

/// The presentation side of a settings session.
pub trait SettingsSurface {
    /// Display the form pre-filled with these values.
    fn render(&mut self, fields: &RawProfileFields);

    /// Show a message next to the offending field. The form stays open.
    fn show_field_error(&mut self, error: &ValidationError);

    /// Present the self-signed certificate warning. The response arrives
    /// later through [`SettingsController::close_ssl_dialog`].
    fn show_ssl_warning(&mut self);

    /// Open a URL in an external viewer.
    fn open_link(&mut self, url: &str) -> Result<(), LinkError>;

    /// The edit completed; close the form.
    fn finish(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Editing,
    Finished,
}

/// One settings editing session.
pub struct SettingsController<U: SettingsSurface> {
    store: Arc<dyn ProfileStore>,
    services: Services,
    surface: U,
    /// Profile loaded when the session began; the baseline for reconciliation.
    current: ConnectionProfile,
    ssl_confirmation: SslConfirmation,
    /// The warning has been presented at least once in this session.
    ssl_warning_surfaced: bool,
    session: SessionState,
}

impl<U: SettingsSurface> SettingsController<U> {
    /// Load the stored profile and render it.
    pub fn begin(store: Arc<dyn ProfileStore>, services: Services, mut surface: U) -> Self {
        let current = store.load();
        surface.render(&RawProfileFields::from_profile(&current));
        debug!(address = %current.address, "settings session started");

        Self {
            store,
            services,
            surface,
            current,
            ssl_confirmation: SslConfirmation::Idle,
            ssl_warning_surfaced: false,
            session: SessionState::Editing,
        }
    }

    pub fn current_profile(&self) -> &ConnectionProfile {
        &self.current
    }

    pub fn ssl_confirmation(&self) -> SslConfirmation {
        self.ssl_confirmation
    }

    pub fn is_finished(&self) -> bool {
        self.session == SessionState::Finished
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut U {
        &mut self.surface
    }

    /// The SSL toggle changed. Switching it on surfaces the warning.
    pub fn on_ssl_toggled(&mut self, enabled: bool) {
        if enabled {
            self.prompt_ssl_warning();
        }
    }

    /// The warning dialog closed with `response`.
    pub fn close_ssl_dialog(&mut self, response: DialogResponse) {
        if response == DialogResponse::LearnMore
            && self.ssl_confirmation == SslConfirmation::PromptShown
        {
            // Best effort: a missing browser is not the user's problem here.
            let _ = self.surface.open_link(LEARN_MORE_URL);
        }
        self.ssl_confirmation = self.ssl_confirmation.close(response);
    }

    /// Validate, reconcile and persist the edited form.
    ///
    /// On a validation error nothing is dispatched or written and the session
    /// stays open. Otherwise the plan's actions run in order, the profile is
    /// saved, and the session finishes. A save failure is returned after the
    /// actions have run; they are not undone.
    pub fn submit(&mut self, raw: &RawProfileFields) -> Result<ReconciliationPlan, CoreError> {
        if self.session == SessionState::Finished {
            return Err(CoreError::SessionFinished);
        }

        let profile = match validate::parse(raw) {
            Ok(profile) => profile,
            Err(err) => {
                debug!(field = %err.field(), "settings rejected");
                self.surface.show_field_error(&err);
                return Err(err.into());
            }
        };

        let plan = reconcile::plan(&self.current, &profile);
        // A warning already answered in this session, even by dismissal,
        // is not repeated at commit time.
        if plan.needs_security_confirmation && !self.ssl_warning_surfaced {
            self.prompt_ssl_warning();
        }

        plan.execute(&self.services);

        let saved = self.store.save(&profile);
        self.current = profile;
        self.session = SessionState::Finished;

        match saved {
            Ok(()) => {
                info!(
                    address = %self.current.address,
                    port = self.current.control_port,
                    actions = plan.actions.len(),
                    "connection profile applied"
                );
                self.surface.finish();
                Ok(plan)
            }
            Err(err) => {
                warn!(error = %err, "connection profile not persisted");
                Err(err)
            }
        }
    }

    /// Abandon the session without writing or reconciling anything.
    pub fn cancel(self) -> U {
        debug!("settings session abandoned");
        self.surface
    }

    fn prompt_ssl_warning(&mut self) {
        if self.ssl_confirmation.needs_prompt() {
            self.surface.show_ssl_warning();
            self.ssl_confirmation = self.ssl_confirmation.prompt_shown();
            self.ssl_warning_surfaced = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;
    use crate::profile::PlaybackMode;
    use crate::services::{AudioOutput, ControlConnection, StreamingPlayback};
    use crate::store::MemoryProfileStore;

    type Log = Arc<Mutex<Vec<String>>>;

    fn record(log: &Log, entry: impl Into<String>) {
        log.lock().expect("event log").push(entry.into());
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().expect("event log").clone()
    }

    /// Records surface calls and collaborator dispatches into one log.
    struct Recorder {
        log: Log,
        fail_links: bool,
    }

    impl SettingsSurface for Recorder {
        fn render(&mut self, fields: &RawProfileFields) {
            record(&self.log, format!("render {}:{}", fields.address, fields.control_port));
        }

        fn show_field_error(&mut self, error: &ValidationError) {
            record(&self.log, format!("error {}", error.field()));
        }

        fn show_ssl_warning(&mut self) {
            record(&self.log, "ssl-warning");
        }

        fn open_link(&mut self, url: &str) -> Result<(), LinkError> {
            record(&self.log, format!("open {url}"));
            if self.fail_links {
                Err("no browser".into())
            } else {
                Ok(())
            }
        }

        fn finish(&mut self) {
            record(&self.log, "finish");
        }
    }

    struct LoggedService(Log);

    impl ControlConnection for LoggedService {
        fn disconnect(&self) {
            record(&self.0, "disconnect");
        }
    }

    impl StreamingPlayback for LoggedService {
        fn stop(&self) {
            record(&self.0, "stop");
        }
    }

    impl AudioOutput for LoggedService {
        fn set_global_volume(&self, gain: f32) {
            record(&self.0, format!("volume {gain}"));
        }
    }

    struct FailingStore;

    impl ProfileStore for FailingStore {
        fn load(&self) -> ConnectionProfile {
            ConnectionProfile::default()
        }

        fn save(&self, _profile: &ConnectionProfile) -> Result<(), CoreError> {
            Err(CoreError::Persist {
                message: "disk full".into(),
            })
        }
    }

    fn session(
        store: Arc<dyn ProfileStore>,
        fail_links: bool,
    ) -> (SettingsController<Recorder>, Log) {
        let log: Log = Arc::default();
        let service = Arc::new(LoggedService(log.clone()));
        let services = Services::new(service.clone(), service.clone(), service);
        let surface = Recorder {
            log: log.clone(),
            fail_links,
        };
        (SettingsController::begin(store, services, surface), log)
    }

    fn form(controller: &SettingsController<Recorder>) -> RawProfileFields {
        RawProfileFields::from_profile(controller.current_profile())
    }

    #[test]
    fn begin_renders_stored_profile() {
        let (controller, log) = session(Arc::new(MemoryProfileStore::new()), false);
        assert_eq!(entries(&log), vec!["render 192.168.1.100:7905"]);
        assert!(!controller.is_finished());
    }

    #[test]
    fn invalid_port_writes_nothing_and_keeps_session_open() {
        let store = Arc::new(MemoryProfileStore::new());
        let (mut controller, log) = session(store.clone(), false);

        let raw = RawProfileFields {
            http_port: "80a".into(),
            address: "changed".into(),
            ..form(&controller)
        };
        let result = controller.submit(&raw);

        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(store.load(), ConnectionProfile::default());
        assert_eq!(entries(&log), vec!["render 192.168.1.100:7905", "error http_port"]);
        assert!(!controller.is_finished());

        let fixed = RawProfileFields {
            http_port: "8080".into(),
            ..raw
        };
        controller.submit(&fixed).expect("valid form");
        assert_eq!(store.load().http_port, 8080);
        assert_eq!(store.load().address, "changed");
    }

    #[test]
    fn submit_runs_actions_then_saves_then_finishes() {
        let stored = ConnectionProfile {
            playback_mode: PlaybackMode::Streaming,
            software_volume: true,
            ..ConnectionProfile::default()
        };
        let store = Arc::new(MemoryProfileStore::with_profile(stored));
        let (mut controller, log) = session(store.clone(), false);

        let raw = RawProfileFields {
            playback_mode: PlaybackMode::Remote,
            software_volume: false,
            password: SecretString::from("pw".to_string()),
            ..form(&controller)
        };
        let plan = controller.submit(&raw).expect("valid form");

        assert_eq!(plan.actions.len(), 3);
        assert_eq!(
            entries(&log),
            vec![
                "render 192.168.1.100:7905",
                "stop",
                "disconnect",
                "volume 1",
                "finish",
            ]
        );
        let saved = store.load();
        assert!(!saved.streaming_playback_enabled());
        assert_eq!(&saved, controller.current_profile());
        assert!(controller.is_finished());
    }

    #[test]
    fn second_submit_is_rejected() {
        let store = Arc::new(MemoryProfileStore::new());
        let (mut controller, _log) = session(store, false);
        let raw = form(&controller);
        controller.submit(&raw).expect("valid form");
        assert!(matches!(
            controller.submit(&raw),
            Err(CoreError::SessionFinished)
        ));
    }

    #[test]
    fn ssl_toggle_prompts_once_and_learn_more_failure_is_swallowed() {
        let store = Arc::new(MemoryProfileStore::new());
        let (mut controller, log) = session(store.clone(), true);

        controller.on_ssl_toggled(true);
        controller.on_ssl_toggled(true);
        assert_eq!(controller.ssl_confirmation(), SslConfirmation::PromptShown);

        controller.close_ssl_dialog(DialogResponse::LearnMore);
        assert_eq!(controller.ssl_confirmation(), SslConfirmation::Acknowledged);

        let raw = RawProfileFields {
            ssl_enabled: true,
            software_volume: true,
            ..form(&controller)
        };
        let plan = controller.submit(&raw).expect("valid form");
        assert!(plan.needs_security_confirmation);
        assert!(store.load().ssl_enabled);

        assert_eq!(
            entries(&log),
            vec![
                "render 192.168.1.100:7905".to_string(),
                "ssl-warning".to_string(),
                format!("open {LEARN_MORE_URL}"),
                "disconnect".to_string(),
                "finish".to_string(),
            ]
        );
    }

    #[test]
    fn dismissed_warning_does_not_block_and_is_not_repeated_on_submit() {
        let store = Arc::new(MemoryProfileStore::new());
        let (mut controller, log) = session(store.clone(), false);

        controller.on_ssl_toggled(true);
        controller.close_ssl_dialog(DialogResponse::Dismissed);
        assert_eq!(controller.ssl_confirmation(), SslConfirmation::Idle);

        let raw = RawProfileFields {
            ssl_enabled: true,
            software_volume: true,
            ..form(&controller)
        };
        controller.submit(&raw).expect("valid form");

        assert!(store.load().ssl_enabled);
        assert_eq!(
            entries(&log),
            vec![
                "render 192.168.1.100:7905",
                "ssl-warning",
                "disconnect",
                "finish",
            ]
        );
    }

    #[test]
    fn submit_with_ssl_on_warns_when_toggle_never_did() {
        let stored = ConnectionProfile {
            ssl_enabled: true,
            software_volume: true,
            ..ConnectionProfile::default()
        };
        let store = Arc::new(MemoryProfileStore::with_profile(stored));
        let (mut controller, log) = session(store, false);

        let raw = RawProfileFields {
            address: "10.0.0.7".into(),
            ..form(&controller)
        };
        let plan = controller.submit(&raw).expect("valid form");

        assert!(plan.needs_security_confirmation);
        assert_eq!(controller.ssl_confirmation(), SslConfirmation::PromptShown);
        assert_eq!(
            entries(&log),
            vec![
                "render 192.168.1.100:7905",
                "ssl-warning",
                "disconnect",
                "finish",
            ]
        );
    }

    #[test]
    fn disabling_ssl_shows_nothing() {
        let (mut controller, log) = session(Arc::new(MemoryProfileStore::new()), false);
        controller.on_ssl_toggled(false);
        assert_eq!(controller.ssl_confirmation(), SslConfirmation::Idle);
        assert_eq!(entries(&log).len(), 1);
    }

    #[test]
    fn cancel_leaves_store_and_services_untouched() {
        let store = Arc::new(MemoryProfileStore::new());
        let (controller, log) = session(store.clone(), false);
        let _surface = controller.cancel();
        assert_eq!(store.load(), ConnectionProfile::default());
        assert_eq!(entries(&log), vec!["render 192.168.1.100:7905"]);
    }

    #[test]
    fn save_failure_is_reported_after_actions_ran() {
        let (mut controller, log) = session(Arc::new(FailingStore), false);
        let raw = form(&controller);
        let result = controller.submit(&raw);

        assert!(matches!(result, Err(CoreError::Persist { .. })));
        assert_eq!(
            entries(&log),
            vec!["render 192.168.1.100:7905", "disconnect", "volume 1"]
        );
        assert!(controller.is_finished());
    }
}
