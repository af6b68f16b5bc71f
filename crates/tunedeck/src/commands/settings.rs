//! Settings subcommand handlers.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use dialoguer::{Confirm, Input, Select};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tabled::Tabled;

use tunedeck_config::FileProfileStore;
use tunedeck_core::{
    ConnectionHandle, CoreError, DialogResponse, GlobalVolume, PlaybackHandle, PlaybackMode,
    RawProfileFields, ReconciliationPlan, Services, SettingsController,
};

use crate::cli::{GlobalOpts, OutputFormat, SetArgs, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;
use crate::surface::TerminalSurface;

type Controller = SettingsController<TerminalSurface>;

// ── Views ───────────────────────────────────────────────────────────

/// Profile as shown to the user; keys match the stored file.
#[derive(Debug, Serialize)]
struct ProfileView {
    address: String,
    port: String,
    http_port: String,
    password: String,
    album_art_enabled: bool,
    message_compression_enabled: bool,
    software_volume: bool,
    ssl_enabled: bool,
    streaming_playback: bool,
}

impl ProfileView {
    fn from_form(form: &RawProfileFields) -> Self {
        Self {
            address: form.address.clone(),
            port: form.control_port.clone(),
            http_port: form.http_port.clone(),
            password: mask(&form.password),
            album_art_enabled: form.album_art_enabled,
            message_compression_enabled: form.message_compression_enabled,
            software_volume: form.software_volume,
            ssl_enabled: form.ssl_enabled,
            streaming_playback: form.playback_mode.is_streaming(),
        }
    }

    fn rows(&self) -> Vec<SettingRow> {
        let playback = PlaybackMode::from(self.streaming_playback).label();
        vec![
            SettingRow::new("Address", &self.address),
            SettingRow::new("Control port", &self.port),
            SettingRow::new("HTTP port", &self.http_port),
            SettingRow::new("Password", &self.password),
            SettingRow::new("Album art", on_off(self.album_art_enabled)),
            SettingRow::new("Message compression", on_off(self.message_compression_enabled)),
            SettingRow::new("Software volume", on_off(self.software_volume)),
            SettingRow::new("SSL", on_off(self.ssl_enabled)),
            SettingRow::new("Playback", playback),
        ]
    }
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    setting: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl SettingRow {
    fn new(setting: &'static str, value: &str) -> Self {
        Self {
            setting,
            value: value.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ApplyView {
    actions: Vec<String>,
    needs_security_confirmation: bool,
}

impl ApplyView {
    fn from_plan(plan: &ReconciliationPlan) -> Self {
        Self {
            actions: plan.actions.iter().map(ToString::to_string).collect(),
            needs_security_confirmation: plan.needs_security_confirmation,
        }
    }

    fn rows(&self) -> Vec<ActionRow> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, action)| ActionRow {
                step: i + 1,
                action: action.clone(),
            })
            .collect()
    }
}

#[derive(Tabled)]
struct ActionRow {
    #[tabled(rename = "#")]
    step: usize,
    #[tabled(rename = "Dispatched")]
    action: String,
}

fn mask(password: &SecretString) -> String {
    if password.expose_secret().is_empty() {
        String::new()
    } else {
        "****".into()
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

// ── Session helpers ─────────────────────────────────────────────────

fn open_store(global: &GlobalOpts) -> Arc<FileProfileStore> {
    let store = match &global.profile_path {
        Some(path) => FileProfileStore::open(path),
        None => FileProfileStore::open_default(),
    };
    Arc::new(store)
}

/// Nothing is connected or playing in this process; the handles only
/// record what a profile change would reconcile.
fn local_services() -> Services {
    Services::new(
        Arc::new(ConnectionHandle::new()),
        Arc::new(PlaybackHandle::new()),
        Arc::new(GlobalVolume::new()),
    )
}

fn begin(global: &GlobalOpts, store: Arc<FileProfileStore>, interactive: bool) -> Controller {
    let color = output::should_color(global.color);
    let announce = !global.quiet && global.output == OutputFormat::Table;
    let surface = TerminalSurface::new(interactive, announce, color);
    SettingsController::begin(store, local_services(), surface)
}

fn current_form(controller: &Controller) -> RawProfileFields {
    controller
        .surface()
        .form()
        .cloned()
        .unwrap_or_else(|| RawProfileFields::from_profile(controller.current_profile()))
}

/// Answer a warning the surface has shown, if any.
fn settle_ssl_dialog(controller: &mut Controller, global: &GlobalOpts) -> Result<(), CliError> {
    if !controller.surface_mut().take_pending_warning() {
        return Ok(());
    }

    let response = if global.yes {
        DialogResponse::Ok
    } else if io::stdin().is_terminal() && io::stderr().is_terminal() {
        let choice = Select::new()
            .with_prompt("SSL warning")
            .items(&["OK", "Learn more"])
            .default(0)
            .interact_opt()?;
        match choice {
            Some(0) => DialogResponse::Ok,
            Some(_) => DialogResponse::LearnMore,
            None => DialogResponse::Dismissed,
        }
    } else {
        DialogResponse::Dismissed
    };

    tracing::debug!(?response, "SSL warning closed");
    controller.close_ssl_dialog(response);
    Ok(())
}

fn print_plan(plan: &ReconciliationPlan, global: &GlobalOpts) {
    let view = ApplyView::from_plan(plan);
    let out = output::render(global.output, &view, ApplyView::rows);
    output::print_output(&out, global.quiet);
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn handle(args: SettingsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Show => {
            show(global);
            Ok(())
        }
        SettingsCommand::Set(set_args) => set(&set_args, global),
        SettingsCommand::Edit => edit(global),
        SettingsCommand::Path => {
            let path = global
                .profile_path
                .clone()
                .unwrap_or_else(tunedeck_config::profile_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn show(global: &GlobalOpts) {
    let controller = begin(global, open_store(global), false);
    let form = current_form(&controller);
    let _ = controller.cancel();

    let view = ProfileView::from_form(&form);
    let out = output::render(global.output, &view, ProfileView::rows);
    output::print_output(&out, global.quiet);
}

fn set(args: &SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut controller = begin(global, open_store(global), false);
    let mut raw = current_form(&controller);

    if let Some(ref address) = args.address {
        raw.address.clone_from(address);
    }
    if let Some(ref port) = args.port {
        raw.control_port.clone_from(port);
    }
    if let Some(ref http_port) = args.http_port {
        raw.http_port.clone_from(http_port);
    }
    if let Some(ref password) = args.password {
        raw.password = SecretString::from(password.clone());
    }
    if let Some(album_art) = args.album_art {
        raw.album_art_enabled = album_art;
    }
    if let Some(compression) = args.compression {
        raw.message_compression_enabled = compression;
    }
    if let Some(software_volume) = args.software_volume {
        raw.software_volume = software_volume;
    }
    if let Some(playback) = args.playback {
        raw.playback_mode = playback.into();
    }
    if let Some(ssl) = args.ssl {
        if ssl != raw.ssl_enabled {
            raw.ssl_enabled = ssl;
            controller.on_ssl_toggled(ssl);
            settle_ssl_dialog(&mut controller, global)?;
        }
    }

    let result = controller.submit(&raw);
    settle_ssl_dialog(&mut controller, global)?;
    let plan = result?;

    print_plan(&plan, global);
    Ok(())
}

fn edit(global: &GlobalOpts) -> Result<(), CliError> {
    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        return Err(CliError::NotInteractive);
    }

    let mut controller = begin(global, open_store(global), true);
    let mut form = current_form(&controller);

    let plan = loop {
        let raw = prompt_form(&form)?;
        if raw.ssl_enabled && !form.ssl_enabled {
            controller.on_ssl_toggled(true);
            settle_ssl_dialog(&mut controller, global)?;
        }

        let result = controller.submit(&raw);
        settle_ssl_dialog(&mut controller, global)?;
        match result {
            Ok(plan) => break plan,
            // The surface already printed the field error; ask again.
            Err(CoreError::Validation(_)) => form = raw,
            Err(e) => return Err(e.into()),
        }
    };

    print_plan(&plan, global);
    Ok(())
}

fn prompt_form(form: &RawProfileFields) -> Result<RawProfileFields, CliError> {
    let address: String = Input::new()
        .with_prompt("Server address")
        .with_initial_text(form.address.clone())
        .allow_empty(true)
        .interact_text()?;

    let control_port: String = Input::new()
        .with_prompt("Control port")
        .with_initial_text(form.control_port.clone())
        .allow_empty(true)
        .interact_text()?;

    let http_port: String = Input::new()
        .with_prompt("HTTP port")
        .with_initial_text(form.http_port.clone())
        .allow_empty(true)
        .interact_text()?;

    let password = if Confirm::new()
        .with_prompt("Change password?")
        .default(false)
        .interact()?
    {
        SecretString::from(rpassword::prompt_password("Password: ")?)
    } else {
        form.password.clone()
    };

    let album_art_enabled = Confirm::new()
        .with_prompt("Download album art?")
        .default(form.album_art_enabled)
        .interact()?;

    let message_compression_enabled = Confirm::new()
        .with_prompt("Compress messages?")
        .default(form.message_compression_enabled)
        .interact()?;

    let software_volume = Confirm::new()
        .with_prompt("Use software volume?")
        .default(form.software_volume)
        .interact()?;

    let ssl_enabled = Confirm::new()
        .with_prompt("Connect over SSL?")
        .default(form.ssl_enabled)
        .interact()?;

    let labels: Vec<&str> = PlaybackMode::ALL.into_iter().map(PlaybackMode::label).collect();
    let playback = Select::new()
        .with_prompt("Playback mode")
        .items(&labels)
        .default(form.playback_mode.index())
        .interact()?;

    Ok(RawProfileFields {
        address,
        control_port,
        http_port,
        password,
        album_art_enabled,
        message_compression_enabled,
        software_volume,
        ssl_enabled,
        playback_mode: PlaybackMode::from_index(playback),
    })
}
