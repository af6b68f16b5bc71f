//! Clap derive structures for the `tunedeck` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use tunedeck_core::PlaybackMode;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tunedeck -- connection settings for a remote music server
#[derive(Debug, Parser)]
#[command(
    name = "tunedeck",
    version,
    about = "Edit the connection profile of the tunedeck remote client",
    long_about = "View, validate and apply the connection profile used to reach a\n\
        remote music server: address, ports, password, SSL, compression,\n\
        volume handling and playback mode.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile file to use instead of the platform default
    #[arg(long, value_name = "PATH", global = true)]
    pub profile_path: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Acknowledge the SSL warning without prompting
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// View and change the connection profile
    #[command(alias = "s")]
    Settings(SettingsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Display the stored profile
    Show,

    /// Change profile values and apply them
    Set(SetArgs),

    /// Edit the profile with interactive prompts
    Edit,

    /// Print the profile file location
    Path,
}

/// Values left out keep their stored setting.
#[derive(Debug, Args)]
pub struct SetArgs {
    /// Server host name or IP address
    #[arg(long)]
    pub address: Option<String>,

    /// Control port (empty to unset)
    #[arg(long, value_name = "PORT")]
    pub port: Option<String>,

    /// HTTP port (empty to unset)
    #[arg(long, value_name = "PORT")]
    pub http_port: Option<String>,

    /// Server password
    #[arg(long)]
    pub password: Option<String>,

    /// Download album art
    #[arg(long, value_name = "BOOL")]
    pub album_art: Option<bool>,

    /// Compress control messages
    #[arg(long, value_name = "BOOL")]
    pub compression: Option<bool>,

    /// Scale volume in the client instead of the output device
    #[arg(long, value_name = "BOOL")]
    pub software_volume: Option<bool>,

    /// Connect over SSL
    #[arg(long, value_name = "BOOL")]
    pub ssl: Option<bool>,

    /// Where audio is played
    #[arg(long)]
    pub playback: Option<PlaybackArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlaybackArg {
    /// Play on the server
    Remote,
    /// Stream to this device
    Streaming,
}

impl From<PlaybackArg> for PlaybackMode {
    fn from(arg: PlaybackArg) -> Self {
        match arg {
            PlaybackArg::Remote => Self::Remote,
            PlaybackArg::Streaming => Self::Streaming,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
