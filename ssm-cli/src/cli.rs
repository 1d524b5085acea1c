//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use ssm_io::ArchiveVariant;
use ssm_viewer::StoreMode;
use std::path::PathBuf;

/// Share lookable-but-not-extractable previews of 3D-printable models.
#[derive(Parser, Debug)]
#[command(name = "ssm", version, about)]
pub struct CliArgs {
    /// Path to TOML configuration file.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Render an STL model into a .ssm archive.
    Generate(GenerateArgs),
    /// Step through the snapshots of a .ssm archive.
    View(ViewArgs),
    /// Summarize the contents of a .ssm archive.
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// STL model to render.
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,
    /// Directory receiving the archive.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Archive packing variant.
    #[arg(long, value_enum)]
    pub variant: Option<VariantArg>,
    /// Render snapshots into <output dir>/<model name>/ instead of a temporary directory.
    #[arg(long)]
    pub keep_working_dir_beside_output: bool,
}

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    /// Archive to open.
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
    /// PNG file the current frame is written to.
    #[arg(long, value_name = "FILE", default_value = "ssm-frame.png")]
    pub frame_out: PathBuf,
    /// Comma-separated input tokens to play instead of reading stdin.
    #[arg(long, value_name = "TOKENS")]
    pub script: Option<String>,
    /// Only accept archives packed with this variant.
    #[arg(long, value_enum)]
    pub variant: Option<VariantArg>,
    /// Where extracted snapshots are kept.
    #[arg(long, value_enum)]
    pub store: Option<StoreArg>,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Archive to inspect.
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum VariantArg {
    Plain,
    Compressed,
}

impl From<VariantArg> for ArchiveVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Plain => ArchiveVariant::Plain,
            VariantArg::Compressed => ArchiveVariant::Compressed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StoreArg {
    Memory,
    Temporary,
    BesideArchive,
}

impl From<StoreArg> for StoreMode {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Memory => StoreMode::Memory,
            StoreArg::Temporary => StoreMode::Temporary,
            StoreArg::BesideArchive => StoreMode::BesideArchive,
        }
    }
}
