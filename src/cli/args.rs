use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cfgimport_checker::{CheckOptions, Phase};

/// CLI arguments for the cfgimport binary.
#[derive(Parser, Debug)]
#[command(
    name = "cfgimport",
    version,
    about = "Resolve configurable imports and check candidate libraries against their interface"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the URI every configured directive binds to.
    Resolve(ResolveArgs),
    /// Check every configured candidate against its default library.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the JSON manifest.
    #[arg(short = 'm', long)]
    pub manifest: PathBuf,

    /// Set an environment key, overriding the manifest (`key=value`, or
    /// `key` for `key=true`).
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Announce an available built-in library, e.g. `dart:io`.
    #[arg(long = "host-library", value_name = "NS:NAME")]
    pub host_libraries: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the JSON manifest.
    #[arg(short = 'm', long)]
    pub manifest: PathBuf,

    /// How strictly to compare.
    #[arg(long, value_enum, default_value_t = PhaseArg::Full)]
    pub phase: PhaseArg,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Ignore private superclasses, mixins and interfaces when comparing
    /// class headers.
    #[arg(long = "exclude-private-supertypes")]
    pub exclude_private_supertypes: bool,

    /// Enable color in text output. Defaults to on when stdout is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Disable color in text output.
    #[arg(long = "no-color", conflicts_with = "pretty")]
    pub no_color: bool,

    /// Exit with status 1 when any report has findings.
    #[arg(long = "error-on-incompatible")]
    pub error_on_incompatible: bool,
}

impl CheckArgs {
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions::default().exclude_private_supertypes(self.exclude_private_supertypes)
    }

    /// Explicit color choice, if any. `None` means detect.
    pub fn color(&self) -> Option<bool> {
        if self.no_color {
            return Some(false);
        }
        self.pretty
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PhaseArg {
    #[value(name = "functions-only", alias = "functions")]
    FunctionsOnly,
    Full,
}

impl From<PhaseArg> for Phase {
    fn from(value: PhaseArg) -> Self {
        match value {
            PhaseArg::FunctionsOnly => Phase::FunctionsOnly,
            PhaseArg::Full => Phase::Full,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
