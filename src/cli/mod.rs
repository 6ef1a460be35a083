//! Command-line interface.

pub mod completions;
pub mod diff;
pub mod key;
pub mod merge;
pub mod output;
pub mod secure;
pub mod split;
pub mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::rules::DescriptorKind;
use crate::core::schema::SchemaKind;
use crate::error::Result;

/// Fabrix - deployment descriptor compiler and change-impact analyzer.
#[derive(Parser)]
#[command(
    name = "fabrix",
    about = "Deployment descriptor compiler and change-impact analyzer",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Validate a document against a schema
    Validate {
        /// JSON document to validate
        file: PathBuf,
        /// Schema to validate against
        #[arg(long, value_enum, default_value_t = SchemaArg::Application)]
        schema: SchemaArg,
    },

    /// Split a descriptor into editable artifacts
    Split {
        /// Descriptor JSON file
        descriptor: PathBuf,
        /// Output directory (default: <builder>/<key>)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Merge an artifact directory back into a descriptor
    Merge {
        /// Directory holding env.template and variables.yaml
        dir: PathBuf,
        /// Output file (default: <dir>/application.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// JSON object of portalInput metadata keyed by variable name
        #[arg(long)]
        portal_inputs: Option<PathBuf>,
    },

    /// Print the deployment key of a file
    Key {
        /// Artifact to hash (normally variables.yaml)
        #[arg(required_unless_present = "check")]
        file: Option<PathBuf>,
        /// Check whether a string is a well-formed deployment key
        #[arg(long, conflicts_with = "file")]
        check: Option<String>,
    },

    /// Generate a secret key for sealing values
    Keygen {
        /// Overwrite an existing key file
        #[arg(short, long)]
        force: bool,
    },

    /// Encrypt a value into secure:// form
    Seal {
        /// Plaintext value
        value: String,
        /// Hex-encode components instead of base64
        #[arg(long)]
        hex: bool,
    },

    /// Decrypt a secure:// value
    Open {
        /// Sealed value
        sealed: String,
    },

    /// Classify the differences between two descriptors
    Diff {
        /// Previous version
        old: PathBuf,
        /// New version
        new: PathBuf,
        /// Descriptor kind (detected when omitted)
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// Rule table overriding the configured one
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Schema selector for `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaArg {
    Application,
    ExternalSystem,
    ExternalDatasource,
    Infrastructure,
    /// External system plus its data sources
    ExternalManifest,
}

impl SchemaArg {
    /// Schema for a single document, `None` for a manifest.
    pub fn schema(self) -> Option<SchemaKind> {
        match self {
            Self::Application => Some(SchemaKind::Application),
            Self::ExternalSystem => Some(SchemaKind::ExternalSystem),
            Self::ExternalDatasource => Some(SchemaKind::ExternalDataSource),
            Self::Infrastructure => Some(SchemaKind::Infrastructure),
            Self::ExternalManifest => None,
        }
    }
}

/// Descriptor kind selector for `diff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Application,
    ExternalSystem,
    ExternalDatasource,
}

impl From<KindArg> for DescriptorKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Application => Self::Application,
            KindArg::ExternalSystem => Self::ExternalSystem,
            KindArg::ExternalDatasource => Self::ExternalDataSource,
        }
    }
}

/// Supported shells for completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

/// Execute a command and return the process exit code.
pub fn execute(command: Command) -> Result<i32> {
    match command {
        Command::Validate { file, schema } => validate::execute(&file, schema),
        Command::Split { descriptor, out } => split::execute(&descriptor, out),
        Command::Merge {
            dir,
            out,
            portal_inputs,
        } => merge::execute(&dir, out, portal_inputs),
        Command::Key { file, check } => key::execute(file, check),
        Command::Keygen { force } => secure::keygen(force),
        Command::Seal { value, hex } => secure::seal(&value, hex),
        Command::Open { sealed } => secure::open(&sealed),
        Command::Diff {
            old,
            new,
            kind,
            rules,
            json,
        } => diff::execute(&old, &new, kind.map(Into::into), rules, json),
        Command::Completions { shell } => completions::execute(shell),
    }
}
