use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::extract::config::DEFAULT_CONTEXT_WINDOW;
use crate::extract::{DedupKey, MatchMode, NumberShape, OrgPenaltyPolicy, RetentionPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "rfb-extract",
    version,
    about = "Extract responsible-party records from RFB/PGFN PDF reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// PDF files or directories containing PDFs.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long, default_value = ".cache/rfb-extract")]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub output_csv: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = MatchModeArg::RequireLabel)]
    pub match_mode: MatchModeArg,

    #[arg(long, value_enum, default_value_t = RetentionArg::Filtered)]
    pub retention: RetentionArg,

    #[arg(long, value_enum, default_value_t = NumberShapeArg::Loose)]
    pub number_shape: NumberShapeArg,

    #[arg(long, value_enum, default_value_t = DedupArg::DocumentNumber)]
    pub dedup: DedupArg,

    #[arg(long, value_enum, default_value_t = OrgPenaltyArg::ExemptTaxpayer)]
    pub org_penalty: OrgPenaltyArg,

    #[arg(long, default_value_t = DEFAULT_CONTEXT_WINDOW)]
    pub context_window: usize,

    /// JSON file overriding any of the ranking weights.
    #[arg(long)]
    pub weights_path: Option<PathBuf>,

    #[arg(long)]
    pub max_pages_per_doc: Option<usize>,

    /// Also print the final records as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum MatchModeArg {
    RequireLabel,
    DocumentNumberOnly,
    FullMatch,
}

impl MatchModeArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequireLabel => "require-label",
            Self::DocumentNumberOnly => "document-number-only",
            Self::FullMatch => "full-match",
        }
    }
}

impl From<MatchModeArg> for MatchMode {
    fn from(value: MatchModeArg) -> Self {
        match value {
            MatchModeArg::RequireLabel => MatchMode::RequireLabel,
            MatchModeArg::DocumentNumberOnly => MatchMode::DocumentNumberOnly,
            MatchModeArg::FullMatch => MatchMode::FullMatch,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum RetentionArg {
    Filtered,
    Raw,
}

impl RetentionArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filtered => "filtered",
            Self::Raw => "raw",
        }
    }
}

impl From<RetentionArg> for RetentionPolicy {
    fn from(value: RetentionArg) -> Self {
        match value {
            RetentionArg::Filtered => RetentionPolicy::Filtered,
            RetentionArg::Raw => RetentionPolicy::Raw,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum NumberShapeArg {
    Loose,
    Strict,
}

impl NumberShapeArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loose => "loose",
            Self::Strict => "strict",
        }
    }
}

impl From<NumberShapeArg> for NumberShape {
    fn from(value: NumberShapeArg) -> Self {
        match value {
            NumberShapeArg::Loose => NumberShape::Loose,
            NumberShapeArg::Strict => NumberShape::Strict,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DedupArg {
    Off,
    Document,
    DocumentNumber,
}

impl DedupArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Document => "document",
            Self::DocumentNumber => "document-number",
        }
    }

    pub fn dedup_key(self) -> Option<DedupKey> {
        match self {
            Self::Off => None,
            Self::Document => Some(DedupKey::Document),
            Self::DocumentNumber => Some(DedupKey::DocumentAndNumber),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OrgPenaltyArg {
    ExemptTaxpayer,
    Always,
}

impl OrgPenaltyArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExemptTaxpayer => "exempt-taxpayer",
            Self::Always => "always",
        }
    }
}

impl From<OrgPenaltyArg> for OrgPenaltyPolicy {
    fn from(value: OrgPenaltyArg) -> Self {
        match value {
            OrgPenaltyArg::ExemptTaxpayer => OrgPenaltyPolicy::ExemptTaxpayer,
            OrgPenaltyArg::Always => OrgPenaltyPolicy::Always,
        }
    }
}
