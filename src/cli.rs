use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::toa::{EndPagePolicy, SegmenterConfig};

#[derive(Parser, Debug)]
#[command(
    name = "toa-split",
    version,
    about = "Split legal briefs into their table of authorities and body text"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every PDF in a directory and write one brief JSON per PDF.
    Extract(ExtractArgs),
    /// Process a single brief from a PDF or a pre-extracted pages JSON.
    Split(SplitArgs),
    /// Re-parse the stored table text of a brief JSON and compare citations.
    Reparse(ReparseArgs),
    /// Summarize a directory of brief JSON files.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SegmentArgs {
    #[arg(long, default_value_t = 5)]
    pub max_toa_pages: usize,

    #[arg(long, value_enum, default_value_t = EndPagePolicy::IncludeInToa)]
    pub end_page_policy: EndPagePolicy,
}

impl SegmentArgs {
    pub fn config(&self) -> SegmenterConfig {
        SegmenterConfig {
            max_toa_pages: self.max_toa_pages,
            end_page: self.end_page_policy,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    /// Defaults to the input directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub max_pages_per_doc: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[command(flatten)]
    pub segment: SegmentArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    #[arg(long, conflicts_with = "pdf", required_unless_present = "pdf")]
    pub pages: Option<PathBuf>,

    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Value for the `source` field; defaults to the input file name.
    #[arg(long)]
    pub source: Option<String>,

    /// Writes to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub max_pages_per_doc: Option<usize>,

    #[command(flatten)]
    pub segment: SegmentArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReparseArgs {
    #[arg(long)]
    pub brief: PathBuf,

    /// Replace the stored citations when the fresh parse differs.
    #[arg(long, default_value_t = false)]
    pub write: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".")]
    pub brief_dir: PathBuf,
}
