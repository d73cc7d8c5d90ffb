use std::path::PathBuf;

use crate::aggregator::MeanPooling;

/// Arguments for the aggregate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AggregateArgs {
    /// Directory searched recursively for site documents
    pub input_dir: PathBuf,

    /// Directory the tables are written to (defaults to `input_dir`)
    pub output_dir: Option<PathBuf>,

    /// Mean ± SD pooling strategy
    pub mean_pooling: MeanPooling,

    /// Print the pooled table to stdout
    pub print_summary: bool,
}

impl Default for AggregateArgs {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: None,
            mean_pooling: MeanPooling::Unweighted,
            print_summary: false,
        }
    }
}

impl AggregateArgs {
    pub fn output_dir(&self) -> &PathBuf {
        self.output_dir.as_ref().unwrap_or(&self.input_dir)
    }
}
