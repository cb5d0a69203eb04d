use clap::{Parser, Subcommand, ValueHint};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "oxtree-bench")]
/// Benchmark of member batch parsing of TREE profile pages against Jelly streams
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a dataset, write it as a TREE profile page and as a Jelly stream, parse both files and report
    ///
    /// The TREE profile page is parsed in a streaming way, member batch by member batch.
    /// The Jelly stream is first fully loaded, then its graphs are iterated in member batches.
    Run {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Number of members per batch
        #[arg(short, long, default_value = "100")]
        batch_size: NonZeroUsize,
        /// Format of the report written to stdout
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Generate a dataset and write it as a TREE profile page and as a Jelly stream
    Generate {
        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// Parse an existing TREE profile page in member batches
    ParseTree {
        /// File to parse
        ///
        /// It is decompressed with gzip if its name ends with ".gz".
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Number of members per batch
        #[arg(short, long, default_value = "100")]
        batch_size: NonZeroUsize,
        /// IRI of the collection whose tree:member statements delimit the members
        ///
        /// By default, the collection of the dataset generated with --base is used.
        #[arg(long, value_hint = ValueHint::Url, conflicts_with = "base")]
        collection: Option<String>,
        /// Base IRI the page has been generated with
        #[arg(long, default_value = "https://example.org/ldes/", value_hint = ValueHint::Url)]
        base: String,
        /// Format of the report written to stdout
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Load an existing Jelly stream and iterate its graphs in member batches
    ParseJelly {
        /// File to parse
        ///
        /// It is decompressed with gzip if its name ends with ".gz".
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Number of members per batch
        #[arg(short, long, default_value = "100")]
        batch_size: NonZeroUsize,
        /// Format of the report written to stdout
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

#[derive(clap::Args)]
pub struct DatasetArgs {
    /// Number of members to generate
    #[arg(short, long, default_value_t = 10_000)]
    pub members: usize,
    /// Minimal number of quads of a member
    ///
    /// Each member has at least 3 quads: its type, its label and its value.
    #[arg(long, default_value_t = 6)]
    pub min_quads: usize,
    /// Maximal number of quads of a member
    #[arg(long, default_value_t = 30)]
    pub max_quads: usize,
    /// Seed of the random generator
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Directory in which the files are written
    #[arg(short, long, default_value = "out", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,
    /// Base IRI of the collection, members and resources
    #[arg(long, default_value = "https://example.org/ldes/", value_hint = ValueHint::Url)]
    pub base: String,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human readable summary
    Text,
    /// JSON document with every batch
    Json,
}
