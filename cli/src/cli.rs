use std::path::PathBuf;

/// Constituency/ward seeding CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "wardseed", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Merge, match, and write constituency and ward records
    Seed(SeedArgs),

    /// Merge and match only, then print the run report
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// Constituency fragments (GeoJSON FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub constituencies: PathBuf,

    /// Ward boundaries (GeoJSON FeatureCollection or array of features)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub wards: PathBuf,

    /// Pipeline configuration (TOML)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Overlap fraction of ward area required for a match, overrides config
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Area measure used for matching, overrides config
    #[arg(long, value_enum)]
    pub metric: Option<MetricArg>,

    /// Write the run report as JSON to this file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub report: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory for JSON documents, defaults to "./seed-out"
    #[arg(short, long, value_hint = clap::ValueHint::DirPath, conflicts_with = "firestore")]
    pub out: Option<PathBuf>,

    /// Firestore project id; writes to Firestore instead of a directory
    #[arg(long)]
    pub firestore: Option<String>,

    /// Firestore emulator host, e.g. localhost:8080
    #[arg(long, requires = "firestore")]
    pub emulator: Option<String>,

    /// OAuth access token for Firestore (or FIRESTORE_TOKEN)
    #[arg(long, env = "FIRESTORE_TOKEN", hide_env_values = true, requires = "firestore")]
    pub token: Option<String>,

    /// Writes per committed batch, overrides config
    #[arg(long)]
    pub batch_limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricArg {
    Planar,
    Spherical,
}

impl From<MetricArg> for wardseed::AreaMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Planar => wardseed::AreaMetric::Planar,
            MetricArg::Spherical => wardseed::AreaMetric::Spherical,
        }
    }
}
