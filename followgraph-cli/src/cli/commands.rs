//! Command implementations and argument parsing for the followgraph CLI.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use followgraph_core::{
    DEFAULT_BANDWAGON_SCALE, DEFAULT_BIG_FOLLOW_RATIO_THRESHOLD, DEFAULT_BIG_USER_RATIO,
    DEFAULT_BOOST_COEFFICIENT, DEFAULT_DEGREE_FLOOR, DEFAULT_HUB_COUNTRY_PROBABILITY,
    DEFAULT_HUB_GLOBAL_PROBABILITY, DEFAULT_MAX_REPAIR_PASSES, DEFAULT_MIN_FOLLOW_CUTOFF,
    DEFAULT_P_INTER_FACTION, DEFAULT_P_INTRA_FACTION, DEFAULT_SEED, FollowGraph, GeneratedGraph,
    GraphBuilder, GraphError, Modifiers,
};
use followgraph_providers_roster::{RosterProvider, RosterProviderError};
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "followgraph", about = "Generate synthetic who-follows-whom graphs.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a follow graph from a roster.
    Generate(GenerateCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Base probabilities and modifier coefficients.
    #[command(flatten)]
    pub affinity: AffinityArgs,

    /// Modifier toggles.
    #[command(flatten)]
    pub modifiers: ModifierArgs,

    /// Degree floor and repair cap.
    #[command(flatten)]
    pub repair: RepairArgs,

    /// Seed for the run's random generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output representation.
    #[arg(long, value_enum, default_value_t = OutputFormat::Edges)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Roster source.
    #[command(subcommand)]
    pub source: RosterSource,
}

/// Probability surface for the affinity model.
#[derive(Debug, Args, Clone, Copy)]
pub struct AffinityArgs {
    /// Probability of following a hub for one's own country.
    #[arg(long, default_value_t = DEFAULT_HUB_COUNTRY_PROBABILITY)]
    pub hub_country_probability: f64,

    /// Probability of following a global hub.
    #[arg(long, default_value_t = DEFAULT_HUB_GLOBAL_PROBABILITY)]
    pub hub_global_probability: f64,

    /// Probability of following within a faction.
    #[arg(long, default_value_t = DEFAULT_P_INTRA_FACTION)]
    pub p_intra_faction: f64,

    /// Probability of following across factions.
    #[arg(long, default_value_t = DEFAULT_P_INTER_FACTION)]
    pub p_inter_faction: f64,

    /// Strength of the boost towards targets short of their follower quota.
    #[arg(long, default_value_t = DEFAULT_BOOST_COEFFICIENT)]
    pub boost_coefficient: f64,

    /// Strength of the bandwagon effect.
    #[arg(long, default_value_t = DEFAULT_BANDWAGON_SCALE)]
    pub bandwagon_scale: f64,

    /// Follower ratio above which a big account never follows a small one.
    #[arg(long, default_value_t = DEFAULT_BIG_FOLLOW_RATIO_THRESHOLD)]
    pub big_follow_ratio_threshold: f64,

    /// Follower ratio above which an account counts as "big".
    #[arg(long, default_value_t = DEFAULT_BIG_USER_RATIO)]
    pub big_user_ratio: f64,

    /// Targets wanting fewer followers than this are never followed by big
    /// accounts.
    #[arg(long, default_value_t = DEFAULT_MIN_FOLLOW_CUTOFF)]
    pub min_follow_cutoff: u64,
}

impl Default for AffinityArgs {
    fn default() -> Self {
        Self {
            hub_country_probability: DEFAULT_HUB_COUNTRY_PROBABILITY,
            hub_global_probability: DEFAULT_HUB_GLOBAL_PROBABILITY,
            p_intra_faction: DEFAULT_P_INTRA_FACTION,
            p_inter_faction: DEFAULT_P_INTER_FACTION,
            boost_coefficient: DEFAULT_BOOST_COEFFICIENT,
            bandwagon_scale: DEFAULT_BANDWAGON_SCALE,
            big_follow_ratio_threshold: DEFAULT_BIG_FOLLOW_RATIO_THRESHOLD,
            big_user_ratio: DEFAULT_BIG_USER_RATIO,
            min_follow_cutoff: DEFAULT_MIN_FOLLOW_CUTOFF,
        }
    }
}

/// Switches for the modifiers layered over base probabilities.
#[derive(Debug, Args, Clone, Copy, Default)]
pub struct ModifierArgs {
    /// Disable damping of full targets and the under-quota boost.
    #[arg(long)]
    pub no_fullness_damping: bool,

    /// Disable the bandwagon effect.
    #[arg(long)]
    pub no_bandwagon: bool,

    /// Disable big-follows-small suppression.
    #[arg(long)]
    pub no_scale_suppression: bool,
}

impl From<ModifierArgs> for Modifiers {
    fn from(args: ModifierArgs) -> Self {
        Self {
            fullness_damping: !args.no_fullness_damping,
            bandwagon: !args.no_bandwagon,
            scale_suppression: !args.no_scale_suppression,
        }
    }
}

/// Repair engine limits.
#[derive(Debug, Args, Clone, Copy)]
pub struct RepairArgs {
    /// Minimum in- and out-degree for every persona.
    #[arg(long, default_value_t = DEFAULT_DEGREE_FLOOR)]
    pub degree_floor: u64,

    /// Maximum number of repair passes.
    #[arg(long, default_value_t = DEFAULT_MAX_REPAIR_PASSES)]
    pub max_repair_passes: usize,
}

impl Default for RepairArgs {
    fn default() -> Self {
        Self {
            degree_floor: DEFAULT_DEGREE_FLOOR,
            max_repair_passes: DEFAULT_MAX_REPAIR_PASSES,
        }
    }
}

/// Roster inputs supported by `generate`.
#[derive(Debug, Subcommand, Clone)]
pub enum RosterSource {
    /// Read a tab-separated roster with a header row.
    Tsv(RosterArgs),
    /// Read the first worksheet of an Excel or OpenDocument workbook.
    Xlsx(RosterArgs),
    /// Read a Parquet roster with one column per field.
    Parquet(RosterArgs),
}

/// Roster file arguments.
#[derive(Debug, Args, Clone)]
pub struct RosterArgs {
    /// Path to the roster file.
    pub path: PathBuf,

    /// Override name for the roster (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Output representations for a generated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated `follower`/`followed` handle pairs.
    Edges,
    /// Persona-by-persona relationship codes.
    Matrix,
    /// Graphviz DOT with node sizes scaled by follower count.
    Dot,
}

impl OutputFormat {
    pub(super) const fn as_str(self) -> &'static str {
        match self {
            Self::Edges => "edges",
            Self::Matrix => "matrix",
            Self::Dot => "dot",
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing the rendered output failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Roster ingestion failed.
    #[error(transparent)]
    Roster(#[from] RosterProviderError),
    /// Generator configuration or registry construction failed.
    #[error(transparent)]
    Core(#[from] GraphError),
}

impl CliError {
    /// Stable code of the underlying core error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(err) => Some(err.code().as_str()),
            Self::Roster(err) => err.graph_code().map(|code| code.as_str()),
            Self::Io { .. } => None,
        }
    }
}

/// Outcome of a `generate` command, ready for rendering.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Name of the roster the graph was generated from.
    pub roster: String,
    /// Requested output representation.
    pub format: OutputFormat,
    /// Destination file, or `None` for stdout.
    pub out: Option<PathBuf>,
    /// Generated personas, edges and diagnostics.
    pub graph: GeneratedGraph,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the roster cannot be read or the parameters are
/// rejected.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use followgraph_cli::cli::{
/// #     Cli, Command, GenerateCommand, OutputFormat, RosterArgs, RosterSource, run_cli,
/// # };
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     "Name\tHandle\tFaction\tTags\tTwFollowers\tTwFollowing\n\
///      A\ta\tf\t\t2\t2\nB\tb\tf\t\t2\t2\nC\tc\tf\t\t2\t2\n",
/// )?;
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         affinity: Default::default(),
///         modifiers: Default::default(),
///         repair: Default::default(),
///         seed: 7,
///         format: OutputFormat::Edges,
///         out: None,
///         source: RosterSource::Tsv(RosterArgs {
///             path: file.path().to_path_buf(),
///             name: Some("trio".into()),
///         }),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.roster, "trio");
/// assert_eq!(summary.graph.edges().len(), 6);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<GenerationSummary, CliError> {
    match cli.command {
        Command::Generate(generate) => {
            Span::current().record("command", field::display("generate"));
            run_generate(generate)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(seed = command.seed, format = command.format.as_str(), source = field::Empty),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<GenerationSummary, CliError> {
    let graph = build_graph(&command)?;

    let span = Span::current();
    let provider = match &command.source {
        RosterSource::Tsv(args) => {
            span.record("source", field::display("tsv"));
            load_roster(args, |name, path| {
                RosterProvider::try_from_tsv_path(name, path)
            })?
        }
        RosterSource::Xlsx(args) => {
            span.record("source", field::display("xlsx"));
            load_roster(args, |name, path| {
                RosterProvider::try_from_xlsx_path(name, path)
            })?
        }
        RosterSource::Parquet(args) => {
            span.record("source", field::display("parquet"));
            load_roster(args, |name, path| {
                RosterProvider::try_from_parquet_path(name, path)
            })?
        }
    };

    let roster = provider.name().to_owned();
    let generated = graph.run(provider.into_registry()?);
    log_degree_summary(&roster, &generated, command.repair.degree_floor);

    Ok(GenerationSummary {
        roster,
        format: command.format,
        out: command.out,
        graph: generated,
    })
}

pub(super) fn build_graph(command: &GenerateCommand) -> Result<FollowGraph, GraphError> {
    let AffinityArgs {
        hub_country_probability,
        hub_global_probability,
        p_intra_faction,
        p_inter_faction,
        boost_coefficient,
        bandwagon_scale,
        big_follow_ratio_threshold,
        big_user_ratio,
        min_follow_cutoff,
    } = command.affinity;
    GraphBuilder::new()
        .with_hub_country_probability(hub_country_probability)
        .with_hub_global_probability(hub_global_probability)
        .with_p_intra_faction(p_intra_faction)
        .with_p_inter_faction(p_inter_faction)
        .with_boost_coefficient(boost_coefficient)
        .with_bandwagon_scale(bandwagon_scale)
        .with_big_follow_ratio_threshold(big_follow_ratio_threshold)
        .with_big_user_ratio(big_user_ratio)
        .with_min_follow_cutoff(min_follow_cutoff)
        .with_modifiers(command.modifiers.into())
        .with_degree_floor(command.repair.degree_floor)
        .with_max_repair_passes(command.repair.max_repair_passes)
        .with_seed(command.seed)
        .build()
}

#[instrument(
    name = "cli.load_roster",
    err,
    skip(args, load),
    fields(path = %args.path.display(), override_name = field::Empty),
)]
fn load_roster<F>(args: &RosterArgs, load: F) -> Result<RosterProvider, RosterProviderError>
where
    F: FnOnce(String, &Path) -> Result<RosterProvider, RosterProviderError>,
{
    Span::current().record(
        "override_name",
        field::display(args.name.as_deref().unwrap_or("<derived>")),
    );
    let name = derive_roster_name(&args.path, args.name.as_deref());
    load(name, &args.path)
}

pub(super) fn derive_roster_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "roster".to_owned())
}

fn log_degree_summary(roster: &str, generated: &GeneratedGraph, floor: u64) {
    let report = generated.degree_report();
    let below_floor = report.iter().filter(|row| !row.meets_floor(floor)).count();
    let (min_in, max_in) = min_max(report.iter().map(|row| row.current_in));
    let (min_out, max_out) = min_max(report.iter().map(|row| row.current_out));
    for row in &report {
        debug!(
            handle = row.handle.as_str(),
            desired_in = row.desired_in,
            current_in = row.current_in,
            desired_out = row.desired_out,
            current_out = row.current_out,
            "persona degrees"
        );
    }
    info!(
        roster,
        personas = report.len(),
        edges = generated.edges().len(),
        repair_passes = generated.repair_report().passes,
        repaired_edges = generated.repair_report().edges_added,
        below_floor,
        min_in,
        max_in,
        min_out,
        max_out,
        "degree summary"
    );
}

fn min_max(values: impl Iterator<Item = u64>) -> (u64, u64) {
    values.fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
    })
    .unwrap_or((0, 0))
}
