mod profile;
mod registry;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use passforge_core::{Error as CoreError, ExpandLimits, FieldValue, FieldsSchema, SchemaEngine};
use passforge_generate::output::sort::{SortOrder, sort_rows};
use passforge_generate::{
    Combinator, GenerationDriver, GenerationError, GenerationProfile, OutputFormat,
    SamplingStrategy,
};
use registry::{RunContext, init_console_logging, init_run_logging, start_run, write_outcome};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("schema error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "passforge", version, about = "Bulk password generation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and validate passwords.
    Generate(GenerateArgs),
    /// Expand a field schema and count its combinations.
    Expand(ExpandArgs),
    /// Print the JSON Schema of the field schema format.
    Schema,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
    Txt,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Txt => OutputFormat::Txt,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Random,
    Exhaustive,
}

impl From<StrategyArg> for SamplingStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Random => SamplingStrategy::Random,
            StrategyArg::Exhaustive => SamplingStrategy::Exhaustive,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Profile file (TOML, or JSON with a .json extension).
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Shortest password length.
    #[arg(long)]
    length_min: Option<usize>,
    /// Longest password length.
    #[arg(long)]
    length_max: Option<usize>,
    /// Copies per drawn combination.
    #[arg(long)]
    copies: Option<u64>,
    /// Number of draws. Defaults to the distinct combination count.
    #[arg(long)]
    count: Option<u64>,
    /// Reject repeated combinations.
    #[arg(long, default_value_t = false)]
    unique: bool,
    /// Seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    #[arg(long, default_value_t = false)]
    no_easy_to_say: bool,
    #[arg(long, default_value_t = false)]
    no_easy_to_read: bool,
    #[arg(long, default_value_t = false)]
    no_all_characters: bool,
    #[arg(long, default_value_t = false)]
    no_upper_case: bool,
    #[arg(long, default_value_t = false)]
    no_lower_case: bool,
    #[arg(long, default_value_t = false)]
    no_numbers: bool,
    #[arg(long, default_value_t = false)]
    no_symbols: bool,
    #[arg(long, value_enum, default_value = "json")]
    format: FormatArg,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Extra copy of the rows outside the run directory.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Dot path to sort rows by, e.g. `detailed_score.guesses_log10`.
    #[arg(long)]
    sort_by: Option<String>,
    /// Sort descending.
    #[arg(long, default_value_t = false, requires = "sort_by")]
    desc: bool,
}

#[derive(Args, Debug)]
struct ExpandArgs {
    /// Field schema JSON file.
    schema: PathBuf,
    /// Largest candidate list allowed for a single field.
    #[arg(long)]
    max_candidates: Option<usize>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Expand(args) => run_expand(args),
        Command::Schema => run_schema(),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let mut profile = match &args.profile {
        Some(path) => profile::load_profile(path)?,
        None => GenerationProfile::default(),
    };
    apply_overrides(&mut profile, &args);

    if profile.length_min > profile.length_max {
        return Err(CliError::InvalidConfig(format!(
            "length_min {} is greater than length_max {}",
            profile.length_min, profile.length_max
        )));
    }
    if profile.copies_per_length == 0 {
        return Err(CliError::InvalidConfig(
            "copies per length must be at least 1".to_string(),
        ));
    }

    let format = OutputFormat::from(args.format);
    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir: args.run_dir.clone(),
        format,
        profile: profile.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;
    tracing::info!(event = "run_started", run_id = %run_id, format = format.extension());

    let timer = Instant::now();
    let driver = GenerationDriver::from_profile(&profile);
    let mut outcome = driver.run_as(&run_id, &profile)?;

    if let Some(path) = &args.sort_by {
        let order = if args.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        sort_rows(&mut outcome.rows, path, order)?;
    }

    write_outcome(&run_paths, &outcome, format, args.out.as_deref())?;
    tracing::info!(event = "rows_written", path = %run_paths.rows_path.display());

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    println!(
        "{} rows, {} failed, seed {} -> {}",
        outcome.report.rows_generated,
        outcome.report.items_failed,
        outcome.report.seed,
        run_paths.root.display()
    );
    Ok(())
}

fn apply_overrides(profile: &mut GenerationProfile, args: &GenerateArgs) {
    if let Some(length_min) = args.length_min {
        profile.length_min = length_min;
    }
    if let Some(length_max) = args.length_max {
        profile.length_max = length_max;
    }
    if let Some(copies) = args.copies {
        profile.copies_per_length = copies;
    }
    if args.count.is_some() {
        profile.count = args.count;
    }
    if args.seed.is_some() {
        profile.seed = args.seed;
    }
    if let Some(strategy) = args.strategy {
        profile.strategy = strategy.into();
    }
    profile.unique |= args.unique;
    profile.easy_to_say &= !args.no_easy_to_say;
    profile.easy_to_read &= !args.no_easy_to_read;
    profile.all_characters &= !args.no_all_characters;
    profile.upper_case &= !args.no_upper_case;
    profile.lower_case &= !args.no_lower_case;
    profile.numbers &= !args.no_numbers;
    profile.symbols &= !args.no_symbols;
}

#[derive(Serialize)]
struct ExpandedField<'a> {
    name: &'a str,
    values: &'a [FieldValue],
}

#[derive(Serialize)]
struct ExpandSummary<'a> {
    fields: Vec<ExpandedField<'a>>,
    distinct_combinations: u64,
}

fn run_expand(args: ExpandArgs) -> Result<(), CliError> {
    init_console_logging()?;

    let content = std::fs::read_to_string(&args.schema)?;
    let schema: FieldsSchema = serde_json::from_str(&content)?;

    let mut limits = ExpandLimits::default();
    if let Some(max_candidates) = args.max_candidates {
        limits.max_candidates = max_candidates;
    }
    let candidates = SchemaEngine::new(limits).expand_resolved(&schema)?;
    let distinct = Combinator::default().count_combinations(&candidates)?;
    tracing::debug!(fields = candidates.len(), distinct, "schema expanded");

    let summary = ExpandSummary {
        fields: candidates
            .fields()
            .iter()
            .map(|(name, values)| ExpandedField {
                name: name.as_str(),
                values: values.as_slice(),
            })
            .collect(),
        distinct_combinations: distinct,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_schema() -> Result<(), CliError> {
    let schema = schemars::schema_for!(FieldsSchema);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
