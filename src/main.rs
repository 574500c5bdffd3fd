use anyhow::Context;
use anyhow::Result;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use log::warn;
use log::LevelFilter;
use project_sheet::config::Config;
use project_sheet::output::json;
use project_sheet::output::typescript;
use project_sheet::output::typescript::Order;
use project_sheet::output::typescript::TypeScriptOptions;
use project_sheet::project::ClassificationPolicy;
use project_sheet::project::ExtractOptions;
use project_sheet::project::ProjectRecord;
use project_sheet::project::Summary;
use project_sheet::scan_workbook;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "project-sheet", version, about = "Extract project rows from the Storage Materials workbook")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    options: Options,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Read the workbook and write the JSON records
    Scan,
    /// Turn the JSON records into the TypeScript data module
    Generate,
    /// Scan, then generate (default)
    Run,
}

#[derive(Args)]
struct Options {
    /// TOML configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Source workbook
    #[arg(short, long, value_name = "PATH", global = true)]
    input: Option<PathBuf>,

    /// JSON records file
    #[arg(long, value_name = "PATH", global = true)]
    json: Option<PathBuf>,

    /// Generated TypeScript module
    #[arg(long, value_name = "PATH", global = true)]
    typescript: Option<PathBuf>,

    /// Classification policy replacing the built-in one
    #[arg(long, value_name = "PATH", global = true)]
    policy: Option<PathBuf>,

    /// Sheet name glob (repeatable); the active sheet when omitted
    #[arg(long, value_name = "PATTERN", global = true)]
    sheet: Vec<String>,

    /// Also write the summary as JSON
    #[arg(long, value_name = "PATH", global = true)]
    summary: Option<PathBuf>,

    /// Order of the generated array
    #[arg(long, value_enum, global = true)]
    order: Option<OrderArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum OrderArg {
    /// Highest row first
    LatestFirst,
    /// Sheet order
    Sheet,
}

impl From<OrderArg> for Order {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::LatestFirst => Order::LatestFirst,
            OrderArg::Sheet => Order::Sheet,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = resolve_config(&cli.options)?;
    match cli.command.unwrap_or(Command::Run) {
        Command::Scan => {
            scan(&config)?;
        }
        Command::Generate => {
            let records = json::read_records(&config.json)
                .with_context(|| format!("Failed to read records from '{}'", config.json.display()))?;
            generate(&config, &records)?;
        }
        Command::Run => {
            let records = scan(&config)?;
            generate(&config, &records)?;
        }
    }
    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Defaults, then the configuration file, then flags.
fn resolve_config(options: &Options) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load configuration '{}'", path.display()))?,
        None => Config::default(),
    };
    if let Some(input) = &options.input {
        config.input = input.to_owned();
    }
    if let Some(path) = &options.json {
        config.json = path.to_owned();
    }
    if let Some(path) = &options.typescript {
        config.typescript = path.to_owned();
    }
    if options.policy.is_some() {
        config.policy = options.policy.to_owned();
    }
    if !options.sheet.is_empty() {
        config.sheet = options.sheet.to_owned();
    }
    if options.summary.is_some() {
        config.summary = options.summary.to_owned();
    }
    if let Some(order) = options.order {
        config.order = order.into();
    }
    Ok(config)
}

fn scan(config: &Config) -> Result<Vec<ProjectRecord>> {
    let policy = match &config.policy {
        Some(path) => ClassificationPolicy::load(path)
            .with_context(|| format!("Failed to load classification policy '{}'", path.display()))?,
        None => ClassificationPolicy::builtin().context("Failed to load built-in classification policy")?,
    };
    let options = ExtractOptions {
        header_rows: config.header_rows,
        comment_limit: config.comment_limit,
    };

    let extraction = scan_workbook(&config.input, &config.sheet, &policy, &options)
        .with_context(|| format!("Failed to scan workbook '{}'", config.input.display()))?;
    if !extraction.issues.is_empty() {
        warn!(
            "{} values could not be read as numbers and were left empty (-vv lists them)",
            extraction.issues.len()
        );
    }

    json::write_records(&config.json, &extraction.records)
        .with_context(|| format!("Failed to write '{}'", config.json.display()))?;

    let summary = Summary::from_records(&extraction.records)?;
    summary.log();
    if let Some(path) = &config.summary {
        json::write_value(path, &summary).with_context(|| format!("Failed to write summary '{}'", path.display()))?;
    }

    println!("Saved {} projects to {}", extraction.records.len(), config.json.display());
    Ok(extraction.records)
}

fn generate(config: &Config, records: &[ProjectRecord]) -> Result<()> {
    let options = TypeScriptOptions {
        source_name: config
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.input.display().to_string()),
        order: config.order,
        comment_limit: config.typescript_comment_limit,
    };
    typescript::write(&config.typescript, records, &options)
        .with_context(|| format!("Failed to write '{}'", config.typescript.display()))?;
    println!("Generated {} with {} projects", config.typescript.display(), records.len());
    Ok(())
}
