// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use ectrans::app_config::{self, Config, TranslationProvider};
use ectrans::app_controller::Controller;
use ectrans::database::{Repository, SearchFilters};
use ectrans::extraction::segmenter::SegmentationStrategy;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Offline,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Offline => TranslationProvider::Offline,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SegmentationStrategy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSegmentation {
    WholeBlock,
    LineScan,
}

impl From<CliSegmentation> for SegmentationStrategy {
    fn from(cli_strategy: CliSegmentation) -> Self {
        match cli_strategy {
            CliSegmentation::WholeBlock => SegmentationStrategy::WholeBlock,
            CliSegmentation::LineScan => SegmentationStrategy::LineScan,
        }
    }
}

/// Options shared by every command that loads the configuration
#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// SQLite database file (overrides the configuration)
    #[arg(long, env = "ECTRANS_DATABASE")]
    database: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Certificate text file or directory of .txt files
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Print assembled records as JSON instead of storing them
    #[arg(short, long)]
    dry_run: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for language-model providers
    #[arg(short, long)]
    model: Option<String>,

    /// Entry segmentation strategy
    #[arg(short, long, value_enum)]
    segmentation: Option<CliSegmentation>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct SearchArgs {
    /// Substring of the buyer name
    #[arg(long)]
    buyer_name: Option<String>,

    /// Substring of the seller name
    #[arg(long)]
    seller_name: Option<String>,

    /// Substring of the house number
    #[arg(long)]
    house_number: Option<String>,

    /// Substring of the survey number
    #[arg(long)]
    survey_number: Option<String>,

    /// Substring of the document number
    #[arg(long)]
    document_number: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract, translate and store transactions from certificate text
    Process(ProcessArgs),

    /// List stored transactions as JSON
    Search(SearchArgs),

    /// Generate shell completions for ectrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ectrans - Encumbrance Certificate Translator
///
/// Structures the extracted text of Tamil Nadu encumbrance certificates into
/// transaction records and renders Tamil party and place names in English.
#[derive(Parser, Debug)]
#[command(name = "ectrans")]
#[command(version)]
#[command(about = "Tamil encumbrance certificate extraction and translation")]
#[command(long_about = "ectrans splits encumbrance certificate text into registration entries, \
extracts their fields, translates Tamil names and stores the records in SQLite.

EXAMPLES:
    ectrans process ec-2013.txt                  # Extract, translate and store
    ectrans process --dry-run ec-2013.txt        # Print records as JSON instead
    ectrans process -p offline certificates/     # Process a folder without network access
    ectrans search --buyer-name nithya           # Find stored records
    ectrans completions bash > ectrans.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created automatically.

SUPPORTED PROVIDERS:
    google    - Google Cloud Translation (requires API key)
    openai    - OpenAI API (requires API key)
    anthropic - Anthropic API (requires API key)
    offline   - Local transliteration only")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Most verbose level here; the effective level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ectrans", &mut std::io::stdout());
            Ok(())
        }
        Commands::Process(args) => run_process(args).await,
        Commands::Search(args) => run_search(args).await,
    }
}

/// Load the configuration and apply the shared overrides
fn load_config(common: &CommonArgs) -> Result<Config> {
    if let Some(level) = &common.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&common.config_path)?;

    if let Some(level) = &common.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    if let Some(database) = &common.database {
        config.storage.database_path = Some(database.clone());
    }

    Ok(config)
}

async fn run_process(options: ProcessArgs) -> Result<()> {
    let mut config = load_config(&options.common)?;

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(segmentation) = &options.segmentation {
        config.extraction.segmentation = segmentation.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    let controller = if options.dry_run {
        Controller::with_repository(config, Repository::new_in_memory()?)?
    } else {
        Controller::with_config(config)?
    };

    let cancel = controller.cancellation_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current record before stopping");
            cancel.cancel();
        }
    });

    let input_path = options.input_path.as_path();
    let outcomes = if input_path.is_file() {
        vec![controller.run(input_path.to_path_buf(), options.dry_run).await?]
    } else if input_path.is_dir() {
        let summary = controller.run_folder(input_path.to_path_buf(), options.dry_run).await?;
        if summary.cancelled {
            warn!("Processing cancelled; stopped after {} files", summary.outcomes.len());
        }
        summary.outcomes
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    };

    if options.dry_run {
        let records: Vec<_> = outcomes.iter().flat_map(|o| o.report.records.iter()).collect();
        print_json(&records)?;
    } else {
        let stored: usize = outcomes.iter().map(|o| o.stored_ids.len()).sum();
        info!("Stored {} transactions in {}", stored, display_path(controller.repository().connection().path()));
    }

    Ok(())
}

async fn run_search(options: SearchArgs) -> Result<()> {
    let config = load_config(&options.common)?;

    let repository = match &config.storage.database_path {
        Some(path) => Repository::new(ectrans::database::DatabaseConnection::new(path)?),
        None => Repository::new_default()?,
    };

    let filters = SearchFilters {
        buyer_name: options.buyer_name,
        seller_name: options.seller_name,
        house_number: options.house_number,
        survey_number: options.survey_number,
        document_number: options.document_number,
    };

    let records = repository.query(&filters).await?;
    info!("{} matching transactions", records.len());
    print_json(&records)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize records to JSON")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
