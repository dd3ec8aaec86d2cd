// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use lumina_translate::app_config::{self, Config};
use lumina_translate::app_controller::Controller;
use lumina_translate::language_utils;

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text, sentence by sentence
    Text {
        /// Text to translate; reads INPUT_FILE (or stdin) when omitted
        #[arg(value_name = "TEXT")]
        text: Option<String>,

        /// File to read the text from, `-` for stdin
        #[arg(short, long, value_name = "INPUT_FILE", conflicts_with = "text")]
        input: Option<PathBuf>,

        /// File to write the translation to, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Translate a JSON result list or search response
    Results {
        /// JSON document to translate, `-` for stdin
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output path; defaults to `<stem>.<target>.json` next to the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// List the languages offered for translation
    Languages,

    /// Generate shell completions for lumina-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Lumina Translate - translation for search results and AI summaries
#[derive(Parser, Debug)]
#[command(name = "lumina-translate")]
#[command(version)]
#[command(about = "Translate search results and summaries through LibreTranslate")]
#[command(long_about = "Lumina Translate sends search results and summaries through a chain of
LibreTranslate endpoints, retrying each with backoff and falling back to an
offline approximation. Untranslatable text is kept as-is.

EXAMPLES:
    lumina-translate -t es text \"Hello world\"          # Translate a string
    lumina-translate -t de text -i summary.txt          # Translate a file
    lumina-translate -t fr results results.json         # Writes results.fr.json
    lumina-translate -t fr results - < response.json    # Read stdin, print stdout
    lumina-translate languages                          # List supported languages
    lumina-translate completions bash > lumina.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long = "config", global = true, default_value = "conf.json", env = "LUMINA_TRANSLATE_CONFIG")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level((&level).into());
    }

    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "lumina-translate", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Languages => {
            print_languages();
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli)?;
    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Text { text, input, output } => {
            match text {
                Some(text) => {
                    let translated = controller.translate_text(&text).await;
                    lumina_translate::file_utils::FileManager::write_output(&output, &translated)?;
                }
                None => {
                    let input = input.unwrap_or_else(|| PathBuf::from("-"));
                    controller.run_text(&input, &output).await?;
                }
            }
        }
        Commands::Results { input_path, output, force_overwrite } => {
            controller.run_results(&input_path, output, force_overwrite).await?;
        }
        Commands::Languages | Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load or create the configuration, then apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&cli.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", cli.config_path);
        let config = Config::default();
        config.save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", cli.config_path))?;
        config
    };

    if let Some(source_lang) = &cli.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &cli.target_language {
        config.target_language = target_lang.clone();
    }

    match &cli.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level((&config.log_level).into()),
    }

    config.validate().context("Configuration validation failed")?;

    Ok(config)
}

fn print_languages() {
    for info in language_utils::supported_languages() {
        let direction = if language_utils::is_rtl(info.code) { " (rtl)" } else { "" };
        println!("{:<4} {:<12} {}{}", info.code, info.name, info.native_name, direction);
    }
}
