use std::path::{Path, PathBuf};

mod export;
mod list;
mod show;
mod terminal;
mod tree;
mod validate;

use anyhow::Context as _;
use clap::ArgAction;
use export::Export;
use list::List;
use non_empty_string::NonEmptyString;
use prereq::{Catalog, Config, Language};
use show::Show;
use tracing::instrument;
use tree::Tree;
use validate::Validate;

/// Config file read when `--config` is not given.
const DEFAULT_CONFIG: &str = "prereq.toml";

/// Parse a course code from the command line.
///
/// Surrounding whitespace is ignored; an empty code is rejected.
fn parse_code(s: &str) -> Result<NonEmptyString, String> {
    NonEmptyString::new(s.trim().to_string()).map_err(|_| "course code must not be empty".to_string())
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The course catalog (JSON or YAML)
    #[arg(short, long, default_value = "courses.json", global = true)]
    catalog: PathBuf,

    /// Configuration file (defaults to ./prereq.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display language, overriding the configuration (fi, en)
    #[arg(short, long, global = true)]
    language: Option<Language>,

    /// Active curriculum period token, overriding the configuration
    #[arg(long, global = true, conflicts_with = "all_periods")]
    period: Option<String>,

    /// Include courses from every curriculum period
    #[arg(long, global = true)]
    all_periods: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let context = Context {
            catalog: self.catalog,
            config: self.config,
            language: self.language,
            period: self.period,
            all_periods: self.all_periods,
        };

        self.command.run(&context)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Global options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Context {
    catalog: PathBuf,
    config: Option<PathBuf>,
    language: Option<Language>,
    period: Option<String>,
    all_periods: bool,
}

impl Context {
    /// The effective configuration: the config file (if any) with command-line
    /// overrides applied.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).map_err(anyhow::Error::msg)?,
            None => load_default_config(Path::new(DEFAULT_CONFIG)),
        };

        if let Some(language) = self.language {
            config.set_language(language);
        }
        if let Some(period) = &self.period {
            config.set_active_period(period);
            config.filter_periods = true;
        }
        if self.all_periods {
            config.filter_periods = false;
        }

        Ok(config)
    }

    /// Loads and indexes the catalog.
    fn open(&self) -> anyhow::Result<Catalog> {
        let config = self.config()?;
        Catalog::load(&self.catalog, config)
            .with_context(|| format!("failed to open catalog {}", self.catalog.display()))
    }
}

fn load_default_config(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    Config::load(path).unwrap_or_else(|e| {
        tracing::warn!("{e}; using default configuration");
        Config::default()
    })
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the prerequisite tree of a course
    Tree(Tree),

    /// List the courses of the active curriculum periods
    List(List),

    /// Show detailed information about a course
    Show(Show),

    /// Check the catalog for prerequisite cycles and broken references
    Validate(Validate),

    /// Write the prerequisite tree of every listed course as JSON
    Export(Export),

    /// Print the effective configuration
    Config,
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::Tree(command) => command.run(context)?,
            Self::List(command) => command.run(context)?,
            Self::Show(command) => command.run(context)?,
            Self::Validate(command) => command.run(context)?,
            Self::Export(command) => command.run(context)?,
            Self::Config => ShowConfig::run(context)?,
        }
        Ok(())
    }
}

struct ShowConfig;

impl ShowConfig {
    #[instrument(skip(context))]
    fn run(context: &Context) -> anyhow::Result<()> {
        let config = context.config()?;
        print!("{}", config.to_toml().map_err(anyhow::Error::msg)?);
        Ok(())
    }
}
