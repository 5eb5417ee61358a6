use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mockpatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Apply ordered literal and regex patch rules to test files in place")]
#[command(
    long_about = "MockPatch reads a text file, runs the rules of one or more fix sets over it \
                  in order, and writes the result back to the same path."
)]
#[command(after_help = "EXAMPLES:\n  \
    mockpatch --list\n  \
    mockpatch graphql-mocks tests/tools/get-price-history.test.ts\n  \
    mockpatch simulate-complete --project-root ../lagoon-mcp\n  \
    mockpatch simulation-results,simulate-vault path/to/simulate-vault.test.ts --dry-run -v\n  \
    mockpatch my-fixes --config mockpatch.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Fix sets to apply, comma-separated, in order
    #[arg(required_unless_present_any = ["list", "generate_config"])]
    pub fix_sets: Option<String>,

    /// Files to patch (defaults to each fix set's target under the project root)
    pub files: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Project root used to resolve default targets
    #[arg(short = 'C', long, env = "MOCKPATCH_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are printed)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write through a temporary file and rename it over the target
    #[arg(long)]
    pub atomic: bool,

    /// List available fix sets and exit
    #[arg(long)]
    pub list: bool,

    /// Generate a sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// One JSON object per line
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_project_root(self.project_root.clone())
            .with_atomic(if self.atomic { Some(true) } else { None })
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }

    pub fn fix_set_chain(&self) -> &str {
        self.fix_sets.as_deref().unwrap_or_default()
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
