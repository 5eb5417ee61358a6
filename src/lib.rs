pub mod buffer;
pub mod cli;
pub mod config;
pub mod error;
pub mod fixes;
pub mod patcher;
pub mod rule;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FixSetSpec, RuleSpec, RuleSpecKind, WriteConfig};
pub use error::{PatchError, Result, UserFriendlyError};

// Core functionality re-exports
pub use buffer::TextBuffer;
pub use fixes::{builtin_fix_sets, FixSet, FixSetRegistry};
pub use patcher::{PatchJob, PatchProgress, PatchReport, PatchSummary, Patcher};
pub use rule::{Replacement, Rule, RuleOutcome};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface for MockPatch functionality
pub struct MockPatch {
    config: Config,
    registry: FixSetRegistry,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl MockPatch {
    /// Create a new MockPatch instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let registry = FixSetRegistry::with_custom(&config.fix_sets)?;
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Ok(Self {
            config,
            registry,
            output_formatter,
            progress_manager,
        })
    }

    /// Create MockPatch instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        )
    }

    /// Turn a fix-set chain and optional file list into patch jobs.
    ///
    /// With explicit files, every file gets the whole chain. Without, each
    /// fix set goes to its default target and sets that share a target are
    /// merged into one job, keeping chain order.
    pub fn plan(&self, chain: &str, files: &[PathBuf]) -> Result<Vec<PatchJob>> {
        let fix_sets = self.registry.resolve(chain)?;

        if !files.is_empty() {
            return Ok(files
                .iter()
                .map(|file| {
                    let mut job = PatchJob::new(file.clone());
                    for fix_set in &fix_sets {
                        job.push_fix_set(fix_set);
                    }
                    job
                })
                .collect());
        }

        self.config.validate_project_root()?;

        let mut jobs: Vec<PatchJob> = Vec::new();
        for fix_set in fix_sets {
            let target = fix_set.default_target().ok_or_else(|| PatchError::Config {
                message: format!(
                    "Fix set '{}' has no default target; pass the files to patch explicitly",
                    fix_set.name()
                ),
            })?;
            let path = self.config.resolve_target(target);

            match jobs.iter_mut().find(|job| job.path == path) {
                Some(job) => job.push_fix_set(fix_set),
                None => jobs.push(PatchJob::new(path).with_fix_set(fix_set)),
            }
        }

        Ok(jobs)
    }

    /// Run the planned jobs, reporting each file as it completes.
    pub fn patch(&self, jobs: &[PatchJob], dry_run: bool) -> PatchSummary {
        let formatter = &self.output_formatter;
        let patcher = Patcher::new()
            .with_dry_run(dry_run)
            .with_atomic_write(self.config.write.atomic)
            .with_skip_unchanged(self.config.write.skip_unchanged)
            .with_diff(dry_run || formatter.verbose_level() >= 1);

        let file_progress = if jobs.len() > 1 {
            self.progress_manager.create_file_progress(jobs.len() as u64)
        } else {
            indicatif::ProgressBar::hidden()
        };

        let mut last_progress = None;
        let summary = patcher.run_jobs(jobs, |job, progress, result| {
            self.progress_manager.suspend(|| match result {
                // Only a file that was read is announced.
                Ok(report) => {
                    formatter.start_operation(&format!("Processing {}...", job.path.display()));
                    formatter.print_patch_report(report);
                }
                Err(e) => formatter.print_patch_failure(&job.path, e),
            });
            ui::progress::update_file_progress(&file_progress, progress);
            last_progress = Some(progress.clone());
        });

        if let Some(progress) = last_progress {
            ui::progress::finish_progress(&file_progress, &progress);
        }

        summary
    }

    /// Print every known fix set with its resolved default target.
    pub fn list_fix_sets(&self) {
        self.output_formatter
            .print_fix_set_list(self.registry.all(), |target| self.config.resolve_target(target));
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &FixSetRegistry {
        &self.registry
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &PatchError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Apply one built-in or config-free fix set to a file with default settings.
pub fn patch_file<P: AsRef<Path>>(path: P, fix_set_name: &str) -> Result<PatchReport> {
    let registry = FixSetRegistry::builtin()?;
    let fix_set = registry.resolve(fix_set_name)?;
    let mut job = PatchJob::new(path.as_ref());
    for fix_set in fix_set {
        job.push_fix_set(fix_set);
    }
    Patcher::new().run_job(&job)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
