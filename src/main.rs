use anyhow::{bail, Context};
use clap::Parser;
use mockpatch::{Cli, MockPatch, OutputFormatter, PatchError};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let mockpatch = match MockPatch::from_cli(&cli) {
        Ok(mockpatch) => mockpatch,
        Err(e) => {
            print_startup_error(&cli, &e);
            return 1;
        }
    };

    if cli.list {
        mockpatch.list_fix_sets();
        return 0;
    }

    let jobs = match mockpatch.plan(cli.fix_set_chain(), &cli.files) {
        Ok(jobs) => jobs,
        Err(e) => {
            mockpatch.handle_error(&e);
            return 1;
        }
    };

    let summary = mockpatch.patch(&jobs, cli.dry_run);
    if jobs.len() > 1 {
        mockpatch.output_formatter().print_summary(&summary);
    }

    // Any failed target is a failed run
    if summary.is_success() {
        0
    } else {
        1
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("mockpatch.toml"));

    match write_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  mockpatch <fix-sets> --config {}", config_path.display());
            println!("\nEdit the file to add your own fix sets.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {:#}", e);
            1
        }
    }
}

fn write_sample_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        bail!("{} already exists, refusing to overwrite it", path.display());
    }

    MockPatch::generate_sample_config(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn print_startup_error(cli: &Cli, error: &PatchError) {
    let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
    formatter.print_user_friendly_error(error);
}
