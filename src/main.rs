//! envpin - Project-local tool installer with version pinning
//!
//! Installs a package into a project-local virtual environment (.venv)
//! and pins the resolved version in requirements.txt. Re-run with
//! --update to move the pin, or --reinstall to start over.

use clap::Parser;
use envpin::cli::CliArgs;
use envpin::flows::InstallFlow;
use envpin::output::Reporter;
use envpin::report::InstallReport;
use envpin::runner::SystemRunner;
use envpin::spec::PackageSpec;
use envpin::venv::EnvLayout;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Run the main logic and handle errors
    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let spec = PackageSpec::parse(&args.package)?;
    let reporter = if args.quiet {
        Reporter::silent()
    } else {
        Reporter::new(args.debug, false)
    };

    let runner = SystemRunner::new(args.debug);
    let flow = InstallFlow::new(
        EnvLayout::new(&args.path),
        &runner,
        reporter,
        spec,
        args.entrypoint.clone(),
    );

    let report = flow.run(args.update, args.reinstall)?;
    emit(&args, &reporter, &report)?;

    Ok(ExitCode::SUCCESS)
}

/// Render the final report
fn emit(args: &CliArgs, reporter: &Reporter, report: &InstallReport) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        reporter.success(&format!("\n{}", report.success_line()));
    }
    Ok(())
}
