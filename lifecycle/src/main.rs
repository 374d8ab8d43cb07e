//! Main entry point for the suite runner binary
//!
//! Loads a suite definition, runs each class through a suite-aware runner and
//! reports the outcome, with suite hooks executed exactly once around the run.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use lifecycle::services::{CommandAdaptorBuilder, CommandRunnerFactory};
use lifecycle::{ExecutionMode, LifecycleResult, SuiteConfig, SuiteHost, SuiteRun};
use shared::{logging, TestStatus};

const COMPONENT: &str = "suite-runner";

/// Runs test classes with shared suite-level setup and teardown
#[derive(Parser)]
#[command(name = "suite-runner")]
#[command(about = "Runs a suite of test classes with suite-level setup and teardown hooks")]
pub struct Args {
    /// Path to the JSON suite definition
    #[arg(long)]
    pub suite: PathBuf,

    /// Run all classes concurrently instead of one after another
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Directory to run commands in, overriding the suite file
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Only run the named classes (repeatable)
    #[arg(long = "class")]
    pub classes: Vec<String>,

    /// Suppress output for passing tests
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

fn print_report(run: &SuiteRun, quiet: bool) {
    for outcome in &run.summary.outcomes {
        match outcome.status {
            TestStatus::Passed if quiet => {}
            TestStatus::Passed => println!("{}: PASSED", outcome.description),
            TestStatus::Ignored => println!("{}: IGNORED", outcome.description),
            TestStatus::Failed => {
                println!("{}: FAILED", outcome.description);
                for failure in &outcome.failures {
                    println!("  {}", failure.message);
                    if let Some(cause) = &failure.cause {
                        println!("  caused by: {cause}");
                    }
                }
            }
        }
    }

    if let Some(teardown_error) = &run.summary.teardown_error {
        println!("Suite teardown failed: {teardown_error}");
    }

    println!(
        "{} tests executed in: {:.4}s",
        run.summary.total,
        run.summary.elapsed_ms as f64 / 1000.0
    );
    println!(
        "[{}/{}] tests pass",
        run.summary.passed,
        run.summary.total - run.summary.ignored
    );
}

#[tokio::main]
async fn main() -> LifecycleResult<ExitCode> {
    let args = Args::parse();

    // Commands inherit the environment, including anything from .env
    let _ = dotenv::dotenv();

    logging::init_tracing_with_level(Some(&args.log_level))?;
    logging::log_startup(COMPONENT, &format!("suite {}", args.suite.display()));

    let config = SuiteConfig::load(&args.suite)?;
    let classes = config.select_classes(&args.classes)?;
    let working_dir = args.working_dir.clone().or_else(|| config.working_dir.clone());

    let builder =
        CommandAdaptorBuilder::new(config.commands()).with_working_dir(working_dir.clone());
    let host = SuiteHost::new(CommandRunnerFactory::new(working_dir), Arc::new(builder));

    let mode = if args.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };

    let run = host.run(&classes, mode).await;
    print_report(&run, args.quiet);

    if let Some(report_path) = &args.report {
        std::fs::write(report_path, run.summary.to_json()?)?;
        logging::log_success(COMPONENT, &format!("Report written to {}", report_path.display()));
    }

    if let Err(error) = &run.teardown {
        logging::log_error(COMPONENT, "Suite teardown", error);
    }

    if run.was_successful() {
        logging::log_success(COMPONENT, &format!("Suite {} passed", config.name));
        Ok(ExitCode::SUCCESS)
    } else {
        logging::log_shutdown(COMPONENT, &format!("suite {} failed", config.name));
        Ok(ExitCode::FAILURE)
    }
}
