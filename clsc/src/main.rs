//! # clsc
//!
//! Counts blank, comment and code lines in C source files.
//!
//! ## Usage
//!
//! ```bash
//! # Count every .c file below a directory
//! clsc src/
//!
//! # Count a single file
//! clsc src/main.c
//!
//! # Per-file breakdown as JSON
//! clsc . --by-file --output json
//!
//! # Headers instead of sources, skipping anything unreadable
//! clsc include/ --extension h --on-error skip
//!
//! # One thread per file instead of a bounded pool
//! clsc . --thread-per-file
//! ```

mod render;

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clsclib::{count_path, Concurrency, CountOptions, FailurePolicy, FilterConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{render, OutputMode, Timing};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("clsc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Counts blank, comment and code lines in C source files")
        .arg(
            Arg::new("path")
                .required(true)
                .help("Source file or directory to analyze"),
        )
        .arg(
            Arg::new("extension")
                .short('x')
                .long("extension")
                .default_value(clsclib::DEFAULT_EXTENSION)
                .help("Source file extension to count"),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Worker threads in the pool (0 = one per CPU)"),
        )
        .arg(
            Arg::new("thread-per-file")
                .long("thread-per-file")
                .action(ArgAction::SetTrue)
                .conflicts_with("jobs")
                .help("Start one thread per file instead of using a pool"),
        )
        .arg(
            Arg::new("on-error")
                .long("on-error")
                .value_name("POLICY")
                .value_parser(|s: &str| s.parse::<FailurePolicy>())
                .default_value("abort")
                .help("What to do with unreadable files and directories: abort or skip"),
        )
        .arg(
            Arg::new("skip-unreadable")
                .long("skip-unreadable")
                .action(ArgAction::SetTrue)
                .conflicts_with("on-error")
                .help("Same as --on-error skip"),
        )
        .arg(
            Arg::new("by-file")
                .short('f')
                .long("by-file")
                .action(ArgAction::SetTrue)
                .help("Show breakdown by file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Report format"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable colored output"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log progress to stderr"),
        )
}

/// Logs go to stderr so stdout only carries the report. `RUST_LOG` wins
/// over `--verbose` when set.
fn setup_logging(verbose: bool, color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("clsc=debug,clsclib=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color && std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> Result<FilterConfig> {
    let extension = matches
        .get_one::<String>("extension")
        .map(|s| s.as_str())
        .unwrap_or(clsclib::DEFAULT_EXTENSION);
    let mut filter = FilterConfig::new().with_extension(extension);

    if let Some(includes) = matches.get_many::<String>("include") {
        for pattern in includes {
            filter = filter.include(pattern)?;
        }
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    Ok(filter)
}

/// Build count options from matches
fn build_options(matches: &ArgMatches) -> Result<CountOptions> {
    let concurrency = if matches.get_flag("thread-per-file") {
        Concurrency::PerFile
    } else {
        Concurrency::Pool {
            workers: matches.get_one::<usize>("jobs").copied().unwrap_or(0),
        }
    };

    let policy = if matches.get_flag("skip-unreadable") {
        FailurePolicy::Skip
    } else {
        matches
            .get_one::<FailurePolicy>("on-error")
            .copied()
            .unwrap_or_default()
    };

    let mut options = CountOptions::new()
        .filter(build_filter(matches)?)
        .concurrency(concurrency)
        .failure_policy(policy);

    if matches.get_flag("by-file") {
        options = options.with_file_stats();
    }

    Ok(options)
}

fn run(matches: &ArgMatches) -> Result<String> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .context("missing path argument")?;
    let mode: OutputMode = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("text")
        .parse()
        .map_err(anyhow::Error::msg)?;
    let options = build_options(matches)?;
    debug!("counting {} with {:?}", path, options);

    let start = Local::now();
    let clock = Instant::now();
    let result = count_path(path, &options)?;
    let timing = Timing {
        start,
        end: Local::now(),
        elapsed: clock.elapsed(),
    };

    let output = render(
        mode,
        Path::new(path),
        options.filter.extension(),
        &result,
        &timing,
    )?;
    Ok(output)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();

    let color = !matches.get_flag("no-color");
    if !color {
        console::set_colors_enabled(false);
    }
    setup_logging(matches.get_flag("verbose"), color);

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["clsc"];
        argv.extend(args);
        build_command().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_default_options() {
        let options = build_options(&parse(&["src"])).unwrap();

        assert_eq!(options.concurrency, Concurrency::Pool { workers: 0 });
        assert_eq!(options.failure_policy, FailurePolicy::Abort);
        assert_eq!(options.filter.extension(), "c");
        assert!(!options.per_file_stats);
    }

    #[test]
    fn test_all_options() {
        let options = build_options(&parse(&[
            "src",
            "--thread-per-file",
            "--skip-unreadable",
            "--by-file",
            "-x",
            ".h",
            "-e",
            "**/vendor/**",
        ]))
        .unwrap();

        assert_eq!(options.concurrency, Concurrency::PerFile);
        assert_eq!(options.failure_policy, FailurePolicy::Skip);
        assert_eq!(options.filter.extension(), "h");
        assert_eq!(options.filter.exclude.len(), 1);
        assert!(options.per_file_stats);
    }

    #[test]
    fn test_on_error_policy() {
        let skip = build_options(&parse(&["src", "--on-error", "skip"])).unwrap();
        let abort = build_options(&parse(&["src", "--on-error", "abort"])).unwrap();

        assert_eq!(skip.failure_policy, FailurePolicy::Skip);
        assert_eq!(abort.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_on_error_rejects_unknown_policy() {
        let result = build_command().try_get_matches_from(["clsc", "src", "--on-error", "maybe"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_skip_unreadable_conflicts_with_on_error() {
        let result = build_command().try_get_matches_from([
            "clsc",
            "src",
            "--skip-unreadable",
            "--on-error",
            "abort",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_jobs_conflicts_with_thread_per_file() {
        let result =
            build_command().try_get_matches_from(["clsc", "src", "-j", "4", "--thread-per-file"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_glob_is_an_error() {
        assert!(build_options(&parse(&["src", "-i", "[oops"])).is_err());
    }

    #[test]
    fn test_path_is_required() {
        assert!(build_command().try_get_matches_from(["clsc"]).is_err());
    }
}
