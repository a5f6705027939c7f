// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use logging::{LogConfig, LogTarget};
use mfdesk_app::{AppState, ReportKind};
use mfdesk_db::Store;
use runtime::DbRuntime;
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `mfdesk --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let target = if options.check_only || options.seed_only {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file()?)
    };
    logging::init_logging(&LogConfig {
        level: config.log_level(),
        target,
    })?;

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or MFDESK_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo || options.seed_only {
        let outcome = store.seed_reference_data()?;
        if options.seed_only {
            println!("{}", outcome.message);
            return Ok(());
        }
    }
    if options.check_only {
        info!(db = %db_path.display(), "startup check passed");
        return Ok(());
    }

    let mut state = AppState {
        active_report: options.report.unwrap_or_else(|| config.default_report()),
        summary_scope: config.summary_scope(),
        ..AppState::default()
    };
    info!(
        db = %db_path.display(),
        report = state.active_report.as_str(),
        "launching"
    );

    let mut runtime = DbRuntime::new(&store);
    mfdesk_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    seed_only: bool,
    print_example: bool,
    check_only: bool,
    report: Option<ReportKind>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        seed_only: false,
        print_example: false,
        check_only: false,
        report: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--report" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--report requires a report name"))?;
                let kind = ReportKind::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "unknown report {:?}; expected one of: {}",
                        value.as_ref(),
                        ReportKind::ALL
                            .iter()
                            .map(|kind| kind.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                })?;
                options.report = Some(kind);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--seed" => {
                options.seed_only = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("mfdesk - microfinance reporting desk");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with seeded reference data (in-memory)");
    println!("  --seed                   Load reference data into the database and exit");
    println!("  --check                  Validate config + DB and exit");
    println!("  --report <name>          Open on a specific report (for example write_off)");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use mfdesk_app::ReportKind;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/mfdesk-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_db_path: false,
                demo: false,
                seed_only: false,
                print_example: false,
                check_only: false,
                report: None,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.print_db_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_demo_seed_and_db_path_print_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--demo", "--seed", "--print-path"],
            default_options_path(),
        )?;
        assert!(!options.print_config_path);
        assert!(options.print_db_path);
        assert!(options.demo);
        assert!(options.seed_only);
        Ok(())
    }

    #[test]
    fn parse_cli_args_resolves_report_names() -> Result<()> {
        let options = parse_cli_args(
            vec!["--report", "application_verification"],
            default_options_path(),
        )?;
        assert_eq!(options.report, Some(ReportKind::ApplicationVerification));

        let error = parse_cli_args(vec!["--report", "payroll"], default_options_path())
            .expect_err("unknown report should fail");
        let message = error.to_string();
        assert!(message.contains("unknown report \"payroll\""));
        assert!(message.contains("due_vs_collection"));

        let missing = parse_cli_args(vec!["--report"], default_options_path())
            .expect_err("missing report value should fail");
        assert!(missing.to_string().contains("--report requires a report name"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
