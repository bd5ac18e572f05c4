use clap::Parser;
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use jkw::cli::{BuildArgs, Cli, Command};
use jkw::http::{Credentials, HttpTransport};
use jkw::prompt::Prompter;
use jkw::{browser, render, watch};
use jkw_core::workflow::{self, PendingBuild};
use jkw_core::{BuildCommand, Confirm, JenkinsClient, Outcome, Transport};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "jkw v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn state_dir() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        PathBuf::from(state).join("jkw")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("state").join("jkw")
    } else {
        PathBuf::from("/tmp/jkw")
    }
}

async fn run_build(client: &JenkinsClient, args: BuildArgs) -> Result<()> {
    let command = if args.rebuild {
        BuildCommand::Rebuild
    } else {
        BuildCommand::Build
    };
    let mut prompter = Prompter::stdio();
    let mut assume_yes = |_: &str| true;

    let outcome = match workflow::begin(client, &args.job, command).await? {
        PendingBuild::Direct(trigger) => {
            if !args.params.is_empty() {
                bail!("{} declares no parameters; drop the -p flags", args.job);
            }
            let confirm: &mut dyn Confirm = if args.yes {
                &mut assume_yes
            } else {
                &mut prompter
            };
            trigger.confirm_and_trigger(client, confirm).await?
        }
        PendingBuild::Form(mut form) => {
            form.apply(args.params.iter().map(|(name, value)| (name, value)))?;
            if !args.no_input {
                prompter
                    .edit_form(&mut form)
                    .wrap_err("Failed to read parameter values")?;
            }
            prompter.print_summary(&form.submission_values())?;
            let confirm: &mut dyn Confirm = if args.yes {
                &mut assume_yes
            } else {
                &mut prompter
            };
            form.confirm_and_submit(client, confirm).await?
        }
    };

    match outcome {
        Outcome::Triggered => println!("Triggered {}", args.job),
        Outcome::Submitted => println!("Submitted {} with parameters", args.job),
        Outcome::Cancelled => println!("Cancelled"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let credentials = Credentials::new(args.user.as_str(), args.token.as_str());
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
        &credentials,
        Duration::from_secs(args.timeout),
    )?);
    let client = JenkinsClient::new(&args.url, args.view.clone(), transport)?;
    tracing::debug!(?client, ?credentials, "client configured");

    match args.command {
        Command::Jobs => {
            let jobs = client.list_jobs().await?;
            println!("{}", render::jobs_table(&jobs, args.name_width));
        }
        Command::History { job } => {
            let history = client.build_history(&job).await?;
            println!("{}", render::history_table(&history, args.author_width));
        }
        Command::Params { job } => {
            let definitions = client.parameter_definitions(&job).await?;
            println!("{}", render::params_table(&job, &definitions));
        }
        Command::Build(build) => run_build(&client, build).await?,
        Command::Console { job, build, tail } => {
            let text = client.console_output(&job, build).await?;
            match tail {
                Some(lines) => {
                    let (text, truncated) = render::process_log_output(&text, lines);
                    if truncated {
                        eprintln!("... showing last {lines} lines of {job} {build}");
                    }
                    println!("{text}");
                }
                None => print!("{text}"),
            }
        }
        Command::Open { job, build } => {
            let url = match build {
                Some(build) => client.build_url(&job, build),
                None => client.job_url(&job),
            };
            browser::open_in_browser(&url)?;
            println!("Opened {url}");
        }
        Command::Watch {
            interval,
            no_notify,
        } => watch::run(&client, interval, !no_notify, args.name_width).await?,
    }
    Ok(())
}
