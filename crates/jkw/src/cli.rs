use clap::{Args, Parser, Subcommand};
use jkw_core::BuildRef;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_NUMBER"));

#[derive(Parser, Debug)]
#[command(name = "jkw", version = VERSION, about = "Jenkins job watcher and build trigger")]
pub struct Cli {
    /// Jenkins base URL (e.g. https://ci.example.com/)
    #[arg(long, env = "JENKINS_URL", value_parser = validate_base_url)]
    pub url: String,

    /// Only list jobs of this view
    #[arg(long, env = "JENKINS_VIEW")]
    pub view: Option<String>,

    /// User name for Basic auth
    #[arg(long, env = "JENKINS_USER")]
    pub user: String,

    /// API token for Basic auth
    #[arg(long, env = "JENKINS_API_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Width of the job name column
    #[arg(long, env = "JKW_NAME_WIDTH", default_value_t = 40)]
    pub name_width: usize,

    /// Width of the author column
    #[arg(long, env = "JKW_AUTHOR_WIDTH", default_value_t = 20)]
    pub author_width: usize,

    /// Enable verbose logging to $XDG_STATE_HOME/jkw/debug.log
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List jobs with their last result
    Jobs,
    /// Show the most recent builds of a job
    History { job: String },
    /// Show the parameters a job declares
    Params { job: String },
    /// Trigger a build, editing parameters first when the job has any
    Build(BuildArgs),
    /// Print the console output of a build
    Console {
        job: String,
        /// Build number, `last` or `lastCompleted`
        #[arg(default_value = "last", value_parser = parse_build_ref)]
        build: BuildRef,
        /// Only print the last N lines
        #[arg(long, value_name = "N")]
        tail: Option<usize>,
    },
    /// Open a job or build page in the browser
    Open {
        job: String,
        #[arg(value_parser = parse_build_ref)]
        build: Option<BuildRef>,
    },
    /// Poll the jobs view and report result changes
    Watch {
        /// Poll interval in seconds
        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Disable desktop notifications
        #[arg(long)]
        no_notify: bool,
    },
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    pub job: String,

    /// Re-run the last completed build; parameterised jobs start from their declared defaults
    #[arg(long)]
    pub rebuild: bool,

    /// Set a parameter; repeatable
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Do not prompt for parameter values; use defaults and -p only
    #[arg(long)]
    pub no_input: bool,
}

/// Accepts absolute http(s) URLs with a host.
pub fn validate_base_url(url: &str) -> Result<String, String> {
    let trimmed = url.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| format!("Invalid Jenkins URL '{url}'. Expected http:// or https://."))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err(format!("Invalid Jenkins URL '{url}'. Missing host."));
    }
    Ok(trimmed.to_string())
}

pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter '{raw}'. Expected NAME=VALUE."))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Invalid parameter '{raw}'. Name is empty."));
    }
    Ok((name.to_string(), value.to_string()))
}

pub fn parse_build_ref(raw: &str) -> Result<BuildRef, String> {
    raw.parse().map_err(|e: jkw_core::Error| e.to_string())
}
