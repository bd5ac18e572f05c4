use crate::error::Error;
use crate::status::ResultStatus;
use std::fmt;
use std::str::FromStr;

/// Build history is capped to this many of the newest builds.
pub const HISTORY_WINDOW: usize = 25;

/// Author shown for builds without culprits.
pub const NO_AUTHOR: &str = "---";

/// One row of the jobs view. Rebuilt from scratch on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub last_result: Option<ResultStatus>,
    /// Percent complete of the build in flight; `None` when idle.
    pub progress: Option<u8>,
    pub last_success_age: Option<String>,
    pub last_failure_age: Option<String>,
}

impl Job {
    pub fn status(&self) -> ResultStatus {
        ResultStatus::of(self.last_result)
    }

    pub fn is_building(&self) -> bool {
        self.progress.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub number: u64,
    pub author: String,
    pub url: String,
    /// Rendered age of the build start; empty when the server gave no timestamp.
    pub age: String,
    pub building: bool,
    pub result: Option<ResultStatus>,
}

impl Build {
    pub fn status(&self) -> ResultStatus {
        ResultStatus::of(self.result)
    }
}

/// Recent builds of one job, newest first, plus pointers into that list.
///
/// The pointers are computed once from `builds`, so they always name a build
/// that is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildHistory {
    job_name: String,
    builds: Vec<Build>,
    latest_successful: Option<u64>,
    latest_failed: Option<u64>,
    latest_finished: Option<u64>,
}

impl BuildHistory {
    pub fn new(job_name: impl Into<String>, mut builds: Vec<Build>) -> Self {
        builds.truncate(HISTORY_WINDOW);
        let first = |pred: fn(&Build) -> bool| builds.iter().find(|b| pred(b)).map(|b| b.number);
        let latest_successful = first(|b| b.result == Some(ResultStatus::Success));
        let latest_failed = first(|b| b.result == Some(ResultStatus::Failure));
        let latest_finished = first(|b| !b.building);
        Self {
            job_name: job_name.into(),
            builds,
            latest_successful,
            latest_failed,
            latest_finished,
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn builds(&self) -> &[Build] {
        &self.builds
    }

    pub fn latest_successful(&self) -> Option<u64> {
        self.latest_successful
    }

    pub fn latest_failed(&self) -> Option<u64> {
        self.latest_failed
    }

    pub fn latest_finished(&self) -> Option<u64> {
        self.latest_finished
    }

    pub fn get(&self, number: u64) -> Option<&Build> {
        self.builds.iter().find(|b| b.number == number)
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    String,
    Boolean,
    Choice,
    Text,
    Other,
}

impl ParameterType {
    /// Maps the `type` field of a Jenkins parameter definition.
    pub fn from_api(kind: &str) -> Self {
        match kind {
            "StringParameterDefinition" => Self::String,
            "BooleanParameterDefinition" => Self::Boolean,
            "ChoiceParameterDefinition" => Self::Choice,
            "TextParameterDefinition" => Self::Text,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Choice => "choice",
            Self::Text => "text",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    pub kind: ParameterType,
    pub description: String,
    pub default_value: Option<String>,
    /// Allowed values; only populated for `Choice`.
    pub choices: Vec<String>,
}

impl ParameterDefinition {
    pub fn default_or_empty(&self) -> &str {
        self.default_value.as_deref().unwrap_or("")
    }
}

/// Working value of one parameter while a form is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEdit {
    pub name: String,
    pub value: String,
}

/// Which build of a job an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildRef {
    Number(u64),
    Last,
    LastCompleted,
}

impl BuildRef {
    pub fn path_segment(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Last => "lastBuild".to_string(),
            Self::LastCompleted => "lastCompletedBuild".to_string(),
        }
    }
}

impl fmt::Display for BuildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "#{n}"),
            Self::Last => f.write_str("last build"),
            Self::LastCompleted => f.write_str("last completed build"),
        }
    }
}

impl FromStr for BuildRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last" | "lastBuild" => Ok(Self::Last),
            "lastCompleted" | "lastCompletedBuild" => Ok(Self::LastCompleted),
            other => other
                .trim_start_matches('#')
                .parse()
                .map(Self::Number)
                .map_err(|_| {
                    Error::usage(format!(
                        "invalid build '{other}': expected a number, 'last' or 'lastCompleted'"
                    ))
                }),
        }
    }
}
