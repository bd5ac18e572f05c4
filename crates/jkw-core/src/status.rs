use serde::Deserialize;
use std::fmt;

/// Outcome of a finished build, as far as the display model cares.
///
/// Jenkins reports more results than these (`UNSTABLE`, `NOT_BUILT`); they all
/// collapse into `Unknown`, which is also what absence maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Success,
    Failure,
    Aborted,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ResultStatus {
    pub fn from_api(result: Option<&str>) -> Self {
        match result {
            Some("SUCCESS") => Self::Success,
            Some("FAILURE") => Self::Failure,
            Some("ABORTED") => Self::Aborted,
            _ => Self::Unknown,
        }
    }

    pub fn of(result: Option<Self>) -> Self {
        result.unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Aborted => "ABORTED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
