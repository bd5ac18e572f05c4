//! Job detail (`job/<name>/api/json`) to [`BuildHistory`].

use crate::model::{Build, BuildHistory, NO_AUTHOR};
use crate::status::ResultStatus;
use crate::time::age_since;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `tree=` selector for the history window. `{0,25}` asks Jenkins for the
/// same slice the builder keeps.
pub const HISTORY_TREE: &str =
    "builds[number,timestamp,result,url,building,culprits[fullName]]{0,25}";

#[derive(Debug, Deserialize)]
pub struct JobDetail {
    builds: Vec<RawBuild>,
}

#[derive(Debug, Deserialize)]
struct RawBuild {
    number: u64,
    timestamp: Option<i64>,
    result: Option<ResultStatus>,
    url: Option<String>,
    building: Option<bool>,
    culprits: Option<Vec<RawCulprit>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCulprit {
    full_name: Option<String>,
}

impl RawBuild {
    fn into_build(self, now: DateTime<Utc>) -> Build {
        let author = self
            .culprits
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.full_name)
            .unwrap_or_else(|| NO_AUTHOR.to_string());
        Build {
            number: self.number,
            author,
            url: self.url.unwrap_or_default(),
            age: self
                .timestamp
                .map(|ts| age_since(ts, now))
                .unwrap_or_default(),
            building: self.building.unwrap_or(false),
            result: self.result,
        }
    }
}

/// Keeps the server's order (newest first); [`BuildHistory::new`] trims to
/// the window.
pub fn from_detail(job_name: &str, detail: JobDetail, now: DateTime<Utc>) -> BuildHistory {
    let builds = detail
        .builds
        .into_iter()
        .map(|b| b.into_build(now))
        .collect();
    BuildHistory::new(job_name, builds)
}

pub fn parse_history(
    job_name: &str,
    json: &str,
    now: DateTime<Utc>,
) -> serde_json::Result<BuildHistory> {
    let detail: JobDetail = serde_json::from_str(json)?;
    Ok(from_detail(job_name, detail, now))
}
