//! Jobs view (`api/json`) to [`Job`] records.

use crate::model::Job;
use crate::status::ResultStatus;
use crate::time::age_since;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;

/// `tree=` selector for the jobs view; fetches only what [`Job`] needs.
pub const JOBS_TREE: &str = "jobs[name,lastCompletedBuild[result],lastBuild[building,executor[progress]],lastSuccessfulBuild[timestamp],lastFailedBuild[timestamp]]";

#[derive(Debug, Deserialize)]
pub struct JobsView {
    jobs: Vec<RawJob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJob {
    name: String,
    last_completed_build: Option<RawCompletedBuild>,
    last_build: Option<RawLastBuild>,
    last_successful_build: Option<RawStampedBuild>,
    last_failed_build: Option<RawStampedBuild>,
}

#[derive(Debug, Deserialize)]
struct RawCompletedBuild {
    result: Option<ResultStatus>,
}

#[derive(Debug, Deserialize)]
struct RawLastBuild {
    building: Option<bool>,
    executor: Option<RawExecutor>,
}

#[derive(Debug, Deserialize)]
struct RawExecutor {
    progress: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawStampedBuild {
    timestamp: Option<i64>,
}

impl RawLastBuild {
    /// Jenkins reports -1 when it has no estimate (e.g. a job's first build);
    /// a build known to be running then shows 0. A finished build has no
    /// progress whatever its executor says.
    fn progress(&self) -> Option<u8> {
        if self.building == Some(false) {
            return None;
        }
        let progress = self.executor.as_ref()?.progress?;
        if !progress.is_finite() || progress < 0.0 {
            return (self.building == Some(true)).then_some(0);
        }
        Some(progress.round().min(100.0) as u8)
    }
}

fn age_of(build: Option<&RawStampedBuild>, now: DateTime<Utc>) -> Option<String> {
    build
        .and_then(|b| b.timestamp)
        .map(|ts| age_since(ts, now))
}

impl RawJob {
    fn into_job(self, now: DateTime<Utc>) -> Job {
        Job {
            last_result: self.last_completed_build.and_then(|b| b.result),
            progress: self.last_build.as_ref().and_then(RawLastBuild::progress),
            last_success_age: age_of(self.last_successful_build.as_ref(), now),
            last_failure_age: age_of(self.last_failed_build.as_ref(), now),
            name: self.name,
        }
    }
}

/// Maps a decoded jobs view, keeping server order and the first entry of any
/// repeated name.
pub fn from_view(view: JobsView, now: DateTime<Utc>) -> Vec<Job> {
    let mut seen = HashSet::new();
    view.jobs
        .into_iter()
        .filter(|job| seen.insert(job.name.clone()))
        .map(|job| job.into_job(now))
        .collect()
}

pub fn parse_jobs(json: &str, now: DateTime<Utc>) -> serde_json::Result<Vec<Job>> {
    let view: JobsView = serde_json::from_str(json)?;
    Ok(from_view(view, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ms_ago(secs: i64) -> i64 {
        now().timestamp_millis() - secs * 1000
    }

    #[test]
    fn full_job_maps_every_field() {
        let json = format!(
            r#"{{"jobs":[{{
                "name": "backend",
                "lastCompletedBuild": {{"result": "FAILURE"}},
                "lastBuild": {{"building": true, "executor": {{"progress": 42}}}},
                "lastSuccessfulBuild": {{"timestamp": {}}},
                "lastFailedBuild": {{"timestamp": {}}}
            }}]}}"#,
            ms_ago(2 * 86_400 + 3 * 3600 + 5 * 60),
            ms_ago(90)
        );
        let jobs = parse_jobs(&json, now()).unwrap();
        assert_eq!(
            jobs,
            vec![Job {
                name: "backend".to_string(),
                last_result: Some(ResultStatus::Failure),
                progress: Some(42),
                last_success_age: Some("2d:3h:5m".to_string()),
                last_failure_age: Some("1m:30s".to_string()),
            }]
        );
    }

    #[test]
    fn bare_job_has_everything_absent() {
        let jobs = parse_jobs(r#"{"jobs":[{"name":"empty"}]}"#, now()).unwrap();
        assert_eq!(jobs[0].name, "empty");
        assert_eq!(jobs[0].last_result, None);
        assert_eq!(jobs[0].progress, None);
        assert_eq!(jobs[0].last_success_age, None);
        assert_eq!(jobs[0].last_failure_age, None);
        assert_eq!(jobs[0].status(), ResultStatus::Unknown);
    }

    #[test]
    fn null_fields_are_absent() {
        let json = r#"{"jobs":[{
            "name": "nulls",
            "lastCompletedBuild": null,
            "lastBuild": {"building": false, "executor": null},
            "lastSuccessfulBuild": null,
            "lastFailedBuild": {"timestamp": null}
        }]}"#;
        let job = &parse_jobs(json, now()).unwrap()[0];
        assert_eq!(job.last_result, None);
        assert_eq!(job.progress, None);
        assert_eq!(job.last_success_age, None);
        assert_eq!(job.last_failure_age, None);
    }

    #[test]
    fn missing_last_build_means_no_progress_not_zero() {
        let json = r#"{"jobs":[{"name":"a","lastCompletedBuild":{"result":"SUCCESS"}}]}"#;
        let job = &parse_jobs(json, now()).unwrap()[0];
        assert_eq!(job.progress, None);
        assert!(!job.is_building());
    }

    #[test]
    fn finished_last_build_clears_progress() {
        let json = r#"{"jobs":[{"name":"a","lastBuild":{"building":false,"executor":{"progress":100}}}]}"#;
        assert_eq!(parse_jobs(json, now()).unwrap()[0].progress, None);
    }

    #[test]
    fn unknown_progress_is_absent_and_overrun_clamps() {
        let json = r#"{"jobs":[
            {"name":"a","lastBuild":{"executor":{"progress":-1}}},
            {"name":"b","lastBuild":{"executor":{"progress":130}}},
            {"name":"c","lastBuild":{"building":true,"executor":{"progress":0}}}
        ]}"#;
        let jobs = parse_jobs(json, now()).unwrap();
        assert_eq!(jobs[0].progress, None);
        assert_eq!(jobs[1].progress, Some(100));
        assert_eq!(jobs[2].progress, Some(0));
    }

    #[test]
    fn running_build_without_estimate_shows_zero() {
        let json = r#"{"jobs":[
            {"name":"first","lastBuild":{"building":true,"executor":{"progress":-1}}},
            {"name":"idle","lastBuild":{"building":false,"executor":{"progress":-1}}}
        ]}"#;
        let jobs = parse_jobs(json, now()).unwrap();
        assert_eq!(jobs[0].progress, Some(0));
        assert!(jobs[0].is_building());
        assert_eq!(jobs[1].progress, None);
    }

    #[test]
    fn out_of_range_timestamps_do_not_panic() {
        let json = r#"{"jobs":[{"name":"a",
            "lastSuccessfulBuild":{"timestamp":-9223372036854775000},
            "lastFailedBuild":{"timestamp":9223372036854775000}}]}"#;
        let job = &parse_jobs(json, now()).unwrap()[0];
        assert!(job.last_success_age.as_deref().is_some_and(|age| !age.is_empty()));
        assert_eq!(job.last_failure_age.as_deref(), Some(""));
    }

    #[test]
    fn unstable_result_is_present_but_unknown() {
        let json = r#"{"jobs":[{"name":"a","lastCompletedBuild":{"result":"UNSTABLE"}}]}"#;
        let job = &parse_jobs(json, now()).unwrap()[0];
        assert_eq!(job.last_result, Some(ResultStatus::Unknown));
    }

    #[test]
    fn timestamp_now_renders_empty_age() {
        let json = format!(
            r#"{{"jobs":[{{"name":"a","lastSuccessfulBuild":{{"timestamp":{}}}}}]}}"#,
            now().timestamp_millis()
        );
        let job = &parse_jobs(&json, now()).unwrap()[0];
        assert_eq!(job.last_success_age.as_deref(), Some(""));
    }

    #[test]
    fn preserves_server_order_and_dedupes() {
        let json = r#"{"jobs":[{"name":"zeta"},{"name":"alpha"},{"name":"zeta"},{"name":"mid"}]}"#;
        let names: Vec<String> = parse_jobs(json, now())
            .unwrap()
            .into_iter()
            .map(|j| j.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn empty_jobs_list() {
        assert!(parse_jobs(r#"{"jobs":[]}"#, now()).unwrap().is_empty());
    }

    #[test]
    fn missing_jobs_array_is_an_error() {
        assert!(parse_jobs(r#"{"views":[]}"#, now()).is_err());
    }

    #[test]
    fn job_without_name_is_an_error() {
        assert!(parse_jobs(r#"{"jobs":[{"lastBuild":null}]}"#, now()).is_err());
    }

    #[test]
    fn ignores_extra_fields() {
        let json = r#"{"_class":"hudson.model.Hudson","jobs":[{"_class":"hudson.model.FreeStyleProject","name":"a","color":"blue"}]}"#;
        assert_eq!(parse_jobs(json, now()).unwrap().len(), 1);
    }
}
