//! Polling loop for `jkw watch`.
//!
//! Each tick refreshes the jobs view and compares it with the previous
//! snapshot. On consecutive failures the delay grows as `base × 2^failures`
//! up to `MAX_BACKOFF_SECS`, and resets after the next successful poll.

use crate::notify;
use crate::render;
use color_eyre::eyre::Result;
use jkw_core::{JenkinsClient, Job, ResultStatus};
use std::collections::HashMap;
use std::time::Duration;

const MAX_BACKOFF_SECS: u64 = 300;

/// `min(base_interval * 2^failures, MAX_BACKOFF_SECS)`.
pub fn backoff_delay(base_interval: u64, failures: u32) -> u64 {
    let multiplier = 1u64.checked_shl(failures).unwrap_or(u64::MAX);
    base_interval
        .saturating_mul(multiplier)
        .clamp(1, MAX_BACKOFF_SECS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Started { job: String },
    Finished { job: String, result: ResultStatus },
}

impl Change {
    pub fn job(&self) -> &str {
        match self {
            Self::Started { job } | Self::Finished { job, .. } => job,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Started { job } => format!("{job} started"),
            Self::Finished { job, result } => match result {
                ResultStatus::Success => format!("{job} succeeded"),
                ResultStatus::Failure => format!("{job} failed"),
                ResultStatus::Aborted => format!("{job} was aborted"),
                ResultStatus::Unknown => format!("{job} finished"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JobState {
    result: Option<ResultStatus>,
    building: bool,
}

impl From<&Job> for JobState {
    fn from(job: &Job) -> Self {
        Self {
            result: job.last_result,
            building: job.is_building(),
        }
    }
}

/// Last seen state per job name.
#[derive(Debug, Default)]
pub struct Snapshot {
    jobs: HashMap<String, JobState>,
}

impl Snapshot {
    /// Compares `jobs` with the previous poll, then replaces the snapshot.
    /// Jobs seen for the first time produce no change.
    pub fn detect_changes(&mut self, jobs: &[Job]) -> Vec<Change> {
        let mut changes = Vec::new();
        for job in jobs {
            let new = JobState::from(job);
            let Some(old) = self.jobs.get(&job.name) else {
                continue;
            };
            if new.building && !old.building {
                changes.push(Change::Started {
                    job: job.name.clone(),
                });
            }
            if (old.building && !new.building) || old.result != new.result {
                changes.push(Change::Finished {
                    job: job.name.clone(),
                    result: job.status(),
                });
            }
        }
        self.jobs = jobs
            .iter()
            .map(|job| (job.name.clone(), JobState::from(job)))
            .collect();
        changes
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Runs until ctrl-c.
pub async fn run(
    client: &JenkinsClient,
    interval: u64,
    desktop_notify: bool,
    name_width: usize,
) -> Result<()> {
    let mut snapshot = Snapshot::default();
    let mut failures: u32 = 0;
    let mut first = true;

    loop {
        match client.list_jobs().await {
            Ok(jobs) => {
                failures = 0;
                if first {
                    println!("{}", render::jobs_table(&jobs, name_width));
                    first = false;
                }
                for change in snapshot.detect_changes(&jobs) {
                    println!(
                        "{} {}",
                        chrono::Local::now().format("%H:%M:%S"),
                        change.message()
                    );
                    tracing::info!(job = change.job(), "{}", change.message());
                    if desktop_notify {
                        notify::send_desktop(&change);
                    }
                }
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                let next = backoff_delay(interval, failures);
                tracing::warn!(failures, "poll failed: {e}");
                eprintln!("Poll failed: {e}. Retrying in {next}s");
            }
        }

        let delay = if failures > 0 {
            backoff_delay(interval, failures)
        } else {
            interval
        };
        tokio::select! {
            () = tokio::time::sleep(Duration::from_secs(delay)) => {},
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("watch interrupted");
                return Ok(());
            }
        }
    }
}
