//! The operations a renderer or CLI calls. Each one is a single
//! request/response exchange through the [`Transport`].

use crate::builds::{self, JobDetail, HISTORY_TREE};
use crate::error::{Error, Result};
use crate::jobs::{self, JobsView, JOBS_TREE};
use crate::model::{BuildHistory, BuildRef, Job, ParameterDefinition};
use crate::params::{self, FormBody, JobProperties, PARAMETERS_TREE};
use crate::transport::{check_response_size, fetch_json, Method, Transport};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct JenkinsClient {
    transport: Arc<dyn Transport>,
    base: Url,
    view: Option<String>,
}

impl JenkinsClient {
    /// `base_url` is the server root; a missing trailing `/` is added.
    pub fn new(
        base_url: &str,
        view: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized)
            .map_err(|e| Error::usage(format!("invalid Jenkins URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::usage(format!(
                "invalid Jenkins URL '{base_url}': not a hierarchical URL"
            )));
        }
        Ok(Self {
            transport,
            base,
            view: view.filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    /// `base` with `segments` appended, each percent-encoded as a path segment.
    fn endpoint(&self, segments: &[&str], tree: Option<&str>) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if let Some(tree) = tree {
            url.set_query(Some(&format!("tree={tree}")));
        }
        url.into()
    }

    pub fn jobs_url(&self) -> String {
        match &self.view {
            Some(view) => self.endpoint(&["view", view, "api", "json"], Some(JOBS_TREE)),
            None => self.endpoint(&["api", "json"], Some(JOBS_TREE)),
        }
    }

    pub fn history_url(&self, job: &str) -> String {
        self.endpoint(&["job", job, "api", "json"], Some(HISTORY_TREE))
    }

    pub fn parameters_url(&self, job: &str) -> String {
        self.endpoint(&["job", job, "api", "json"], Some(PARAMETERS_TREE))
    }

    pub fn build_trigger_url(&self, job: &str) -> String {
        self.endpoint(&["job", job, "build"], None)
    }

    pub fn parameterized_trigger_url(&self, job: &str) -> String {
        self.endpoint(&["job", job, "buildWithParameters"], None)
    }

    pub fn rebuild_url(&self, job: &str) -> String {
        self.endpoint(&["job", job, "lastCompletedBuild", "rebuild", ""], None)
    }

    pub fn console_url(&self, job: &str, build: BuildRef) -> String {
        self.endpoint(&["job", job, &build.path_segment(), "consoleText"], None)
    }

    /// Web page of a job.
    pub fn job_url(&self, job: &str) -> String {
        self.endpoint(&["job", job, ""], None)
    }

    /// Web page of a build.
    pub fn build_url(&self, job: &str, build: BuildRef) -> String {
        self.endpoint(&["job", job, &build.path_segment(), ""], None)
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.list_jobs_at(Utc::now()).await
    }

    /// Like [`list_jobs`](Self::list_jobs), with ages measured from `now`.
    pub async fn list_jobs_at(&self, now: DateTime<Utc>) -> Result<Vec<Job>> {
        let url = self.jobs_url();
        let view: JobsView = fetch_json(&*self.transport, &url).await?;
        let jobs = jobs::from_view(view, now);
        tracing::debug!(count = jobs.len(), view = ?self.view, "listed jobs");
        Ok(jobs)
    }

    pub async fn build_history(&self, job: &str) -> Result<BuildHistory> {
        self.build_history_at(job, Utc::now()).await
    }

    pub async fn build_history_at(&self, job: &str, now: DateTime<Utc>) -> Result<BuildHistory> {
        let url = self.history_url(job);
        let detail: JobDetail = fetch_json(&*self.transport, &url).await?;
        Ok(builds::from_detail(job, detail, now))
    }

    pub async fn parameter_definitions(&self, job: &str) -> Result<Vec<ParameterDefinition>> {
        let url = self.parameters_url(job);
        let properties: JobProperties = fetch_json(&*self.transport, &url).await?;
        let definitions = params::from_properties(properties);
        tracing::debug!(job, count = definitions.len(), "fetched parameter definitions");
        Ok(definitions)
    }

    /// Without `params` this POSTs `build`; with them, `buildWithParameters`.
    pub async fn trigger_build(&self, job: &str, params: Option<&FormBody>) -> Result<()> {
        let url = match params {
            Some(_) => self.parameterized_trigger_url(job),
            None => self.build_trigger_url(job),
        };
        self.transport.send(Method::Post, &url, params).await?;
        tracing::info!(job, parameterized = params.is_some(), "build triggered");
        Ok(())
    }

    /// Re-runs the last completed build with its previous parameters.
    pub async fn rebuild_last(&self, job: &str) -> Result<()> {
        let url = self.rebuild_url(job);
        self.transport.send(Method::Post, &url, None).await?;
        tracing::info!(job, "rebuild triggered");
        Ok(())
    }

    pub async fn console_output(&self, job: &str, build: BuildRef) -> Result<String> {
        let url = self.console_url(job, build);
        let text = self.transport.get(&url).await?;
        check_response_size(&url, text.len())?;
        Ok(text)
    }
}

impl std::fmt::Debug for JenkinsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JenkinsClient")
            .field("base", &self.base.as_str())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
