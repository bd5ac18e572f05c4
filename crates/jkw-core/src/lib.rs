#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown
)]

pub mod builds;
pub mod client;
pub mod error;
pub mod jobs;
pub mod model;
pub mod params;
pub mod status;
pub mod time;
pub mod transport;
pub mod workflow;

pub use client::JenkinsClient;
pub use error::{Error, Result};
pub use model::{
    Build, BuildHistory, BuildRef, Job, ParameterDefinition, ParameterEdit, ParameterType,
};
pub use status::ResultStatus;
pub use transport::{Method, Transport};
pub use workflow::{BuildCommand, Confirm, Outcome, ParameterForm, PendingBuild};
