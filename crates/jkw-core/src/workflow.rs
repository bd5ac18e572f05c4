//! Build triggering: parameter discovery, the edit form, confirmation and
//! submission.
//!
//! A build command first asks the server for the job's parameter
//! definitions. A job without parameters goes straight to a
//! [`DirectTrigger`]; otherwise a [`ParameterForm`] is opened, seeded with
//! defaults, and edited by whatever UI drives it. Both end in exactly one
//! terminal [`Outcome`], and both consume themselves on the way out so no edit
//! state survives a submit or a cancel.

use crate::client::JenkinsClient;
use crate::error::{Error, Result};
use crate::model::{ParameterDefinition, ParameterEdit, ParameterType};
use crate::params::FormBody;
use std::collections::HashMap;

const TRUE: &str = "true";
const FALSE: &str = "false";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildCommand {
    Build,
    /// Re-run the last completed build. A parameterised job instead gets a
    /// form seeded with its declared defaults, submitted to
    /// `buildWithParameters`.
    Rebuild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A parameterless trigger was sent.
    Triggered,
    /// A parameterised build request was sent.
    Submitted,
    /// The operator declined; nothing was sent.
    Cancelled,
}

/// Yes/no question put to the operator before anything is sent.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug)]
pub enum PendingBuild {
    Direct(DirectTrigger),
    Form(ParameterForm),
}

/// Discovers the job's parameters and picks the path the build takes.
pub async fn begin(client: &JenkinsClient, job: &str, command: BuildCommand) -> Result<PendingBuild> {
    let definitions = client.parameter_definitions(job).await?;
    if definitions.is_empty() {
        return Ok(PendingBuild::Direct(DirectTrigger {
            job: job.to_string(),
            command,
        }));
    }
    Ok(PendingBuild::Form(ParameterForm::new(job, command, definitions)?))
}

#[derive(Debug)]
pub struct DirectTrigger {
    job: String,
    command: BuildCommand,
}

impl DirectTrigger {
    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn command(&self) -> BuildCommand {
        self.command
    }

    pub async fn confirm_and_trigger(
        self,
        client: &JenkinsClient,
        confirm: &mut dyn Confirm,
    ) -> Result<Outcome> {
        let prompt = match self.command {
            BuildCommand::Build => format!("Start build of {}?", self.job),
            BuildCommand::Rebuild => format!("Rebuild {}?", self.job),
        };
        if !confirm.confirm(&prompt) {
            return Ok(Outcome::Cancelled);
        }
        match self.command {
            BuildCommand::Build => client.trigger_build(&self.job, None).await?,
            BuildCommand::Rebuild => client.rebuild_last(&self.job).await?,
        }
        Ok(Outcome::Triggered)
    }
}

/// Open edit session for one job: one [`ParameterEdit`] per definition, in
/// declaration order.
#[derive(Debug, Clone)]
pub struct ParameterForm {
    job: String,
    command: BuildCommand,
    definitions: Vec<ParameterDefinition>,
    edits: Vec<ParameterEdit>,
}

impl ParameterForm {
    pub fn new(
        job: impl Into<String>,
        command: BuildCommand,
        definitions: Vec<ParameterDefinition>,
    ) -> Result<Self> {
        let job = job.into();
        if definitions.is_empty() {
            return Err(Error::usage(format!(
                "{job} declares no parameters; trigger it directly"
            )));
        }
        let edits = definitions
            .iter()
            .map(|d| ParameterEdit {
                name: d.name.clone(),
                value: d.default_or_empty().to_string(),
            })
            .collect();
        Ok(Self {
            job,
            command,
            definitions,
            edits,
        })
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn command(&self) -> BuildCommand {
        self.command
    }

    pub fn definitions(&self) -> &[ParameterDefinition] {
        &self.definitions
    }

    pub fn list_edits(&self) -> &[ParameterEdit] {
        &self.edits
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.edits
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.definitions
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| {
                Error::usage(format!("{} has no parameter named {name}", self.job))
            })
    }

    /// Sets one value after checking it against the declared type. On error
    /// the previous value is kept.
    pub fn set_edit(&mut self, name: &str, value: &str) -> Result<()> {
        let idx = self.position(name)?;
        let def = &self.definitions[idx];
        let accepted = match def.kind {
            ParameterType::Boolean => match value.trim().to_ascii_lowercase().as_str() {
                TRUE => TRUE.to_string(),
                FALSE => FALSE.to_string(),
                _ => {
                    return Err(Error::validation(name, value, "expected true or false"));
                }
            },
            ParameterType::Choice => {
                if !def.choices.iter().any(|c| c == value) {
                    return Err(Error::validation(
                        name,
                        value,
                        format!("not one of: {}", def.choices.join(", ")),
                    ));
                }
                value.to_string()
            }
            ParameterType::String | ParameterType::Text | ParameterType::Other => {
                value.to_string()
            }
        };
        self.edits[idx].value = accepted;
        Ok(())
    }

    /// Flips a boolean parameter between `true` and `false`.
    pub fn toggle(&mut self, name: &str) -> Result<()> {
        let idx = self.position(name)?;
        if self.definitions[idx].kind != ParameterType::Boolean {
            return Err(Error::usage(format!("{name} is not a boolean parameter")));
        }
        let edit = &mut self.edits[idx];
        edit.value = if edit.value == TRUE { FALSE } else { TRUE }.to_string();
        Ok(())
    }

    /// Restores the value the form was seeded with.
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let idx = self.position(name)?;
        self.edits[idx].value = self.definitions[idx].default_or_empty().to_string();
        Ok(())
    }

    /// Applies several edits; stops at the first rejected one.
    pub fn apply<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in pairs {
            self.set_edit(name.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Values as they will be sent: empty edits fall back to the default and
    /// booleans are pinned to `true`/`false`.
    pub fn submission_values(&self) -> Vec<(String, String)> {
        self.definitions
            .iter()
            .zip(&self.edits)
            .map(|(def, edit)| {
                let value = if edit.value.is_empty() {
                    def.default_or_empty()
                } else {
                    edit.value.as_str()
                };
                let value = if def.kind == ParameterType::Boolean {
                    coerce_boolean(&def.name, value)
                } else {
                    value
                };
                (def.name.clone(), value.to_string())
            })
            .collect()
    }

    pub fn payload(&self) -> FormBody {
        FormBody::encode(self.submission_values())
    }

    /// Asks for confirmation, then POSTs the payload. The form is consumed
    /// whatever happens.
    pub async fn confirm_and_submit(
        self,
        client: &JenkinsClient,
        confirm: &mut dyn Confirm,
    ) -> Result<Outcome> {
        let prompt = match self.command {
            BuildCommand::Build => format!(
                "Start build of {} with {} parameter(s)?",
                self.job,
                self.edits.len()
            ),
            BuildCommand::Rebuild => format!(
                "Rebuild {} with {} parameter(s)?",
                self.job,
                self.edits.len()
            ),
        };
        if !confirm.confirm(&prompt) {
            return Ok(self.cancel());
        }
        let body = self.payload();
        client.trigger_build(&self.job, Some(&body)).await?;
        Ok(Outcome::Submitted)
    }

    pub fn cancel(self) -> Outcome {
        tracing::debug!(job = %self.job, "parameter form cancelled");
        Outcome::Cancelled
    }
}

/// Anything but `true` goes out as `false`.
fn coerce_boolean<'a>(name: &str, value: &'a str) -> &'a str {
    if value == TRUE {
        return TRUE;
    }
    if !value.is_empty() && value != FALSE {
        tracing::warn!(parameter = name, value, "unrecognized boolean value sent as false");
    }
    FALSE
}

/// At most one open form per job. Opening a second form for the same job
/// replaces the first.
#[derive(Debug, Default)]
pub struct FormSessions {
    forms: HashMap<String, ParameterForm>,
}

impl FormSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the form this one replaced, if any.
    pub fn open(&mut self, form: ParameterForm) -> Option<ParameterForm> {
        let replaced = self.forms.insert(form.job.clone(), form);
        if let Some(old) = &replaced {
            tracing::debug!(job = %old.job, "replaced open parameter form");
        }
        replaced
    }

    pub fn get(&self, job: &str) -> Option<&ParameterForm> {
        self.forms.get(job)
    }

    pub fn get_mut(&mut self, job: &str) -> Option<&mut ParameterForm> {
        self.forms.get_mut(job)
    }

    /// Removes the form so it can be submitted or cancelled.
    pub fn take(&mut self, job: &str) -> Option<ParameterForm> {
        self.forms.remove(job)
    }

    pub fn is_open(&self, job: &str) -> bool {
        self.forms.contains_key(job)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
