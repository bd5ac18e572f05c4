//! Parameter definitions of a job and the form-encoded submission body.

use crate::model::{ParameterDefinition, ParameterType};
use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

/// `tree=` selector for a job's declared parameters.
pub const PARAMETERS_TREE: &str =
    "property[parameterDefinitions[name,type,description,defaultParameterValue[value],choices]]";

#[derive(Debug, Deserialize)]
pub struct JobProperties {
    property: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
    parameter_definitions: Option<Vec<RawDefinition>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDefinition {
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    default_parameter_value: Option<RawDefault>,
    choices: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawDefault {
    value: Option<Value>,
}

/// Jenkins sends boolean defaults as JSON booleans and numeric ones as numbers.
fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl RawDefinition {
    fn into_definition(self) -> ParameterDefinition {
        let kind = ParameterType::from_api(self.kind.as_deref().unwrap_or_default());
        let choices = if kind == ParameterType::Choice {
            self.choices.unwrap_or_default()
        } else {
            Vec::new()
        };
        ParameterDefinition {
            name: self.name,
            kind,
            description: self.description.unwrap_or_default(),
            default_value: self
                .default_parameter_value
                .and_then(|d| d.value)
                .and_then(value_to_string),
            choices,
        }
    }
}

/// Flattens every `parameterDefinitions` list in declaration order. Jobs
/// without parameters yield an empty list.
pub fn from_properties(properties: JobProperties) -> Vec<ParameterDefinition> {
    properties
        .property
        .into_iter()
        .filter_map(|p| p.parameter_definitions)
        .flatten()
        .map(RawDefinition::into_definition)
        .collect()
}

pub fn parse_definitions(json: &str) -> serde_json::Result<Vec<ParameterDefinition>> {
    let properties: JobProperties = serde_json::from_str(json)?;
    Ok(from_properties(properties))
}

/// An `application/x-www-form-urlencoded` request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBody(String);

impl FormBody {
    pub fn encode<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in pairs {
            serializer.append_pair(name.as_ref(), value.as_ref());
        }
        Self(serializer.finish())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> Vec<(String, String)> {
        decode_payload(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn decode_payload(payload: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(payload.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
