//! Data structures for YouTrack REST responses and request bodies.

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to the project owning an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reporter {
    #[serde(default)]
    pub full_name: String,
}

/// One custom field exactly as the service returns it.
///
/// `value` stays opaque until [`crate::decode_custom_fields`] interprets it
/// according to `type_tag`. It is `None` when the member is absent and
/// `Some(Value::Null)` when the service sends an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCustomField {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "$type", default)]
    pub type_tag: String,
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,
}

/// Issue as returned by the `issues` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    #[serde(default)]
    pub id_readable: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: ProjectRef,
    #[serde(default, rename = "reporter", deserialize_with = "null_as_default")]
    pub created_by: Reporter,
    #[serde(default)]
    pub custom_fields: Vec<RawCustomField>,
}

/// A user or value referenced by a history event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryValue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,
}

/// The field an activity item changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// One recorded change to one field of an issue.
///
/// Text-field activities carry a bare string in `added`/`removed` instead of
/// a list of values; those deserialize as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field: HistoryField,
    #[serde(default, deserialize_with = "lenient_values")]
    pub added: Vec<HistoryValue>,
    #[serde(default, deserialize_with = "lenient_values")]
    pub removed: Vec<HistoryValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: HistoryValue,
}

impl HistoryEvent {
    /// Name of the changed field.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field.name
    }
}

/// Body posted to create an issue.
#[derive(Debug, Clone, Serialize)]
pub struct NewIssue {
    pub summary: String,
    pub description: String,
    pub project: ProjectRef,
}

/// Identifier returned by create endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdResult {
    pub id: String,
}

/// Result of creating an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResult {
    pub id: String,
    #[serde(default)]
    pub number_in_project: u64,
}

/// Body posted to attach a file to an issue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueAttachment {
    pub name: String,
    pub base64_content: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueSlot {
    Value(HistoryValue),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueList {
    List(Vec<ValueSlot>),
    Other(IgnoredAny),
}

fn lenient_values<'de, D>(deserializer: D) -> Result<Vec<HistoryValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ValueList::deserialize(deserializer)? {
        ValueList::List(slots) => slots
            .into_iter()
            .filter_map(|slot| match slot {
                ValueSlot::Value(v) => Some(v),
                ValueSlot::Other(_) => None,
            })
            .collect(),
        ValueList::Other(_) => Vec::new(),
    })
}
