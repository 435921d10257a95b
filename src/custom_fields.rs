//! Decoding of YouTrack custom fields into flat name/value pairs.
//!
//! The service tags every custom field with a `$type` discriminator and
//! shapes its `value` accordingly. [`decode_custom_fields`] turns the
//! recognised variants into [`FormattedField`]s. Unknown tags are reported to
//! a [`DiagnosticSink`] and dropped; values that do not match the shape for
//! their tag are dropped without a report. Decoding never fails as a whole.

use log::info;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{BoxedStr, FieldNotFound};
use crate::models::{Issue, RawCustomField};

/// Receives notices about custom fields the decoder cannot interpret.
pub trait DiagnosticSink {
    /// Called once for each field whose type tag is not supported.
    fn unsupported_variant(&self, field_name: &str, type_tag: &str);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str, &str),
{
    fn unsupported_variant(&self, field_name: &str, type_tag: &str) {
        self(field_name, type_tag);
    }
}

/// Reports unsupported variants through the `log` facade at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn unsupported_variant(&self, field_name: &str, type_tag: &str) {
        info!("custom field [{field_name}] of type {type_tag} is not supported yet");
    }
}

/// Discards all notices.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn unsupported_variant(&self, _field_name: &str, _type_tag: &str) {}
}

/// Custom field variants the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    SingleEnum,
    SingleVersion,
    StateMachine,
    Simple,
    Date,
    Period,
}

#[derive(Deserialize)]
struct TextValue {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct NamedValue {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct PeriodValue {
    #[serde(default)]
    presentation: Option<String>,
}

impl FieldKind {
    /// Map a `$type` tag onto a supported variant.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "TextIssueCustomField" => Some(Self::Text),
            "SingleEnumIssueCustomField" => Some(Self::SingleEnum),
            "SingleVersionIssueCustomField" => Some(Self::SingleVersion),
            "StateMachineIssueCustomField" => Some(Self::StateMachine),
            "SimpleIssueCustomField" => Some(Self::Simple),
            "DateIssueCustomField" => Some(Self::Date),
            "PeriodIssueCustomField" => Some(Self::Period),
            _ => None,
        }
    }

    /// Extract the display string from a value of this variant.
    ///
    /// Returns `None` when `value` does not have the expected shape. An unset
    /// field (`null`, or a `null` member) yields an empty string.
    #[must_use]
    pub fn extract(self, value: &Value) -> Option<String> {
        if value.is_null() {
            return Some(String::new());
        }
        match self {
            Self::Simple | Self::Date => value.as_str().map(str::to_owned),
            // Object-shaped variants; serde would otherwise accept arrays too.
            _ if !value.is_object() => None,
            Self::Text => TextValue::deserialize(value).ok().map(|v| v.text.unwrap_or_default()),
            Self::SingleEnum | Self::SingleVersion | Self::StateMachine => NamedValue::deserialize(value)
                .ok()
                .map(|v| v.name.unwrap_or_default()),
            Self::Period => PeriodValue::deserialize(value)
                .ok()
                .map(|v| v.presentation.unwrap_or_default()),
        }
    }
}

/// A decoded custom field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedField {
    pub name: String,
    pub value: String,
}

/// Decoded custom fields in the order the service returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedFields(Vec<FormattedField>);

impl FormattedFields {
    /// Value of the first field named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldNotFound`] when no field has that name.
    pub fn find(&self, name: &str) -> Result<&str, FieldNotFound> {
        self.iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
            .ok_or_else(|| FieldNotFound { name: name.boxed() })
    }

    /// Value of the first field named `name`, or `""` when it is missing.
    #[must_use]
    pub fn find_or_empty(&self, name: &str) -> &str {
        self.find(name).unwrap_or_default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormattedField> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<FormattedField>> for FormattedFields {
    fn from(fields: Vec<FormattedField>) -> Self {
        Self(fields)
    }
}

impl FromIterator<FormattedField> for FormattedFields {
    fn from_iter<I: IntoIterator<Item = FormattedField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FormattedFields {
    type Item = &'a FormattedField;
    type IntoIter = std::slice::Iter<'a, FormattedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn decode_field(raw: &RawCustomField, sink: &impl DiagnosticSink) -> Option<FormattedField> {
    let Some(kind) = FieldKind::from_tag(&raw.type_tag) else {
        sink.unsupported_variant(&raw.name, &raw.type_tag);
        return None;
    };
    let value = kind.extract(raw.value.as_ref()?)?;
    Some(FormattedField {
        name: raw.name.clone(),
        value,
    })
}

/// Decode raw custom fields into name/value pairs.
///
/// Fields with an unknown type tag are reported to `sink` and skipped;
/// fields without a `value` member, or whose value does not fit their tag,
/// are skipped silently.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use ytk::{NullSink, RawCustomField, decode_custom_fields};
///
/// let raw = vec![RawCustomField {
///     name: "Priority".into(),
///     type_tag: "SingleEnumIssueCustomField".into(),
///     value: Some(json!({"name": "High"})),
/// }];
/// let fields = decode_custom_fields(&raw, &NullSink);
/// assert_eq!(fields.find("Priority"), Ok("High"));
/// ```
pub fn decode_custom_fields(raw: &[RawCustomField], sink: &impl DiagnosticSink) -> FormattedFields {
    raw.iter().filter_map(|f| decode_field(f, sink)).collect()
}

impl Issue {
    /// Decode this issue's custom fields, logging unsupported variants.
    #[must_use]
    pub fn formatted_fields(&self) -> FormattedFields {
        decode_custom_fields(&self.custom_fields, &LogSink)
    }
}
