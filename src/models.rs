use serde::{Deserialize, Deserializer, Serialize};

/// A dev.to article as sent to and returned by the articles endpoint.
///
/// When the body carries front matter, dev.to lets it take precedence over
/// the fields set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub type_of: String,
    #[serde(default, skip_serializing_if = "is_unassigned")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body_markdown: String,
}

impl Article {
    pub fn from_body(id: i64, body_markdown: String) -> Self {
        Self {
            id,
            body_markdown,
            ..Self::default()
        }
    }

    pub fn is_new(&self) -> bool {
        is_unassigned(&self.id)
    }
}

/// Sync metadata kept per local file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub checksum: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
}

impl StateRecord {
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Negative ids are the marker older versions wrote after a failed upload.
    pub fn is_skipped(&self) -> bool {
        self.skip || self.id < 0
    }
}

fn is_unassigned(id: &i64) -> bool {
    *id <= 0
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
