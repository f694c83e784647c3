//! Story records as stored in the vector collection, and the views built from them

use mongodb::bson::Bson;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored user story. Owned by the external store; never written from here.
///
/// Display fields are kept as raw BSON and copied through untouched, whatever
/// type the store holds. The embedding is never read back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
  /// Store-assigned identifier
  #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
  pub id: Option<Bson>,

  #[serde(default)]
  pub story_id: Option<Bson>,

  #[serde(default)]
  pub summary: Option<Bson>,

  #[serde(default)]
  pub project_name: Option<Bson>,

  #[serde(default)]
  pub priority: Option<Bson>,

  #[serde(default)]
  pub risk: Option<Bson>,
}

impl StoryRecord {
  /// The story's own id, or the store-assigned one when it has none
  pub fn display_id(&self) -> String {
    self
      .story_id
      .as_ref()
      .and_then(identifier_text)
      .or_else(|| self.id.as_ref().and_then(identifier_text))
      .unwrap_or_default()
  }
}

fn identifier_text(value: &Bson) -> Option<String> {
  match value {
    Bson::Null | Bson::Undefined => None,
    Bson::String(s) if s.is_empty() => None,
    Bson::String(s) => Some(s.clone()),
    Bson::ObjectId(oid) => Some(oid.to_hex()),
    Bson::Int32(n) => Some(n.to_string()),
    Bson::Int64(n) => Some(n.to_string()),
    other => Some(other.to_string()),
  }
}

fn to_json(value: &Option<Bson>) -> Value {
  value.clone().map(Bson::into_relaxed_extjson).unwrap_or(Value::Null)
}

/// The four fields of a related story shown to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedStory {
  pub story_id: String,
  pub summary: Value,
  pub project_name: Value,
  pub priority: Value,
}

impl From<&StoryRecord> for ProjectedStory {
  fn from(record: &StoryRecord) -> Self {
    Self {
      story_id: record.display_id(),
      summary: to_json(&record.summary),
      project_name: to_json(&record.project_name),
      priority: to_json(&record.priority),
    }
  }
}

/// A related story as it is handed to the language model, risk included when known
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryContext {
  pub story_id: String,
  pub summary: Value,
  pub project_name: Value,
  pub priority: Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub risk: Option<Value>,
}

impl From<&StoryRecord> for StoryContext {
  fn from(record: &StoryRecord) -> Self {
    Self {
      story_id: record.display_id(),
      summary: to_json(&record.summary),
      project_name: to_json(&record.project_name),
      priority: to_json(&record.priority),
      risk: record.risk.clone().map(Bson::into_relaxed_extjson),
    }
  }
}

/// Reduce search hits to the fields returned to the client, preserving order
pub fn project(records: &[StoryRecord]) -> Vec<ProjectedStory> {
  records.iter().map(ProjectedStory::from).collect()
}
