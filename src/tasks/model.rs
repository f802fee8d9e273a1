//! Task record and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::store::Record;

/// A request payload that does not describe a valid task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidPayload(pub String);

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a fresh task with a random UUID v4 id.
    pub fn new(title: impl Into<String>, description: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            created_at: now,
            updated_at: None,
            completed_at: None,
        }
    }
}

/// Fields a client may change on an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskPatch {
    /// Validate a replace payload: both fields must be present.
    pub fn from_body(body: Option<Value>) -> Result<Self, InvalidPayload> {
        let patch: TaskPatch = parse_payload(body)?;
        if patch.title.is_none() || patch.description.is_none() {
            return Err(InvalidPayload("title and description are required".to_string()));
        }
        Ok(patch)
    }
}

impl Record for Task {
    type Patch = TaskPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "title" => Some(&self.title),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn merge(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.completed_at = Some(now);
    }
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

impl NewTask {
    /// Validate a create payload: both fields must be non-empty strings.
    pub fn from_body(body: Option<Value>) -> Result<Self, InvalidPayload> {
        let TaskPatch { title, description } = parse_payload(body)?;
        match (title, description) {
            (Some(title), Some(description)) if !title.is_empty() && !description.is_empty() => {
                Ok(Self { title, description })
            }
            _ => Err(InvalidPayload("title and description must be non-empty".to_string())),
        }
    }

    pub fn into_task(self, now: DateTime<Utc>) -> Task {
        Task::new(self.title, self.description, now)
    }
}

fn parse_payload(body: Option<Value>) -> Result<TaskPatch, InvalidPayload> {
    let Some(body) = body else {
        return Err(InvalidPayload("request body is required".to_string()));
    };
    serde_json::from_value(body).map_err(|e| InvalidPayload(format!("invalid payload: {e}")))
}
