//! The record: the unit of synchronization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{RecordId, SyncError};

/// The entity a record refers to.
///
/// Only `id` and `name` are uploaded; anything else the local store keeps
/// about the hero is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// Hero identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Additional fields not interpreted by the sync layer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hero {
    /// Create a hero reference with no extra fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// A locally persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier (`_id` on the wire).
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// The hero this record is about.
    pub hero: Hero,
    /// Final ranking.
    pub rank: u32,
    /// When the record happened. Used for windowing.
    pub date: DateTime<Utc>,
    /// Free-text annotation.
    #[serde(default)]
    pub remark: String,
    /// Structured lineup, opaque to the sync layer.
    #[serde(default)]
    pub lineup: Vec<Value>,
    /// Whether the remote side has durably accepted this record.
    #[serde(default)]
    pub synced: bool,
}

impl Record {
    /// Create a new, not yet synced record with a locally assigned id.
    pub fn new(hero: Hero, rank: u32, date: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            hero,
            rank,
            date,
            remark: String::new(),
            lineup: Vec::new(),
            synced: false,
        }
    }

    /// Set the remark.
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }

    /// Set the lineup.
    pub fn with_lineup(mut self, lineup: Vec<Value>) -> Self {
        self.lineup = lineup;
        self
    }

    /// Mark as acknowledged by the remote side.
    ///
    /// Used when a canonical copy is pulled down from the server.
    pub fn into_synced(mut self) -> Self {
        self.synced = true;
        self
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(SyncError::Serialization)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        serde_json::from_str(json).map_err(SyncError::Deserialization)
    }
}

/// Hero reference as accepted by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRef {
    /// Hero identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// The minimal record shape the remote accepts on upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Record identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Denormalized hero reference.
    pub hero: HeroRef,
    /// Final ranking.
    pub rank: u32,
    /// When the record happened.
    pub date: DateTime<Utc>,
    /// Free-text annotation.
    pub remark: String,
    /// Structured lineup.
    pub lineup: Vec<Value>,
    /// Local synced flag at projection time.
    pub synced: bool,
}

impl From<&Record> for UploadRecord {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            hero: HeroRef {
                id: record.hero.id.clone(),
                name: record.hero.name.clone(),
            },
            rank: record.rank,
            date: record.date,
            remark: record.remark.clone(),
            lineup: record.lineup.clone(),
            synced: record.synced,
        }
    }
}
