//! Create a local record.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use recsync_client::RecordStore;
use recsync_types::{Hero, Record};
use std::path::Path;

use super::{load_config, open_store};

/// Fields for a new record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// Hero id.
    pub hero_id: String,
    /// Hero display name.
    pub hero_name: String,
    /// Placement.
    pub rank: u32,
    /// Free-text note.
    pub remark: Option<String>,
    /// RFC 3339 timestamp, defaults to now.
    pub date: Option<String>,
}

impl NewRecord {
    fn into_record(self) -> Result<Record> {
        let date = match self.date.as_deref() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("Invalid date '{raw}', expected RFC 3339"))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };

        let record = Record::new(Hero::new(self.hero_id, self.hero_name), self.rank, date);
        Ok(match self.remark {
            Some(remark) => record.with_remark(remark),
            None => record,
        })
    }
}

/// Run the add command. Returns the stored record.
pub async fn run(data_dir: &Path, new: NewRecord) -> Result<Record> {
    let config = load_config(data_dir).await?;
    let store = open_store(data_dir, &config).await?;

    let record = new.into_record()?;
    store
        .insert(record.clone())
        .await
        .context("Failed to store record")?;

    println!("Added record {}", record.id);
    println!("  Hero: {} ({})", record.hero.name, record.hero.id);
    println!("  Rank: {}", record.rank);
    println!("  Date: {}", record.date.to_rfc3339());

    Ok(record)
}
