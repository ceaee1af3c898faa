//! Care journal entries attached to a plant.

use rusqlite::params;
use serde::Serialize;
use tracing::debug;

use super::{logged, Database, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantLog {
    pub id: i64,
    pub plant_id: i64,
    pub log_date: Option<String>,
    pub notes: Option<String>,
}

impl Database {
    /// Append a journal entry. The plant must exist.
    pub fn add_plant_log(&self, plant_id: i64, log_date: &str, notes: &str) -> Result<i64> {
        logged("adding plant log", || {
            self.conn.execute(
                "INSERT INTO plant_logs (plant_id, log_date, notes) VALUES (?, ?, ?)",
                params![plant_id, log_date, notes],
            )?;
            Ok(self.conn.last_insert_rowid())
        })
    }

    /// Entries for one plant, most recently added first.
    pub fn list_plant_logs(&self, plant_id: i64) -> Result<Vec<PlantLog>> {
        logged("fetching plant logs", || {
            let mut stmt = self.conn.prepare(
                r#"
                SELECT id, plant_id, log_date, notes
                FROM plant_logs
                WHERE plant_id = ?
                ORDER BY id DESC
                "#,
            )?;
            let logs = stmt
                .query_map([plant_id], |row| {
                    Ok(PlantLog {
                        id: row.get(0)?,
                        plant_id: row.get(1)?,
                        log_date: row.get(2)?,
                        notes: row.get(3)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            debug!("Fetched {} logs for plant {}", logs.len(), plant_id);
            Ok(logs)
        })
    }
}
