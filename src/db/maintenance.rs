//! Destructive maintenance: full reset and duplicate plant cleanup.

use rusqlite::Connection;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{logged, open_connection, Database, Result, SeedReport};

impl Database {
    /// Drop everything and start over with a freshly seeded database.
    ///
    /// For a file-backed database the file and its `-wal`/`-shm` companions
    /// are deleted. Irreversible.
    pub fn reset(&mut self) -> Result<SeedReport> {
        self.reset_with(true)
    }

    pub fn reset_with(&mut self, seed: bool) -> Result<SeedReport> {
        logged("resetting database", || {
            let old = std::mem::replace(&mut self.conn, Connection::open_in_memory()?);
            if let Err((_, e)) = old.close() {
                warn!("Error closing database before reset: {}", e);
            }

            match self.path.clone() {
                Some(path) => match recreate_file(&path) {
                    Ok(conn) => {
                        self.conn = conn;
                        info!("Database file {:?} deleted and recreated", path);
                    }
                    Err(e) => {
                        // Stay attached to whatever is left on disk.
                        self.conn = open_connection(&path)?;
                        return Err(e);
                    }
                },
                None => {
                    self.conn.pragma_update(None, "foreign_keys", "ON")?;
                    info!("In-memory database replaced");
                }
            }
            Ok(())
        })?;
        self.setup_with(seed)
    }

    /// Delete every plant except the lowest-id row of each
    /// (nickname, species, location) group. Returns the number of rows removed.
    pub fn cleanup_duplicate_plants(&self) -> Result<usize> {
        logged("cleaning up duplicate plants", || {
            let removed = self.conn.execute(
                r#"
                DELETE FROM plants
                WHERE id NOT IN (
                    SELECT MIN(id)
                    FROM plants
                    GROUP BY nickname, species_id, location_id
                )
                "#,
                [],
            )?;
            info!("Removed {} duplicate plants", removed);
            Ok(removed)
        })
    }
}

fn recreate_file(path: &Path) -> Result<Connection> {
    for file in database_files(path) {
        remove_if_exists(&file)?;
    }
    open_connection(path)
}

// Side files first, so a failure leaves the main file in place.
fn database_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::with_capacity(3);
    for suffix in ["-wal", "-shm"] {
        let mut name = path.as_os_str().to_os_string();
        name.push(suffix);
        files.push(PathBuf::from(name));
    }
    files.push(path.to_path_buf());
    files
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
