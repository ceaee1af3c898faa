mod error;
mod schema;
pub mod images;
pub mod locations;
pub mod logs;
pub mod maintenance;
pub mod plants;
pub mod species;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub use error::{DbError, Result};
pub use images::PlantImage;
pub use locations::{Location, NewLocation};
pub use logs::PlantLog;
pub use plants::{NewPlant, PlantDetail, PlantUpdate};
pub use schema::{SCHEMA, TABLES};
pub use species::{NewSpecies, Species};

/// Whether a species, location or plant belongs indoors or outdoors.
///
/// Stored in the `indoor` column as `1` (indoor) or `0` (outdoor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Indoor,
    Outdoor,
}

impl Placement {
    pub fn as_flag(&self) -> i64 {
        match self {
            Placement::Indoor => 1,
            Placement::Outdoor => 0,
        }
    }

    /// Any non-zero flag counts as indoor.
    pub fn from_flag(flag: i64) -> Self {
        if flag != 0 {
            Placement::Indoor
        } else {
            Placement::Outdoor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Indoor => "indoor",
            Placement::Outdoor => "outdoor",
        }
    }
}

/// Which tables had their seed batch run during a setup call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub species: bool,
    pub locations: bool,
    pub plants: bool,
}

impl SeedReport {
    pub fn any(&self) -> bool {
        self.species || self.locations || self.plants
    }
}

/// Run `f`, emitting an error event if it fails.
pub(crate) fn logged<T>(action: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    f().inspect_err(|e| error!("Error {}: {}", action, e))
}

/// Owned handle to the plant catalog.
///
/// Open once at startup and hand out references; every query and mutation
/// goes through this connection.
pub struct Database {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = logged("opening database", || open_connection(path))?;
        info!("Database opened at {:?}", path);
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = logged("opening in-memory database", || {
            let conn = Connection::open_in_memory()?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(conn)
        })?;
        Ok(Self { conn, path: None })
    }

    /// Backing file, or `None` for an in-memory database.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create missing tables and seed any empty seeded table.
    ///
    /// Safe to call on every start: existing tables and rows are never touched.
    pub fn setup(&self) -> Result<SeedReport> {
        self.setup_with(true)
    }

    /// Like [`Database::setup`], but seeding can be turned off.
    pub fn setup_with(&self, seed: bool) -> Result<SeedReport> {
        logged("setting up database", || {
            self.conn.execute_batch(SCHEMA)?;

            for (table, count) in self.table_counts()? {
                debug!("{} has {} rows", table, count);
            }

            if !seed {
                return Ok(SeedReport::default());
            }

            let tx = self.conn.unchecked_transaction()?;
            let mut report = SeedReport::default();
            if count_rows(&tx, "species")? == 0 {
                tx.execute_batch(schema::SEED_SPECIES)?;
                report.species = true;
            }
            if count_rows(&tx, "locations")? == 0 {
                tx.execute_batch(schema::SEED_LOCATIONS)?;
                report.locations = true;
            }
            if count_rows(&tx, "plants")? == 0 {
                tx.execute_batch(schema::SEED_PLANTS)?;
                report.plants = true;
            }
            tx.commit()?;

            if report.any() {
                info!(
                    "Seeded tables: species={} locations={} plants={}",
                    report.species, report.locations, report.plants
                );
            }
            Ok(report)
        })
    }

    /// Row count of every catalog table, in schema order.
    pub fn table_counts(&self) -> Result<Vec<(&'static str, i64)>> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for &table in TABLES {
            counts.push((table, count_rows(&self.conn, table)?));
        }
        Ok(counts)
    }
}

pub(crate) fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

// Table names come from `TABLES` only, never from user input.
fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(count)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.setup().unwrap();
        db
    }

    fn counts(db: &Database) -> Vec<(&'static str, i64)> {
        db.table_counts().unwrap()
    }

    #[test]
    fn test_setup_seeds_fresh_database() {
        let db = Database::open_in_memory().unwrap();
        let report = db.setup().unwrap();
        assert_eq!(
            report,
            SeedReport {
                species: true,
                locations: true,
                plants: true
            }
        );
        assert_eq!(
            counts(&db),
            vec![
                ("species", 6),
                ("locations", 8),
                ("plant_images", 0),
                ("plants", 3),
                ("plant_logs", 0),
            ]
        );
    }

    #[test]
    fn test_setup_is_idempotent() {
        let db = seeded();
        let before = counts(&db);
        let report = db.setup().unwrap();
        assert!(!report.any());
        assert_eq!(counts(&db), before);
    }

    #[test]
    fn test_setup_without_seed_leaves_tables_empty() {
        let db = Database::open_in_memory().unwrap();
        let report = db.setup_with(false).unwrap();
        assert!(!report.any());
        assert!(counts(&db).iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_setup_only_seeds_empty_tables() {
        let db = Database::open_in_memory().unwrap();
        db.setup_with(false).unwrap();
        db.add_species(&NewSpecies::new("Monstera", Placement::Indoor))
            .unwrap();

        let report = db.setup().unwrap();
        assert!(!report.species);
        assert!(report.locations);
        assert!(report.plants);

        // None of the seed plants' species exist, so no plant rows are added.
        assert_eq!(db.list_species(None).unwrap().len(), 1);
        assert_eq!(db.list_all_plants().unwrap().len(), 0);
    }

    #[test]
    fn test_failed_seed_rolls_back_every_table() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute_batch(
                r#"
                CREATE TABLE plants (
                    id INTEGER NOT NULL PRIMARY KEY,
                    species_id INTEGER NOT NULL,
                    location_id INTEGER NOT NULL,
                    image_id INTEGER,
                    log_id INTEGER,
                    nickname TEXT NOT NULL CHECK (nickname <> 'Lucy'),
                    indoor INTEGER NOT NULL,
                    date_acquired TEXT,
                    last_fertilized TEXT,
                    last_watered TEXT,
                    soil_type TEXT,
                    sunlight_preference TEXT,
                    temperature TEXT
                );
                "#,
            )
            .unwrap();

        let err = db.setup().unwrap_err();
        assert!(err.is_constraint());
        assert!(counts(&db).iter().all(|(_, n)| *n == 0));
        assert!(db.list_species(None).unwrap().is_empty());
        assert!(db.list_locations(None).unwrap().is_empty());
    }

    #[test]
    fn test_placement_flag() {
        assert_eq!(Placement::Indoor.as_flag(), 1);
        assert_eq!(Placement::Outdoor.as_flag(), 0);
        assert_eq!(Placement::from_flag(1), Placement::Indoor);
        assert_eq!(Placement::from_flag(0), Placement::Outdoor);
        assert_eq!(Placement::from_flag(7), Placement::Indoor);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("leaflist.db");
        let db = Database::open(&path).unwrap();
        db.setup().unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), Some(path.as_path()));
    }
}
