//! Types and queries for plant locations.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

use super::{logged, Database, Placement, Result};

/// A named placement such as "Living Room" or "Patio".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub placement: Placement,
}

impl Location {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            placement: Placement::from_flag(row.get(2)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub placement: Placement,
}

impl NewLocation {
    pub fn new(name: impl Into<String>, placement: Placement) -> Self {
        Self {
            name: name.into(),
            placement,
        }
    }
}

impl Database {
    pub fn add_location(&self, location: &NewLocation) -> Result<i64> {
        logged("adding location", || {
            self.conn.execute(
                "INSERT INTO locations (name, indoor) VALUES (?, ?)",
                params![location.name, location.placement.as_flag()],
            )?;
            Ok(self.conn.last_insert_rowid())
        })
    }

    pub fn get_location(&self, id: i64) -> Result<Option<Location>> {
        logged("fetching location", || {
            let location = self
                .conn
                .query_row(
                    "SELECT id, name, indoor FROM locations WHERE id = ?",
                    [id],
                    Location::from_row,
                )
                .optional()?;
            Ok(location)
        })
    }

    pub fn list_locations(&self, placement: Option<Placement>) -> Result<Vec<Location>> {
        logged("fetching locations", || {
            let mut stmt = self.conn.prepare(
                r#"
                SELECT id, name, indoor
                FROM locations
                WHERE ?1 IS NULL OR indoor = ?1
                ORDER BY name ASC
                "#,
            )?;
            let locations = stmt
                .query_map([placement.map(|p| p.as_flag())], Location::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            debug!("Fetched {} locations", locations.len());
            Ok(locations)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::tests::seeded;
    use crate::db::{NewLocation, Placement};

    #[test]
    fn test_add_then_get_location() {
        let db = seeded();
        let id = db
            .add_location(&NewLocation::new("Greenhouse", Placement::Outdoor))
            .unwrap();

        let location = db.get_location(id).unwrap().unwrap();
        assert_eq!(location.name, "Greenhouse");
        assert_eq!(location.placement, Placement::Outdoor);
    }

    #[test]
    fn test_duplicate_location_name_rejected() {
        let db = seeded();
        let err = db
            .add_location(&NewLocation::new("Kitchen", Placement::Indoor))
            .unwrap_err();
        assert!(err.is_constraint());
        assert_eq!(db.list_locations(None).unwrap().len(), 8);
    }

    #[test]
    fn test_list_outdoor_locations_sorted() {
        let db = seeded();
        let names: Vec<_> = db
            .list_locations(Some(Placement::Outdoor))
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Front Porch", "Garden Bed 1", "Patio"]);
    }

    #[test]
    fn test_missing_location_is_none() {
        let db = seeded();
        assert!(db.get_location(-1).unwrap().is_none());
    }
}
