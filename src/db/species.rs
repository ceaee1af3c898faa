//! Species records and their queries.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{logged, Database, Placement, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Species {
    pub id: i64,
    pub common_name: String,
    pub family: Option<String>,
    pub placement: Placement,
}

impl Species {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            common_name: row.get(1)?,
            family: row.get(2)?,
            placement: Placement::from_flag(row.get(3)?),
        })
    }
}

/// Fields supplied by the add-species form.
#[derive(Debug, Clone)]
pub struct NewSpecies {
    pub common_name: String,
    pub family: Option<String>,
    pub placement: Placement,
}

impl NewSpecies {
    pub fn new(common_name: impl Into<String>, placement: Placement) -> Self {
        Self {
            common_name: common_name.into(),
            family: None,
            placement,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }
}

impl Database {
    /// Insert a species and return its id. Common names are unique.
    pub fn add_species(&self, species: &NewSpecies) -> Result<i64> {
        logged("adding species", || {
            self.conn.execute(
                "INSERT INTO species (common_name, family, indoor) VALUES (?, ?, ?)",
                params![
                    species.common_name,
                    species.family,
                    species.placement.as_flag()
                ],
            )?;
            Ok(self.conn.last_insert_rowid())
        })
    }

    pub fn get_species(&self, id: i64) -> Result<Option<Species>> {
        logged("fetching species", || {
            let species = self
                .conn
                .query_row(
                    "SELECT id, common_name, family, indoor FROM species WHERE id = ?",
                    [id],
                    Species::from_row,
                )
                .optional()?;
            Ok(species)
        })
    }

    /// Species ordered by common name, optionally restricted to one placement.
    pub fn list_species(&self, placement: Option<Placement>) -> Result<Vec<Species>> {
        logged("fetching species", || {
            let mut stmt = self.conn.prepare(
                r#"
                SELECT id, common_name, family, indoor
                FROM species
                WHERE ?1 IS NULL OR indoor = ?1
                ORDER BY common_name ASC
                "#,
            )?;
            let species = stmt
                .query_map([placement.map(|p| p.as_flag())], Species::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            tracing::debug!("Fetched {} species", species.len());
            Ok(species)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::tests::seeded;
    use crate::db::{DbError, NewSpecies, Placement};

    #[test]
    fn test_add_then_get_species() {
        let db = seeded();
        let id = db
            .add_species(&NewSpecies::new("Monstera", Placement::Indoor).with_family("Araceae"))
            .unwrap();

        let species = db.get_species(id).unwrap().unwrap();
        assert_eq!(species.id, id);
        assert_eq!(species.common_name, "Monstera");
        assert_eq!(species.family.as_deref(), Some("Araceae"));
        assert_eq!(species.placement, Placement::Indoor);
    }

    #[test]
    fn test_duplicate_common_name_rejected() {
        let db = seeded();
        let err = db
            .add_species(&NewSpecies::new("Hosta", Placement::Outdoor))
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
        assert_eq!(db.list_species(None).unwrap().len(), 6);
    }

    #[test]
    fn test_list_species_by_placement() {
        let db = seeded();

        let outdoor = db.list_species(Some(Placement::Outdoor)).unwrap();
        let names: Vec<_> = outdoor.iter().map(|s| s.common_name.as_str()).collect();
        assert_eq!(names, vec!["Hosta"]);

        let indoor = db.list_species(Some(Placement::Indoor)).unwrap();
        assert_eq!(indoor.len(), 5);
        assert!(indoor.iter().all(|s| s.placement == Placement::Indoor));

        let all = db.list_species(None).unwrap();
        let names: Vec<_> = all.iter().map(|s| s.common_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Boston Fern", "Hosta", "Philodendron", "Pothos", "Snake Plant", "ZZ Plant"]
        );
    }

    #[test]
    fn test_missing_species_is_none() {
        let db = seeded();
        assert!(db.get_species(9999).unwrap().is_none());
    }
}
