//! Plant records: the user's individual specimens.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, info};

use super::{logged, Database, DbError, Placement, Result};

const PLANT_SELECT: &str = r#"
    SELECT
        plants.id, plants.nickname,
        plants.species_id, species.common_name,
        plants.location_id, locations.name,
        plants.indoor,
        plants.date_acquired, plants.last_fertilized, plants.last_watered,
        plants.soil_type, plants.sunlight_preference, plants.temperature,
        plants.image_id, plants.log_id
    FROM plants
    LEFT JOIN species ON plants.species_id = species.id
    LEFT JOIN locations ON plants.location_id = locations.id
"#;

/// A plant joined with its species and location names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantDetail {
    pub id: i64,
    pub nickname: String,
    pub species_id: i64,
    pub species_name: Option<String>,
    pub location_id: i64,
    pub location_name: Option<String>,
    pub placement: Placement,
    pub date_acquired: Option<String>,
    pub last_fertilized: Option<String>,
    pub last_watered: Option<String>,
    pub soil_type: Option<String>,
    pub sunlight_preference: Option<String>,
    pub temperature: Option<String>,
    pub image_id: Option<i64>,
    pub log_id: Option<i64>,
}

impl PlantDetail {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            nickname: row.get(1)?,
            species_id: row.get(2)?,
            species_name: row.get(3)?,
            location_id: row.get(4)?,
            location_name: row.get(5)?,
            placement: Placement::from_flag(row.get(6)?),
            date_acquired: row.get(7)?,
            last_fertilized: row.get(8)?,
            last_watered: row.get(9)?,
            soil_type: row.get(10)?,
            sunlight_preference: row.get(11)?,
            temperature: row.get(12)?,
            image_id: row.get(13)?,
            log_id: row.get(14)?,
        })
    }
}

/// Fields supplied by the add-plant form.
#[derive(Debug, Clone)]
pub struct NewPlant {
    pub nickname: String,
    pub species_id: i64,
    pub location_id: i64,
    pub placement: Placement,
    pub date_acquired: Option<String>,
}

impl NewPlant {
    pub fn new(
        nickname: impl Into<String>,
        species_id: i64,
        location_id: i64,
        placement: Placement,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            species_id,
            location_id,
            placement,
            date_acquired: None,
        }
    }
}

/// Fields editable from the plant profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantUpdate {
    pub id: i64,
    pub nickname: String,
    pub soil_type: Option<String>,
    pub temperature: Option<String>,
    pub sunlight_preference: Option<String>,
    pub location_id: i64,
    pub species_id: i64,
    pub last_watered: Option<String>,
}

impl From<&PlantDetail> for PlantUpdate {
    fn from(plant: &PlantDetail) -> Self {
        Self {
            id: plant.id,
            nickname: plant.nickname.clone(),
            soil_type: plant.soil_type.clone(),
            temperature: plant.temperature.clone(),
            sunlight_preference: plant.sunlight_preference.clone(),
            location_id: plant.location_id,
            species_id: plant.species_id,
            last_watered: plant.last_watered.clone(),
        }
    }
}

impl Database {
    /// Insert a plant and return its id.
    ///
    /// Fails with [`DbError::Constraint`] when the species or location does
    /// not exist, or when the (nickname, species, location) triple is taken.
    pub fn add_plant(&self, plant: &NewPlant) -> Result<i64> {
        logged("adding plant", || {
            self.conn.execute(
                r#"
                INSERT INTO plants (nickname, species_id, location_id, indoor, date_acquired)
                VALUES (?, ?, ?, ?, ?)
                "#,
                params![
                    plant.nickname,
                    plant.species_id,
                    plant.location_id,
                    plant.placement.as_flag(),
                    plant.date_acquired,
                ],
            )?;
            let id = self.conn.last_insert_rowid();
            info!("Added plant {} ({})", id, plant.nickname);
            Ok(id)
        })
    }

    pub fn get_plant(&self, id: i64) -> Result<Option<PlantDetail>> {
        logged("fetching plant by id", || {
            let plant = self
                .conn
                .query_row(
                    &format!("{} WHERE plants.id = ?", PLANT_SELECT),
                    [id],
                    PlantDetail::from_row,
                )
                .optional()?;
            Ok(plant)
        })
    }

    /// Plants in one placement, newest first.
    pub fn list_plants(&self, placement: Placement) -> Result<Vec<PlantDetail>> {
        logged("fetching plants", || {
            let mut stmt = self.conn.prepare(&format!(
                "{} WHERE plants.indoor = ? ORDER BY plants.id DESC",
                PLANT_SELECT
            ))?;
            let plants = stmt
                .query_map([placement.as_flag()], PlantDetail::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            debug!("Fetched {} {} plants", plants.len(), placement.as_str());
            Ok(plants)
        })
    }

    /// Every plant regardless of placement, newest first.
    pub fn list_all_plants(&self) -> Result<Vec<PlantDetail>> {
        logged("fetching plants", || {
            let mut stmt = self
                .conn
                .prepare(&format!("{} ORDER BY plants.id DESC", PLANT_SELECT))?;
            let plants = stmt
                .query_map([], PlantDetail::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            debug!("Fetched {} plants", plants.len());
            Ok(plants)
        })
    }

    pub fn update_plant(&self, update: &PlantUpdate) -> Result<()> {
        logged("updating plant", || {
            let changed = self.conn.execute(
                r#"
                UPDATE plants
                SET nickname = ?,
                    soil_type = ?,
                    temperature = ?,
                    sunlight_preference = ?,
                    location_id = ?,
                    species_id = ?,
                    last_watered = ?
                WHERE id = ?
                "#,
                params![
                    update.nickname,
                    update.soil_type,
                    update.temperature,
                    update.sunlight_preference,
                    update.location_id,
                    update.species_id,
                    update.last_watered,
                    update.id,
                ],
            )?;
            if changed == 0 {
                return Err(DbError::PlantNotFound(update.id));
            }
            info!("Updated plant {}", update.id);
            Ok(())
        })
    }
}
