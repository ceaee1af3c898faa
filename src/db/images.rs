//! Types and queries for plant gallery images.

use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use super::{logged, Database, DbError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantImage {
    pub id: i64,
    /// URI or file path of the picture.
    pub image: Option<String>,
}

impl Database {
    pub fn add_plant_image(&self, image: &str) -> Result<i64> {
        logged("adding plant image", || {
            self.conn
                .execute("INSERT INTO plant_images (image) VALUES (?)", [image])?;
            Ok(self.conn.last_insert_rowid())
        })
    }

    pub fn get_plant_image(&self, id: i64) -> Result<Option<PlantImage>> {
        logged("fetching plant image", || {
            let image = self
                .conn
                .query_row(
                    "SELECT id, image FROM plant_images WHERE id = ?",
                    [id],
                    |row| {
                        Ok(PlantImage {
                            id: row.get(0)?,
                            image: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(image)
        })
    }

    /// Make `image_id` the profile picture of `plant_id`.
    pub fn set_plant_image(&self, plant_id: i64, image_id: i64) -> Result<()> {
        logged("attaching plant image", || {
            let changed = self.conn.execute(
                "UPDATE plants SET image_id = ? WHERE id = ?",
                params![image_id, plant_id],
            )?;
            if changed == 0 {
                return Err(DbError::PlantNotFound(plant_id));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::tests::seeded;
    use crate::db::DbError;

    #[test]
    fn test_attach_image_to_plant() {
        let db = seeded();
        let image_id = db.add_plant_image("file:///photos/patrick.jpg").unwrap();
        db.set_plant_image(1, image_id).unwrap();

        let plant = db.get_plant(1).unwrap().unwrap();
        assert_eq!(plant.image_id, Some(image_id));

        let image = db.get_plant_image(image_id).unwrap().unwrap();
        assert_eq!(image.image.as_deref(), Some("file:///photos/patrick.jpg"));
    }

    #[test]
    fn test_attach_unknown_image_rejected() {
        let db = seeded();
        let err = db.set_plant_image(1, 77).unwrap_err();
        assert!(err.is_constraint());
    }

    #[test]
    fn test_attach_image_to_missing_plant() {
        let db = seeded();
        let image_id = db.add_plant_image("a.png").unwrap();
        assert!(matches!(
            db.set_plant_image(500, image_id),
            Err(DbError::PlantNotFound(500))
        ));
        assert!(db.get_plant_image(image_id + 1).unwrap().is_none());
    }
}
