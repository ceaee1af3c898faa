pub const SCHEMA: &str = r#"
-- Species: plant taxa offered when adding a plant
CREATE TABLE IF NOT EXISTS species (
    id INTEGER NOT NULL PRIMARY KEY,
    common_name TEXT NOT NULL,
    family TEXT,
    indoor INTEGER NOT NULL,
    UNIQUE (common_name) ON CONFLICT ABORT
);

-- Locations: named placements inside or around the house
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL,
    indoor INTEGER NOT NULL,
    UNIQUE (name) ON CONFLICT ABORT
);

-- Gallery images (stored as a URI or file reference)
CREATE TABLE IF NOT EXISTS plant_images (
    id INTEGER NOT NULL PRIMARY KEY,
    image TEXT
);

-- Plants: individual specimens owned by the user
CREATE TABLE IF NOT EXISTS plants (
    id INTEGER NOT NULL PRIMARY KEY,
    species_id INTEGER NOT NULL,
    location_id INTEGER NOT NULL,
    image_id INTEGER,
    log_id INTEGER,
    nickname TEXT NOT NULL,
    indoor INTEGER NOT NULL,
    date_acquired TEXT,
    last_fertilized TEXT,
    last_watered TEXT,
    soil_type TEXT,
    sunlight_preference TEXT,
    temperature TEXT,
    UNIQUE (nickname, species_id, location_id) ON CONFLICT ABORT,
    FOREIGN KEY (species_id) REFERENCES species(id) ON DELETE CASCADE,
    FOREIGN KEY (location_id) REFERENCES locations(id) ON DELETE CASCADE,
    FOREIGN KEY (image_id) REFERENCES plant_images(id) ON DELETE SET NULL,
    FOREIGN KEY (log_id) REFERENCES plant_logs(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_plants_indoor ON plants(indoor);

-- Care journal entries
CREATE TABLE IF NOT EXISTS plant_logs (
    id INTEGER NOT NULL PRIMARY KEY,
    plant_id INTEGER NOT NULL,
    log_date TEXT,
    notes TEXT,
    FOREIGN KEY (plant_id) REFERENCES plants(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_plant_logs_plant ON plant_logs(plant_id);
"#;

/// Tables created by [`SCHEMA`], in dependency order.
pub const TABLES: &[&str] = &["species", "locations", "plant_images", "plants", "plant_logs"];

pub const SEED_SPECIES: &str = r#"
INSERT INTO species (common_name, indoor) VALUES
    ('Snake Plant', 1),
    ('Hosta', 0),
    ('Boston Fern', 1),
    ('Philodendron', 1),
    ('ZZ Plant', 1),
    ('Pothos', 1);
"#;

pub const SEED_LOCATIONS: &str = r#"
INSERT INTO locations (name, indoor) VALUES
    ('Living Room', 1),
    ('Bedroom', 1),
    ('Kitchen', 1),
    ('Bathroom', 1),
    ('Office', 1),
    ('Patio', 0),
    ('Garden Bed 1', 0),
    ('Front Porch', 0);
"#;

// References are resolved by name. A plant whose species or location is
// missing is skipped rather than failing the whole batch.
pub const SEED_PLANTS: &str = r#"
INSERT INTO plants (nickname, species_id, location_id, indoor)
SELECT 'Patrick', s.id, l.id, 1
FROM species s, locations l
WHERE s.common_name = 'Snake Plant' AND l.name = 'Living Room';

INSERT INTO plants (nickname, species_id, location_id, indoor)
SELECT 'Lucy', s.id, l.id, 0
FROM species s, locations l
WHERE s.common_name = 'Hosta' AND l.name = 'Garden Bed 1';

INSERT INTO plants (nickname, species_id, location_id, indoor)
SELECT 'Fernise', s.id, l.id, 1
FROM species s, locations l
WHERE s.common_name = 'Boston Fern' AND l.name = 'Kitchen';
"#;
