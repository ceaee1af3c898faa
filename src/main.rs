use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use leaflist::config::Config;
use leaflist::db::{
    Database, NewLocation, NewPlant, NewSpecies, Placement, PlantUpdate,
};
use leaflist::logging;

/// Keep track of house plants, their species and where they live.
#[derive(Parser, Debug)]
#[command(name = "leaflist", version, about)]
struct Cli {
    /// Path to config file (overrides LEAFLIST_CONFIG and the default location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create missing tables and seed empty ones
    Setup,
    /// List plants, newest first
    Plants {
        #[arg(long, conflicts_with = "all")]
        outdoor: bool,
        #[arg(long)]
        all: bool,
    },
    /// Show one plant
    Plant { id: i64 },
    /// List species
    Species(PlacementFilter),
    /// List locations
    Locations(PlacementFilter),
    AddSpecies {
        name: String,
        #[arg(long)]
        family: Option<String>,
        #[arg(long)]
        outdoor: bool,
    },
    AddLocation {
        name: String,
        #[arg(long)]
        outdoor: bool,
    },
    AddPlant {
        nickname: String,
        #[arg(long)]
        species: i64,
        #[arg(long)]
        location: i64,
        #[arg(long)]
        outdoor: bool,
        /// Date acquired, e.g. 04/12/2024
        #[arg(long)]
        acquired: Option<String>,
    },
    /// Edit fields on an existing plant; unspecified fields keep their value
    UpdatePlant {
        id: i64,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        soil: Option<String>,
        #[arg(long)]
        temperature: Option<String>,
        #[arg(long)]
        sunlight: Option<String>,
        #[arg(long)]
        location: Option<i64>,
        #[arg(long)]
        species: Option<i64>,
        #[arg(long)]
        watered: Option<String>,
    },
    /// Add a care log entry (date defaults to today)
    AddLog {
        plant_id: i64,
        notes: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// List care log entries for a plant
    Logs { plant_id: i64 },
    /// Register a gallery image reference
    AddImage { image: String },
    /// Use an image as a plant's picture
    AttachImage { plant_id: i64, image_id: i64 },
    /// Row counts per table
    Summary,
    /// Delete the database file and start over
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Remove duplicate plants, keeping the oldest of each
    Cleanup,
}

#[derive(Args, Debug)]
struct PlacementFilter {
    #[arg(long, conflicts_with = "outdoor")]
    indoor: bool,
    #[arg(long)]
    outdoor: bool,
}

impl PlacementFilter {
    fn placement(&self) -> Option<Placement> {
        match (self.indoor, self.outdoor) {
            (true, _) => Some(Placement::Indoor),
            (_, true) => Some(Placement::Outdoor),
            _ => None,
        }
    }
}

fn placement(outdoor: bool) -> Placement {
    if outdoor {
        Placement::Outdoor
    } else {
        Placement::Indoor
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _ = logging::init(&Config::log_dir());

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .inspect_err(|e| tracing::error!("Failed to load config: {:#}", e))?;

    let mut db = Database::open(&config.database.path)
        .with_context(|| format!("Failed to open database {:?}", config.database.path))?;
    let report = db
        .setup_with(config.database.seed)
        .context("Database setup failed")?;

    run(cli.command, &mut db, &config, report)
}

fn run(
    command: Command,
    db: &mut Database,
    config: &Config,
    report: leaflist::db::SeedReport,
) -> Result<()> {
    match command {
        Command::Setup => print_json(&report)?,
        Command::Plants { outdoor, all } => {
            let plants = if all {
                db.list_all_plants()?
            } else {
                db.list_plants(placement(outdoor))?
            };
            print_json(&plants)?;
        }
        Command::Plant { id } => match db.get_plant(id)? {
            Some(plant) => print_json(&plant)?,
            None => bail!("Plant {} not found", id),
        },
        Command::Species(filter) => print_json(&db.list_species(filter.placement())?)?,
        Command::Locations(filter) => print_json(&db.list_locations(filter.placement())?)?,
        Command::AddSpecies {
            name,
            family,
            outdoor,
        } => {
            let mut species = NewSpecies::new(name, placement(outdoor));
            species.family = family;
            let id = db.add_species(&species).context("Failed to add species")?;
            println!("{}", id);
        }
        Command::AddLocation { name, outdoor } => {
            let id = db
                .add_location(&NewLocation::new(name, placement(outdoor)))
                .context("Failed to add location")?;
            println!("{}", id);
        }
        Command::AddPlant {
            nickname,
            species,
            location,
            outdoor,
            acquired,
        } => {
            if nickname.trim().is_empty() {
                bail!("Nickname must not be empty");
            }
            let mut plant = NewPlant::new(nickname, species, location, placement(outdoor));
            plant.date_acquired = acquired;
            let id = db.add_plant(&plant).context("Failed to add plant")?;
            println!("{}", id);
        }
        Command::UpdatePlant {
            id,
            nickname,
            soil,
            temperature,
            sunlight,
            location,
            species,
            watered,
        } => {
            let Some(plant) = db.get_plant(id)? else {
                bail!("Plant {} not found", id);
            };
            let mut update = PlantUpdate::from(&plant);
            if let Some(nickname) = nickname {
                update.nickname = nickname;
            }
            update.soil_type = soil.or(update.soil_type);
            update.temperature = temperature.or(update.temperature);
            update.sunlight_preference = sunlight.or(update.sunlight_preference);
            update.location_id = location.unwrap_or(update.location_id);
            update.species_id = species.unwrap_or(update.species_id);
            update.last_watered = watered.or(update.last_watered);
            db.update_plant(&update).context("Failed to update plant")?;
            if let Some(plant) = db.get_plant(id)? {
                print_json(&plant)?;
            }
        }
        Command::AddLog {
            plant_id,
            notes,
            date,
        } => {
            if notes.trim().is_empty() {
                bail!("Notes must not be empty");
            }
            let date = date.unwrap_or_else(|| chrono::Local::now().format("%m/%d/%Y").to_string());
            let id = db
                .add_plant_log(plant_id, &date, &notes)
                .context("Failed to add log")?;
            println!("{}", id);
        }
        Command::Logs { plant_id } => print_json(&db.list_plant_logs(plant_id)?)?,
        Command::AddImage { image } => {
            let id = db.add_plant_image(&image).context("Failed to add image")?;
            println!("{}", id);
        }
        Command::AttachImage { plant_id, image_id } => {
            db.set_plant_image(plant_id, image_id)
                .context("Failed to attach image")?;
        }
        Command::Summary => {
            for (table, count) in db.table_counts()? {
                println!("{:<14} {}", table, count);
            }
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("Reset deletes every plant, species and location; pass --yes to confirm");
            }
            let report = db.reset_with(config.database.seed)?;
            print_json(&report)?;
        }
        Command::Cleanup => {
            let removed = db.cleanup_duplicate_plants()?;
            println!("Removed {} duplicate plants", removed);
        }
    }
    Ok(())
}
