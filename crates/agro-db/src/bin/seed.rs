//! # Seed Data Generator
//!
//! Populates the database with demo producers, farms, seasons, crops and
//! plantings, then prints the dashboard snapshot.
//!
//! ## Usage
//! ```bash
//! # Database from AGRO_DATABASE_PATH (default ./agro_dev.db)
//! cargo run -p agro-db --bin seed
//!
//! # Specify database path
//! cargo run -p agro-db --bin seed -- --db ./data/agro.db
//! ```
//!
//! Everything goes through the agro-core rules, so documents are validated
//! and normalized exactly as they would be for real input.

use std::env;
use std::sync::Arc;

use agro_core::{
    Crop, CropRules, DashboardAggregator, Farm, FarmRules, Hectares, NewCrop, NewFarm,
    NewPlanting, NewProducer, NewSeason, PlantingRules, Producer, ProducerRules, Season,
    SeasonRules,
};
use agro_core::validation::{validate_new_farm, validate_new_planting};
use agro_db::{Database, DbConfig, SqliteRegistryStore};
use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::EnvFilter;

type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;

/// (name, tax ID)
const PRODUCERS: &[(&str, &str)] = &[
    ("João Silva Ramos", "11.222.333/0001-81"),
    ("Moises Cunha Santos", "987.654.321-00"),
    ("Fazendas Reunidas São Paulo Ltda", "11.444.777/0001-61"),
];

/// (name, description)
const CROPS: &[(&str, &str)] = &[
    ("Soja", "Soja para produção de grãos e óleo"),
    ("Milho", "Milho para produção de ração"),
    ("Café", "Café arábica"),
];

const CROP_CATEGORY: &str = "Grãos";

#[tokio::main]
async fn main() -> SeedResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = DbConfig::from_env()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Farm Registry Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (overrides AGRO_DATABASE_PATH)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Farm Registry Seed Data Generator");
    println!("=================================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config).await?;
    let store = Arc::new(db.registry_store());

    let existing = db.farms().count().await?;
    if existing > 0 {
        println!("Database already has {} farms", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        seed(&store).await?;
        println!("Seed complete");
    }

    let snapshot = DashboardAggregator::new(store).build_snapshot().await?;
    println!();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    db.close().await;
    Ok(())
}

async fn seed(store: &Arc<SqliteRegistryStore>) -> SeedResult<()> {
    let producers = seed_producers(store).await?;
    let seasons = seed_seasons(store).await?;
    let crops = seed_crops(store).await?;

    let farm_rules = FarmRules::new(Arc::clone(store));
    let farms = [
        NewFarm {
            name: "Fazenda Ribeirão".to_string(),
            city: "Ribeirão Preto".to_string(),
            state: "SP".to_string(),
            total_area: Hectares::from_whole(500),
            arable_area: Hectares::from_whole(350),
            vegetation_area: Hectares::from_whole(150),
            producer_id: producers[0].id.clone(),
        },
        NewFarm {
            name: "Fazenda Mata dos Crioulos".to_string(),
            city: "Ouro Verde de Goiás".to_string(),
            state: "GO".to_string(),
            total_area: Hectares::from_hundredths(80_075),
            arable_area: Hectares::from_whole(600),
            vegetation_area: Hectares::from_hundredths(20_075),
            producer_id: producers[1].id.clone(),
        },
    ];

    let mut created: Vec<Farm> = Vec::with_capacity(farms.len());
    for input in farms {
        validate_new_farm(&input)?;
        created.push(farm_rules.create_farm(input).await?);
    }
    info!(count = created.len(), "Seeded farms");
    let ribeirao = &created[0];

    let planting_rules = PlantingRules::new(Arc::clone(store));
    let plantings = [
        (
            &crops[0],
            200,
            "2024-10-15",
            "2025-02-15",
            "Plantio realizado com sementes de alta produtividade",
        ),
        (
            &crops[1],
            150,
            "2024-11-01",
            "2025-03-01",
            "Milho safrinha plantado após a soja",
        ),
    ];
    for (crop, area, planted, harvest, notes) in plantings {
        let input = NewPlanting {
            planted_area: Hectares::from_whole(area),
            planting_date: Some(planted.parse::<NaiveDate>()?),
            expected_harvest_date: Some(harvest.parse::<NaiveDate>()?),
            notes: Some(notes.to_string()),
            farm_id: ribeirao.id.clone(),
            season_id: seasons[0].id.clone(),
            crop_id: crop.id.clone(),
        };
        validate_new_planting(&input)?;
        planting_rules.create_planting(input).await?;
    }
    info!("Seeded plantings");

    Ok(())
}

async fn seed_producers(store: &Arc<SqliteRegistryStore>) -> SeedResult<Vec<Producer>> {
    let rules = ProducerRules::new(Arc::clone(store));
    let mut producers = Vec::with_capacity(PRODUCERS.len());
    for (name, tax_id) in PRODUCERS {
        let producer = rules
            .create_producer(NewProducer {
                name: name.to_string(),
                tax_id: tax_id.to_string(),
            })
            .await?;
        producers.push(producer);
    }
    info!(count = producers.len(), "Seeded producers");
    Ok(producers)
}

async fn seed_seasons(store: &Arc<SqliteRegistryStore>) -> SeedResult<Vec<Season>> {
    let rules = SeasonRules::new(Arc::clone(store));
    let mut seasons = Vec::new();
    for (year, active) in [(2024, true), (2023, false)] {
        let season = rules
            .create_season(NewSeason {
                name: format!("Safra {}/{}", year, year + 1),
                year,
                start_date: format!("{}-09-01", year).parse::<NaiveDate>()?,
                end_date: format!("{}-08-31", year + 1).parse::<NaiveDate>()?,
                active,
            })
            .await?;
        seasons.push(season);
    }
    info!(count = seasons.len(), "Seeded seasons");
    Ok(seasons)
}

async fn seed_crops(store: &Arc<SqliteRegistryStore>) -> SeedResult<Vec<Crop>> {
    let rules = CropRules::new(Arc::clone(store));
    let mut crops = Vec::with_capacity(CROPS.len());
    for (name, description) in CROPS {
        let crop = rules
            .create_crop(NewCrop {
                name: name.to_string(),
                description: Some(description.to_string()),
                category: Some(CROP_CATEGORY.to_string()),
            })
            .await?;
        crops.push(crop);
    }
    info!(count = crops.len(), "Seeded crops");
    Ok(crops)
}
