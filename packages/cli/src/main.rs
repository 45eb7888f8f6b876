#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the amenity map dataset toolchain.
//!
//! Converts raw facility exports into normalized working-set JSON,
//! validates datasets, and runs one-shot proximity rankings from the
//! command line.

use std::collections::BTreeSet;
use std::path::PathBuf;

use amenity_map_dataset::Dataset;
use amenity_map_facility_models::{FacilityKind, PositionSource, UserLocation};
use amenity_map_proximity::descriptor::{MarkerDescriptor, UserMarker};
use amenity_map_proximity::rank;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "amenity_map_cli",
    about = "Facility dataset toolchain for the amenity map"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a raw facility export into normalized working-set JSON
    Convert {
        /// Input file (.json records array or .csv with a header row)
        #[arg(long)]
        input: PathBuf,
        /// Output path for the normalized JSON array
        #[arg(long)]
        output: PathBuf,
    },
    /// Load a dataset and print its session summary
    Validate {
        /// Input file (.json or .csv)
        #[arg(long)]
        input: PathBuf,
    },
    /// Rank facilities around a position and print the nearest table
    Nearby {
        /// Input file (.json or .csv)
        #[arg(long)]
        input: PathBuf,
        /// User latitude (the built-in default location is used if omitted)
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        /// User longitude (the built-in default location is used if omitted)
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
        /// Comma-separated kind labels (default: every kind in the dataset)
        #[arg(long)]
        kinds: Option<String>,
        /// Number of nearest facilities to select
        #[arg(long, default_value = "5")]
        k: usize,
        /// Print the full marker payload as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { input, output } => {
            let dataset = Dataset::load_path(&input)?;
            let json = serde_json::to_string_pretty(&dataset.facilities)?;
            std::fs::write(&output, json)?;
            println!(
                "Wrote {} records to {} ({} rows dropped)",
                dataset.len(),
                output.display(),
                dataset.dropped
            );
        }
        Commands::Validate { input } => {
            let dataset = Dataset::load_path(&input)?;
            println!("Loaded {} at {}", input.display(), dataset.loaded_at);
            println!();
            println!("{:<20} COUNT", "KIND");
            println!("{}", "-".repeat(30));
            for (kind, count) in dataset.kind_counts() {
                println!("{kind:<20} {count}");
            }
            println!("{}", "-".repeat(30));
            println!("{:<20} {}", "total", dataset.len());
            println!("{:<20} {}", "dropped", dataset.dropped);
        }
        Commands::Nearby {
            input,
            lat,
            lng,
            kinds,
            k,
            json,
        } => {
            let dataset = Dataset::load_path(&input)?;

            let user = match (lat, lng) {
                (Some(lat), Some(lng)) => UserLocation::new(lat, lng, PositionSource::Gps),
                _ => {
                    log::warn!("No position supplied; using the default location");
                    UserLocation::fallback()
                }
            };

            let selected: BTreeSet<FacilityKind> = kinds.map_or_else(
                || dataset.present_kinds(),
                |list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| FacilityKind::from(s.to_owned()))
                        .collect()
                },
            );

            let ranking = rank(&dataset.facilities, user, &selected, k)?;

            if json {
                let nearest: Vec<MarkerDescriptor> = ranking
                    .nearest
                    .iter()
                    .map(MarkerDescriptor::for_facility)
                    .collect();
                let remainder: Vec<MarkerDescriptor> = ranking
                    .remainder
                    .iter()
                    .map(MarkerDescriptor::for_facility)
                    .collect();
                let payload = serde_json::json!({
                    "user": UserMarker::from(user),
                    "nearest": nearest,
                    "remainder": remainder,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{:<6} {:>8} {:<20} ADDRESS", "ID", "METERS", "KIND");
                println!("{}", "-".repeat(60));
                for item in &ranking.nearest {
                    println!(
                        "{:<6} {:>8.0} {:<20} {}",
                        item.facility.id,
                        item.distance_meters,
                        item.facility.kind,
                        item.facility.address.as_deref().unwrap_or("-")
                    );
                }
                println!("{}", "-".repeat(60));
                println!("{} more within the selected kinds", ranking.remainder.len());
            }
        }
    }

    Ok(())
}
