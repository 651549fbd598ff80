use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::{fs::File, io::Write, path::PathBuf};
use walkroute::{
    sdk::config::WalkConfig,
    sdk::narration::RouteSummary,
    sdk::routing::{walkable_area, Coord, RouteRequest, TagFilter, UserPreferences},
    sdk::util::log::init_logging,
};

/// Suggests walking routes around a point using OpenStreetMap data
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Write the GeoJSON result here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Point {
    /// Latitude in degrees (e.g. 52.52)
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in degrees (e.g. 13.405)
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Points of interest around a location
    Pois {
        #[command(flatten)]
        at: Point,

        /// Search radius in meters
        #[arg(long, default_value_t = 500.0)]
        radius: f64,

        /// Tag filter as key=value; repeatable. Defaults to a walking-friendly set
        #[arg(long = "filter")]
        filters: Vec<TagFilter>,
    },

    /// Approximate area walkable within a time budget (constant-speed disc)
    Isochrone {
        #[command(flatten)]
        at: Point,

        #[arg(long, default_value_t = 15)]
        minutes: u32,
    },

    /// Suggest a route: scenic loop, point-to-point, or walkable area
    Route {
        #[command(flatten)]
        at: Point,

        #[arg(long, requires = "to_lon", allow_negative_numbers = true)]
        to_lat: Option<f64>,

        #[arg(long, requires = "to_lat", allow_negative_numbers = true)]
        to_lon: Option<f64>,

        /// Distance budget in km; overrides the preferred distance
        #[arg(long)]
        max_distance_km: Option<f64>,

        /// Build a circular route through nearby parks and sights
        #[arg(long)]
        scenic: bool,

        /// Stored preference used when --max-distance-km is absent
        #[arg(long, default_value_t = 5.0)]
        preferred_max_distance_km: f64,

        /// Print the narration prompt to stderr
        #[arg(long)]
        prompt: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = WalkConfig::from_env()?;
    log::debug!("Loaded config: {:?}", config);

    let document = match cli.command {
        Command::Pois { at, radius, filters } => {
            let (pois, _) = config.build_services()?;
            let filters = (!filters.is_empty()).then_some(filters.as_slice());
            let fc = pois.find_pois(Coord::new(at.lat, at.lon), radius, filters)?;
            serde_json::to_value(&fc)?
        }
        Command::Isochrone { at, minutes } => {
            serde_json::to_value(walkable_area(Coord::new(at.lat, at.lon), minutes))?
        }
        Command::Route {
            at,
            to_lat,
            to_lon,
            max_distance_km,
            scenic,
            preferred_max_distance_km,
            prompt,
        } => {
            let request = RouteRequest {
                start: Coord::new(at.lat, at.lon),
                end: to_lat.zip(to_lon).map(|(lat, lon)| Coord::new(lat, lon)),
                max_distance_km,
                scenic,
            };
            let preferences = UserPreferences {
                preferred_max_distance_km,
                ..UserPreferences::default()
            };

            let route = config
                .build_selector()?
                .suggest(&request, &preferences)
                .context("Could not build route")?;
            if prompt {
                eprintln!("{}", RouteSummary::from_route(&route).description_prompt());
            }
            serde_json::to_value(&route)?
        }
    };

    let json_output = serde_json::to_string_pretty(&document)?;
    match cli.output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            file.write_all(json_output.as_bytes())?;
            log::info!("Result written to {}", path.display());
        }
        None => println!("{}", json_output),
    }

    Ok(())
}
