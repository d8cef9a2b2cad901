use std::error::Error;

use clap::{Parser, Subcommand};
use slippyroute::raster::{BoundingBox, RasterQuery, BERKELEY_TILES};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the grid of tiles covering a viewport
    Raster {
        /// Longitude of the west edge of the viewport
        west: f64,

        /// Latitude of the north edge of the viewport
        north: f64,

        /// Longitude of the east edge of the viewport
        east: f64,

        /// Latitude of the south edge of the viewport
        south: f64,

        /// Width of the viewport, in pixels
        width: f64,
    },

    /// Print the great-circle distance between two points, in miles
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },

    /// Print the initial bearing from the first point towards the second, in degrees
    Bearing {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Raster {
            west,
            north,
            east,
            south,
            width,
        } => {
            let query = RasterQuery {
                bbox: BoundingBox {
                    west,
                    north,
                    east,
                    south,
                },
                width,
            };
            let raster = slippyroute::rasterize(&BERKELEY_TILES, &query)?;

            println!("depth: {}", raster.depth);
            println!(
                "bbox: {} {} {} {}",
                raster.bbox.west, raster.bbox.north, raster.bbox.east, raster.bbox.south
            );
            for row in &raster.grid {
                let names: Vec<String> = row.iter().map(|t| t.to_string()).collect();
                println!("{}", names.join(" "));
            }
        }

        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => println!("{:.3}", slippyroute::earth_distance(lat1, lon1, lat2, lon2)),

        Command::Bearing {
            lat1,
            lon1,
            lat2,
            lon2,
        } => println!("{:.1}", slippyroute::initial_bearing(lat1, lon1, lat2, lon2)),
    }

    Ok(())
}
