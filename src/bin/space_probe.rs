//! Headless space probe
//!
//! Loads a space directory (space.info + map.png) from disk, prints the
//! resulting classification and answers a path query. This binary plays the
//! external collaborator roles the core deliberately avoids: file reading,
//! PNG decoding and geometry bake handling.

use std::path::PathBuf;

use clap::Parser;

use tiled_space::space::baking::{BakeRequest, GeometryBaker};
use tiled_space::{TileLocation, TiledSpace};

/// Inspect a space directory without a renderer
#[derive(Parser, Debug)]
#[command(name = "space_probe")]
#[command(about = "Load a space directory and print map queries")]
struct Args {
    /// Directory containing space.info and map.png
    space_dir: PathBuf,

    /// Print every geometry bake request
    #[arg(long)]
    bakes: bool,

    /// Path query endpoints as h,v pairs: from_h from_v to_h to_v
    #[arg(long, num_args = 4)]
    path: Option<Vec<i32>>,

    /// Tile type range allowed for the path query
    #[arg(long, default_value_t = 0)]
    min_type: u8,
    #[arg(long, default_value_t = 255)]
    max_type: u8,
}

struct PrintingBaker {
    enabled: bool,
    count: usize,
}

impl GeometryBaker for PrintingBaker {
    fn bake(&mut self, request: BakeRequest) {
        self.count += 1;
        if self.enabled {
            println!(
                "bake ({:>3}, {:>3}) {:?} {}",
                request.location.h, request.location.v, request.rotation, request.model_key
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiled_space=debug,space_probe=info".into()),
        )
        .init();

    let args = Args::parse();

    let info_text = std::fs::read_to_string(args.space_dir.join("space.info"))?;
    let map = image::open(args.space_dir.join("map.png"))?.to_rgba8();

    let mut space = TiledSpace::new();
    let mut baker = PrintingBaker {
        enabled: args.bakes,
        count: 0,
    };
    space.load_space(&info_text, &map, &mut baker)?;

    println!("map size: {}x{}", space.map_size(), space.map_size());
    println!("tile size: {}", space.tile_size());
    println!("tile types:");
    for (index, tile_type) in space.tile_types().iter().enumerate() {
        println!("  [{index}] {} color {:#010X}", tile_type.name, tile_type.color);
    }
    println!("bake requests: {}", baker.count);

    if let Some(endpoints) = args.path {
        let from = TileLocation::new(endpoints[0], endpoints[1]);
        let to = TileLocation::new(endpoints[2], endpoints[3]);
        match space.find_path(from, to, args.min_type, args.max_type) {
            Ok(path) => {
                println!("path ({} tiles):", path.len());
                for location in path {
                    println!("  ({}, {})", location.h, location.v);
                }
            }
            Err(error) => println!("path failed: {error}"),
        }
    }

    Ok(())
}
