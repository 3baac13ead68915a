//! # radial_rooms
//!
//! Generates a radial room map from a map directory and logs what it built.
//! Optionally snapshots one generated room into a static room template.
//!
//! ```text
//! radial_rooms <map_dir> [--seed N] [--export ROOM OUT.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see every trail attempt.

use std::error::Error;
use std::path::PathBuf;

use log::{error, info};

use radial_rooms::assets::ScatterSpawner;
use radial_rooms::config::{GenerationTunables, MapConfig};
use radial_rooms::editor::MapSession;

const USAGE: &str = "usage: radial_rooms <map_dir> [--seed N] [--export ROOM OUT.json]";

struct Args {
    map_dir: PathBuf,
    seed: Option<u64>,
    export: Option<(String, PathBuf)>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut map_dir = None;
    let mut seed = None;
    let mut export = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                seed = Some(value.parse::<u64>().map_err(|e| format!("bad seed '{}': {}", value, e))?);
            }
            "--export" => {
                let room = args.next().ok_or("--export needs a room name")?;
                let out = args.next().ok_or("--export needs an output path")?;
                export = Some((room, PathBuf::from(out)));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
            other => {
                if map_dir.replace(PathBuf::from(other)).is_some() {
                    return Err("only one map directory may be given".to_string());
                }
            }
        }
    }

    Ok(Args {
        map_dir: map_dir.ok_or("missing map directory")?,
        seed,
        export,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            error!("{}", message);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let config = MapConfig::load(&args.map_dir)?;
    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    info!("Generating {} with seed {}", args.map_dir.display(), seed);

    let session = MapSession::new(config, GenerationTunables::default(), seed, ScatterSpawner::new())?;
    {
        let map = session.map();
        let map = map.read();
        info!(
            "{} rooms, {} trails, {} assets, {} isolated rooms ({:.3}s)",
            map.stats.room_count,
            map.stats.trail_count,
            map.stats.asset_count,
            map.stats.isolated_rooms,
            map.stats.generation_time
        );
    }

    if let Some((room, out)) = &args.export {
        session.export_room_template(room, out)?;
    }
    Ok(())
}
