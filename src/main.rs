use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexworld_generator::ascii::{self, AsciiMode};
use hexworld_generator::biome_map::{BiomeMap, BiomeMapConfig};
use hexworld_generator::config::GenerationConfig;
use hexworld_generator::export;
use hexworld_generator::fields::FieldKind;
use hexworld_generator::generator::{HexMapGenerator, DEFAULT_SAVE_DIR};
use hexworld_generator::hex::AxialCoord;
use hexworld_generator::stats::MapStatistics;

#[derive(Parser, Debug)]
#[command(name = "hexworld_generator")]
#[command(about = "Generate and explore procedural hex worlds")]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding save slots
    #[arg(long, default_value = DEFAULT_SAVE_DIR, global = true)]
    save_dir: PathBuf,

    /// JSON file with exploration generation parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the continuous-field biome grid
    BiomeMap {
        /// Random seed (0 or omitted picks a random seed)
        #[arg(short, long, default_value = "0")]
        seed: i32,

        #[arg(short = 'W', long)]
        width: Option<usize>,

        #[arg(short = 'H', long)]
        height: Option<usize>,

        /// JSON file with grid size and field parameters
        #[arg(long)]
        grid_config: Option<PathBuf>,

        /// Print the map as ASCII
        #[arg(long = "ascii")]
        show_ascii: bool,

        /// Use ANSI colors for ASCII output
        #[arg(long)]
        colored: bool,

        /// Export the biome map to PNG
        #[arg(long)]
        png: Option<PathBuf>,

        /// Field to export (temperature, moisture, altitude, volatility, enchantment)
        #[arg(long, requires = "field_png")]
        field: Option<FieldKind>,

        /// Output path for the field export
        #[arg(long, requires = "field")]
        field_png: Option<PathBuf>,
    },

    /// Generate an exploration map and show a region around the start
    Explore {
        #[arg(short, long, default_value = "12345")]
        seed: i32,

        /// Radius of the displayed region
        #[arg(short, long, default_value = "6")]
        radius: i32,

        #[arg(long, default_value = "1")]
        view_range: i32,

        /// Tiles to conquer in order, as q,r
        #[arg(long, value_parser = parse_coord)]
        conquer: Vec<AxialCoord>,

        /// Display mode (biome, rarity, exploration)
        #[arg(short, long, default_value = "biome")]
        mode: AsciiMode,

        #[arg(long)]
        colored: bool,

        /// Export the region to PNG
        #[arg(long)]
        png: Option<PathBuf>,
    },

    /// Start a map, conquer tiles and write a save slot
    Save {
        slot: String,

        #[arg(short, long, default_value = "12345")]
        seed: i32,

        #[arg(long, default_value = "1")]
        view_range: i32,

        /// Tiles to conquer in order, as q,r
        #[arg(long, value_parser = parse_coord)]
        conquer: Vec<AxialCoord>,
    },

    /// Load a save slot and show its state
    Load {
        slot: String,

        /// Radius of the displayed region
        #[arg(short, long, default_value = "6")]
        radius: i32,

        #[arg(short, long, default_value = "exploration")]
        mode: AsciiMode,
    },

    /// List save slots
    Saves,

    /// Delete a save slot
    DeleteSave { slot: String },

    /// Generate a region and report statistics
    Stats {
        #[arg(short, long, default_value = "12345")]
        seed: i32,

        #[arg(short, long, default_value = "10")]
        radius: i32,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_coord(s: &str) -> Result<AxialCoord, String> {
    let (q, r) = s
        .split_once(',')
        .ok_or_else(|| format!("expected q,r but got '{}'", s))?;
    let q = q.trim().parse::<i32>().map_err(|e| e.to_string())?;
    let r = r.trim().parse::<i32>().map_err(|e| e.to_string())?;
    Ok(AxialCoord::new(q, r))
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::BiomeMap {
            seed,
            width,
            height,
            grid_config,
            show_ascii,
            colored,
            png,
            field,
            field_png,
        } => {
            let mut config = match &grid_config {
                Some(path) => BiomeMapConfig::from_json_file(path)?,
                None => BiomeMapConfig::default(),
            };
            if let Some(width) = width {
                config.width = width;
            }
            if let Some(height) = height {
                config.height = height;
            }

            println!("Generating {}x{} biome map...", config.width, config.height);
            let map = BiomeMap::generate(config, seed);
            println!("Seed: {}", map.seed());

            let total = (map.width() * map.height()).max(1);
            let mut counts: Vec<_> = map.biome_counts().into_iter().collect();
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            for (biome, count) in counts {
                println!(
                    "  {:<16} {:>7} ({:.1}%)",
                    biome.display_name(),
                    count,
                    100.0 * count as f64 / total as f64
                );
            }

            if show_ascii {
                print!("{}", ascii::render_biome_map(&map, colored));
                print!("{}", ascii::grid_biome_legend());
            }
            if let Some(path) = png {
                export::export_biome_map(&map, &path)?;
                println!("Biome map saved to {}", path.display());
            }
            if let (Some(kind), Some(path)) = (field, field_png) {
                export::export_field(&map, kind, &path)?;
                println!("{} field saved to {}", kind, path.display());
            }
        }

        Command::Explore {
            seed,
            radius,
            view_range,
            conquer,
            mode,
            colored,
            png,
        } => {
            let mut generator = new_generator(&args.config, &args.save_dir, seed)?;
            generator.initialize_map(seed, AxialCoord::ORIGIN);
            for coord in conquer {
                if !generator.conquer_tile(coord, view_range) {
                    println!("Could not conquer {} (not unlocked)", coord);
                }
            }

            print!(
                "{}",
                ascii::render_hex_region(&mut generator, AxialCoord::ORIGIN, radius, mode, colored)
            );
            if mode == AsciiMode::Biome {
                print!("{}", ascii::biome_legend());
            }
            println!("{}", MapStatistics::from_generator(&generator).summary());

            if let Some(path) = png {
                export::export_hex_region(&mut generator, AxialCoord::ORIGIN, radius, 12, &path)?;
                println!("Region saved to {}", path.display());
            }
        }

        Command::Save {
            slot,
            seed,
            view_range,
            conquer,
        } => {
            let mut generator = new_generator(&args.config, &args.save_dir, seed)?;
            generator.initialize_map(seed, AxialCoord::ORIGIN);
            for coord in conquer {
                if !generator.conquer_tile(coord, view_range) {
                    println!("Could not conquer {} (not unlocked)", coord);
                }
            }

            if generator.save_map_state(&slot) {
                println!(
                    "Saved slot '{}' ({} tiles conquered)",
                    slot,
                    generator.conquered_tile_count()
                );
            } else {
                return Err(format!("failed to save slot '{}'", slot).into());
            }
        }

        Command::Load { slot, radius, mode } => {
            let mut generator = new_generator(&args.config, &args.save_dir, 0)?;
            if !generator.load_map_state(&slot) {
                return Err(format!("failed to load slot '{}'", slot).into());
            }

            println!("Seed: {} | View range: {}", generator.seed(), generator.view_range());
            print!(
                "{}",
                ascii::render_hex_region(&mut generator, AxialCoord::ORIGIN, radius, mode, false)
            );
            println!("{}", MapStatistics::from_generator(&generator).summary());
        }

        Command::Saves => {
            let generator = new_generator(&args.config, &args.save_dir, 0)?;
            let store = generator.save_store();
            let slots = store.list_slots()?;
            if slots.is_empty() {
                println!("No saves in {}", store.base_dir().display());
            }
            for slot in slots {
                match store.load(&slot) {
                    Ok(Some(snapshot)) => {
                        let saved_at = snapshot
                            .saved_at_local()
                            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                            .unwrap_or_else(|| snapshot.last_save_time.clone());
                        println!(
                            "{:<20} seed {:>11} | {} conquered | {} megagons | {}",
                            slot,
                            snapshot.seed,
                            snapshot.total_tiles_explored,
                            snapshot.total_megagons_defeated,
                            saved_at
                        );
                    }
                    Ok(None) => {}
                    Err(e) => println!("{:<20} unreadable: {}", slot, e),
                }
            }
        }

        Command::DeleteSave { slot } => {
            let generator = new_generator(&args.config, &args.save_dir, 0)?;
            if generator.delete_save(&slot) {
                println!("Deleted slot '{}'", slot);
            } else {
                println!("No slot named '{}'", slot);
            }
        }

        Command::Stats { seed, radius, json } => {
            let mut generator = new_generator(&args.config, &args.save_dir, seed)?;
            let stats = MapStatistics::from_region(&mut generator, AxialCoord::ORIGIN, radius);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", stats.report());
                let megagons = generator.megagon_centers();
                if !megagons.is_empty() {
                    println!("Megagon centers:");
                    for center in megagons {
                        if let Some(tile) = generator.tile(*center) {
                            println!("  {} {}", center, tile.display_name());
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn new_generator(
    config: &Option<PathBuf>,
    save_dir: &Path,
    seed: i32,
) -> Result<HexMapGenerator, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };
    Ok(HexMapGenerator::new(config, seed).with_save_dir(save_dir))
}
