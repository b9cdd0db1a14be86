use std::error::Error;
use std::path::PathBuf;

use lode_blocks::capability::Capability;
use lode_blocks::{BlockType, Catalog, World};
use lode_geom::BlockPos;
use lode_world::MemoryWorld;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

#[derive(Debug, clap::Parser)]
#[command(name = "lode", about = "Inspect and exercise a block catalog")]
struct Args {
    /// Catalog file to load instead of the built-in one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// List every registered block type.
    List,

    /// Show properties, capabilities and the serialized form of one block type.
    Inspect { block: String },

    /// Place a weathering block and run random tick passes over it.
    Weather {
        #[arg(long, default_value = "lode:copper_block")]
        block: String,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1000)]
        ticks: u32,
    },

    /// Bonemeal a growing plant once.
    Grow {
        #[arg(long, default_value = "lode:weeping_vines")]
        block: String,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = <Args as clap::Parser>::parse();

    let catalog = match &args.catalog {
        Some(path) => {
            log::debug!("loading catalog from {}", path.display());
            Catalog::load_from_path(path)?
        }
        None => Catalog::builtin()?,
    };

    match args.command {
        Command::List => list(&catalog),
        Command::Inspect { block } => inspect(&catalog, &block)?,
        Command::Weather { block, seed, ticks } => weather(&catalog, &block, seed, ticks)?,
        Command::Grow { block, seed } => grow(&catalog, &block, seed)?,
    }
    Ok(())
}

fn capability_names(ty: &BlockType) -> Vec<String> {
    Capability::ALL
        .iter()
        .filter(|c| ty.has(**c))
        .map(|c| format!("{c:?}"))
        .collect()
}

fn list(catalog: &Catalog) {
    for ty in catalog.iter() {
        println!(
            "{:>4} {:<36} {:<16} states={:<4} [{}]",
            ty.id.0,
            ty.name,
            ty.kind,
            ty.states.len(),
            capability_names(ty).join(", ")
        );
    }
}

fn inspect(catalog: &Catalog, name: &str) -> Result<(), Box<dyn Error>> {
    let ty = catalog.lookup(name)?;
    println!("{} (id {}, kind {})", ty.name, ty.id, ty.kind);
    println!("solid: {}", ty.is_solid());
    println!("states: {}", ty.states.len());
    for p in ty.states.properties() {
        let values: Vec<String> = p.domain.values().map(|v| v.to_string()).collect();
        println!("  {} = {{{}}}", p.name, values.join(", "));
    }
    println!("default: {}", catalog.describe(ty.default_state()));
    println!("capabilities: [{}]", capability_names(ty).join(", "));

    let record = catalog.encode(ty.id)?;
    println!();
    print!("{}", toml::to_string(&record)?);
    Ok(())
}

fn weather(catalog: &Catalog, name: &str, seed: u64, ticks: u32) -> Result<(), Box<dyn Error>> {
    let start = catalog.lookup(name)?.default_state();
    let mut world = MemoryWorld::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let pos = BlockPos::ORIGIN;
    catalog.place(&mut world, pos, start);

    let mut last = start;
    println!("tick {:>6}: {}", 0, catalog.describe(last));
    for tick in 1..=ticks {
        world.random_tick_pass(catalog, &mut rng);
        let now = world.read_state(pos);
        if now != last {
            println!("tick {:>6}: {}", tick, catalog.describe(now));
            last = now;
        }
        if !world.is_scheduled(pos) {
            break;
        }
    }
    Ok(())
}

fn grow(catalog: &Catalog, name: &str, seed: u64) -> Result<(), Box<dyn Error>> {
    let ty = catalog.lookup(name)?;
    let bonemeal = ty.bonemeal()?;
    let state = ty.default_state();
    let mut world = MemoryWorld::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let pos = BlockPos::new(0, 128, 0);
    catalog.place(&mut world, pos, state);

    if bonemeal.is_valid_target(catalog, &world, pos, state)
        && bonemeal.roll_success(&mut rng, pos, state)
    {
        let before = world.stats().block_entries;
        bonemeal.apply_growth(catalog, &mut world, &mut rng, pos, state);
        println!(
            "{}: bonemeal placed {} block(s)",
            ty.name,
            world.stats().block_entries - before
        );
    } else {
        println!("{}: not a valid bonemeal target", ty.name);
    }
    Ok(())
}
