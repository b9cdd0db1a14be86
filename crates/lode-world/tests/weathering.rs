use lode_blocks::weathering::change_over_time;
use lode_blocks::{Capability, Catalog, WeatherState, World, props};
use lode_geom::BlockPos;
use lode_world::MemoryWorld;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn stage_of(catalog: &Catalog, world: &MemoryWorld, pos: BlockPos) -> WeatherState {
    let state = world.read_state(pos);
    catalog
        .block(state)
        .unwrap()
        .weatherable()
        .unwrap()
        .current_stage()
}

#[test]
fn oxidizes_in_exactly_three_steps() {
    let catalog = Catalog::builtin().unwrap();
    let mut world = MemoryWorld::new();
    let pos = BlockPos::new(0, 64, 0);
    catalog.place(&mut world, pos, catalog.default_state("lode:copper_block").unwrap());

    let mut steps = 0;
    loop {
        let state = world.read_state(pos);
        if change_over_time(&catalog, &mut world, pos, state).is_none() {
            break;
        }
        steps += 1;
        assert!(steps <= 3);
    }
    assert_eq!(steps, 3);
    assert_eq!(stage_of(&catalog, &world, pos), WeatherState::Oxidized);
    assert_eq!(
        world.read_state(pos).block,
        catalog.id_by_name("lode:oxidized_copper").unwrap()
    );
}

#[test]
fn oxidized_is_not_eligible() {
    let catalog = Catalog::builtin().unwrap();
    let oxidized = catalog.lookup("lode:oxidized_copper_bulb").unwrap();
    assert!(oxidized.has(Capability::RandomTicking));
    assert_eq!(catalog.next_stage_type(oxidized.id), None);
    assert!(!catalog.is_randomly_ticking(oxidized.default_state()));

    let fresh = catalog.default_state("lode:copper_bulb").unwrap();
    assert!(catalog.is_randomly_ticking(fresh));
    let weathered = catalog.id_by_name("lode:weathered_copper_bulb").unwrap();
    assert_eq!(catalog.next_stage_type(weathered), Some(oxidized.id));
}

#[test]
fn shapes_stay_within_their_family() {
    let catalog = Catalog::builtin().unwrap();
    let bars = catalog.id_by_name("lode:copper_bars").unwrap();
    assert_eq!(
        catalog.next_stage_type(bars),
        catalog.id_by_name("lode:exposed_copper_bars")
    );
    let lantern = catalog.id_by_name("lode:weathered_copper_lantern").unwrap();
    assert_eq!(
        catalog.next_stage_type(lantern),
        catalog.id_by_name("lode:oxidized_copper_lantern")
    );
}

#[test]
fn properties_carry_across_stages() {
    let catalog = Catalog::builtin().unwrap();
    let mut world = MemoryWorld::new();
    let pos = BlockPos::new(3, 70, -2);
    let lantern = catalog.default_state("lode:copper_lantern").unwrap();
    let lantern = catalog.with(lantern, props::HANGING, true).unwrap();
    let lantern = catalog.with(lantern, props::WATERLOGGED, true).unwrap();
    catalog.place(&mut world, pos, lantern);

    let next = change_over_time(&catalog, &mut world, pos, lantern).unwrap();
    assert_eq!(
        catalog.describe(next),
        "lode:exposed_copper_lantern[hanging=true,waterlogged=true]"
    );
}

#[test]
fn random_ticks_drive_the_chain_to_the_end() {
    let catalog = Catalog::builtin().unwrap();
    let mut world = MemoryWorld::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5eed);
    let positions = [
        BlockPos::new(0, 0, 0),
        BlockPos::new(1, 0, 0),
        BlockPos::new(40, 3, -9),
    ];
    for p in positions {
        catalog.place(&mut world, p, catalog.default_state("lode:copper_block").unwrap());
    }
    assert_eq!(world.stats().scheduled_ticks, 3);

    let mut passes = 0;
    while world.scheduled().next().is_some() && passes < 10_000 {
        world.random_tick_pass(&catalog, &mut rng);
        passes += 1;
    }
    assert!(passes < 10_000);
    for p in positions {
        assert_eq!(stage_of(&catalog, &world, p), WeatherState::Oxidized);
        assert!(!world.is_scheduled(p));
    }
}

#[test]
fn non_weathering_blocks_have_no_stage() {
    let catalog = Catalog::builtin().unwrap();
    let stone = catalog.lookup("lode:stone").unwrap();
    assert_eq!(catalog.next_stage_type(stone.id), None);
    assert!(stone.weatherable().is_err());
}
