use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use space_shooter_core::{Action, ContributionData, Event, Strategy, DAYS_PER_WEEK};
use space_shooter_system_column_sweep::ColumnSweep;
use space_shooter_world::{self as world, query, World};

#[test]
fn replaying_the_sweep_clears_random_calendars() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_c0ff_ee00_0001);

    for round in 0..64 {
        let weeks = rng.gen_range(0..=53);
        let data = random_calendar(&mut rng, weeks);

        let outcome = replay(&data);

        assert!(outcome.complete, "round {round} left enemies alive");
        assert_eq!(outcome.actions, ColumnSweep::planned_len(&data));
        assert_eq!(outcome.hits, outcome.shots, "round {round} wasted a shot");
        assert_eq!(outcome.shots, total_levels(&data), "round {round}");
    }
}

#[test]
fn replaying_the_sweep_handles_levels_beyond_display_range() {
    let data = ContributionData::from_levels([[0, 12, 0, 5, 0, 0, 1], [0; DAYS_PER_WEEK]]);

    let outcome = replay(&data);

    assert!(outcome.complete);
    assert_eq!(outcome.actions, 12 * DAYS_PER_WEEK);
    assert_eq!(outcome.shots, 18);
}

#[test]
fn sweep_stops_shooting_each_day_once_it_is_cleared() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let data = random_calendar(&mut rng, 20);
    let mut world = World::new(data.clone());
    let strategy = ColumnSweep::new();

    for action in strategy.actions(&data) {
        if action.shoots() {
            assert!(
                query::enemy_at(&world, action.cell()).is_some(),
                "fired at a cleared cell: {action}"
            );
        }
        apply_action(&mut world, action);
    }

    assert!(query::is_complete(&world));
}

struct Outcome {
    complete: bool,
    actions: usize,
    shots: usize,
    hits: usize,
}

fn replay(data: &ContributionData) -> Outcome {
    let mut world = World::new(data.clone());
    let strategy = ColumnSweep::new();
    let mut outcome = Outcome {
        complete: false,
        actions: 0,
        shots: 0,
        hits: 0,
    };

    for action in strategy.actions(data) {
        outcome.actions += 1;
        if action.shoots() {
            outcome.shots += 1;
        }
        let events = apply_action(&mut world, action);
        outcome.hits += events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDamaged { .. }))
            .count();
    }

    outcome.complete = query::is_complete(&world);
    outcome
}

fn apply_action(world: &mut World, action: Action) -> Vec<Event> {
    let mut events = Vec::new();
    for command in action.commands() {
        world::apply(world, command, &mut events);
    }
    events
}

fn random_calendar(rng: &mut ChaCha8Rng, weeks: usize) -> ContributionData {
    ContributionData::from_levels((0..weeks).map(|_| {
        let mut levels = [0; DAYS_PER_WEEK];
        for level in &mut levels {
            *level = if rng.gen_bool(0.4) {
                0
            } else {
                rng.gen_range(1..=4)
            };
        }
        levels
    }))
}

fn total_levels(data: &ContributionData) -> usize {
    data.weeks()
        .iter()
        .flat_map(|week| week.levels())
        .map(|level| level as usize)
        .sum()
}
