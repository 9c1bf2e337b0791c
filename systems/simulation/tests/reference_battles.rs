use beverage_bandits_core::{AttackPower, AttackPowers, CellCoord, Faction};
use beverage_bandits_system_simulation::{PowerSearch, Simulation, SimulationState};
use beverage_bandits_world::Layout;

const SKIRMISH: &str = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######";

const ELVES_HOLD: &str = "\
#######
#G..#E#
#E#E.E#
#G.##.#
#...#E#
#...E.#
#######";

const SCATTERED: &str = "\
#######
#E..EG#
#.#G.E#
#E.##E#
#G..#.#
#..E#.#
#######";

const CORRIDORS: &str = "\
#######
#E.G#.#
#.#G..#
#G.#.G#
#G..#.#
#...E.#
#######";

const PILLARS: &str = "\
#######
#.E...#
#.#..G#
#.###.#
#E#G#G#
#...#G#
#######";

const OPEN_FIELD: &str = "\
#########
#G......#
#.E.#...#
#..##..G#
#...##..#
#...#...#
#.G...G.#
#.....G.#
#########";

fn layout(text: &str) -> Layout {
    Layout::parse(text).expect("reference layout parses")
}

fn battle(text: &str) -> Simulation {
    Simulation::from_layout(&layout(text), &AttackPowers::default())
}

#[test]
fn skirmish_ends_after_forty_seven_full_rounds() {
    let mut simulation = battle(SKIRMISH);
    let mut events = Vec::new();

    for round in 1..=47 {
        assert_eq!(
            simulation.play_round(&mut events).expect("round plays"),
            SimulationState::Running,
            "combat ended early in round {round}"
        );
    }
    assert_eq!(
        simulation.play_round(&mut events).expect("round plays"),
        SimulationState::Over
    );

    let roster = simulation.roster();
    let mut survivors: Vec<(CellCoord, Faction, i32)> = roster
        .living()
        .map(|unit| (unit.cell, unit.faction, unit.hit_points.get()))
        .collect();
    survivors.sort();
    assert_eq!(
        survivors,
        vec![
            (CellCoord::new(1, 1), Faction::Goblin, 200),
            (CellCoord::new(2, 2), Faction::Goblin, 131),
            (CellCoord::new(5, 3), Faction::Goblin, 59),
            (CellCoord::new(5, 5), Faction::Goblin, 200),
        ]
    );

    let outcome = simulation.outcome().expect("battle over");
    assert_eq!(outcome.rounds_completed, 47);
    assert_eq!(outcome.remaining_hit_points, 590);
    assert_eq!(outcome.value(), 27730);
}

#[test]
fn reference_battles_produce_known_outcomes() {
    let cases = [
        (SKIRMISH, 47, 590, Faction::Goblin, 27730),
        (ELVES_HOLD, 37, 982, Faction::Elf, 36334),
        (SCATTERED, 46, 859, Faction::Elf, 39514),
        (CORRIDORS, 35, 793, Faction::Goblin, 27755),
        (PILLARS, 54, 536, Faction::Goblin, 28944),
        (OPEN_FIELD, 20, 937, Faction::Goblin, 18740),
    ];

    for (text, rounds, hit_points, winner, value) in cases {
        let outcome = battle(text).run().expect("battle ends");

        assert_eq!(outcome.rounds_completed, rounds, "rounds for\n{text}");
        assert_eq!(outcome.remaining_hit_points, hit_points, "hit points for\n{text}");
        assert_eq!(outcome.winner, Some(winner), "winner for\n{text}");
        assert_eq!(outcome.value(), value, "outcome for\n{text}");
    }
}

#[test]
fn elves_find_their_smallest_flawless_power() {
    let cases = [
        (SKIRMISH, 15, 29, 172, 4988),
        (SCATTERED, 4, 33, 948, 31284),
        (CORRIDORS, 15, 37, 94, 3478),
        (PILLARS, 12, 39, 166, 6474),
        (OPEN_FIELD, 34, 30, 38, 1140),
    ];

    for (text, power, rounds, hit_points, value) in cases {
        let result = PowerSearch::new(Faction::Elf)
            .run(&layout(text))
            .expect("elves can win flawlessly");

        assert_eq!(result.attack_power, AttackPower::new(power), "power for\n{text}");
        assert_eq!(result.outcome.rounds_completed, rounds, "rounds for\n{text}");
        assert_eq!(
            result.outcome.remaining_hit_points, hit_points,
            "hit points for\n{text}"
        );
        assert_eq!(result.outcome.winner, Some(Faction::Elf));
        assert_eq!(result.outcome.value(), value, "outcome for\n{text}");
    }
}

#[test]
fn flawless_power_leaves_no_elf_behind() {
    let layout = layout(SKIRMISH);
    let powers = AttackPowers::default().with_override(Faction::Elf, AttackPower::new(15));
    let mut flawless = Simulation::from_layout(&layout, &powers);
    let weaker = AttackPowers::default().with_override(Faction::Elf, AttackPower::new(14));
    let mut costly = Simulation::from_layout(&layout, &weaker);

    let _ = flawless.run().expect("battle ends");
    let _ = costly.run().expect("battle ends");

    assert_eq!(flawless.roster().casualties(Faction::Elf), 0);
    assert!(costly.roster().casualties(Faction::Elf) > 0);
}
