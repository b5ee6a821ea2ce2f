//! Property-based invariant checks for the round executor: these hold
//! across a wide range of randomly generated boards, not just the
//! hand-picked scenarios in `tests/engine`.

use crate::support::*;
use proptest::prelude::*;
use tactics_engine::enums::{FormulaType, Side, TargetKind, TargetSide};
use tactics_engine::execute_round;
use tactics_engine::model::{Formula, SpellDefinition, SpellSpec, TargetDescriptor};
use tactics_engine::Catalogs;

fn damage_catalogs(value: i32) -> Catalogs {
    let mut catalogs = empty_catalogs();
    catalogs.register_hero(with_front_slot(minimal_template("attacker", 20, 0, 0), "bolt", 1, 3));
    catalogs.register_hero(minimal_template("defender", 20, 0, 0));
    catalogs.register_spell(SpellDefinition {
        id: "bolt".into(),
        name: "Bolt".into(),
        cast_priority: 0,
        spec: SpellSpec {
            formula: Formula { kind: FormulaType::Damage, value, die: None, ignore_spell_power: true },
            targets: vec![TargetDescriptor { kind: TargetKind::Projectile, side: TargetSide::Enemy }],
            effects: vec![],
            post: Default::default(),
            per_target_extras: None,
        },
        animation_ms: 0,
        animation_secondary: None,
        sound: None,
        sound_volume: None,
    });
    catalogs
}

fn roll_catalogs() -> Catalogs {
    let mut catalogs = empty_catalogs();
    catalogs.register_hero(with_front_slot(minimal_template("attacker", 20, 0, 0), "dice_bolt", 1, 3));
    catalogs.register_hero(minimal_template("defender", 20, 0, 0));
    catalogs.register_spell(SpellDefinition {
        id: "dice_bolt".into(),
        name: "Dice Bolt".into(),
        cast_priority: 0,
        spec: SpellSpec {
            formula: Formula { kind: FormulaType::Roll, value: 0, die: Some(6), ignore_spell_power: true },
            targets: vec![TargetDescriptor { kind: TargetKind::Projectile, side: TargetSide::Enemy }],
            effects: vec![],
            post: Default::default(),
            per_target_extras: None,
        },
        animation_ms: 0,
        animation_secondary: None,
        sound: None,
        sound_volume: None,
    });
    catalogs
}

proptest! {
    /// No amount of damage, healing, or pulse activity can push a hero's
    /// health outside `[0, base_health]`; the engine always clamps.
    #[test]
    fn prop_health_stays_within_bounds(
        attacker_health in 1i32..20,
        defender_health in 1i32..20,
        bolt_value in 0i32..30,
        attacker_energy in 0i32..5,
    ) {
        let catalogs = damage_catalogs(bolt_value);
        let attacker = runtime(1, "attacker", attacker_health, 0, 0, attacker_energy);
        let defender = runtime(2, "defender", defender_health, 0, 0, 0);
        let boards = boards_with(&[(2, attacker)], &[(0, defender)]);
        let input = round_input(&boards, 1, Side::P1);
        let output = execute_round(input, quiet_options(7), &catalogs, None);

        for tile in output.p1_main.tiles.iter().chain(output.p2_main.tiles.iter()) {
            if let Some(hero) = tile.hero() {
                prop_assert!(hero.current_health >= 0, "health went negative: {}", hero.current_health);
                prop_assert!(hero.current_health <= attacker_health.max(defender_health), "a pure-damage round must never raise anyone's health: {}", hero.current_health);
            }
        }
    }

    /// Energy is always clamped at zero; `add_energy` never lets a hero's
    /// pool go negative even after a cast spends it all.
    #[test]
    fn prop_energy_never_negative(
        attacker_energy in 0i32..6,
        defender_energy in 0i32..6,
    ) {
        let catalogs = damage_catalogs(3);
        let attacker = runtime(1, "attacker", 15, 0, 0, attacker_energy);
        let defender = runtime(2, "defender", 15, 0, 0, defender_energy);
        let boards = boards_with(&[(2, attacker)], &[(0, defender)]);
        let input = round_input(&boards, 1, Side::P1);
        let output = execute_round(input, quiet_options(11), &catalogs, None);

        for tile in output.p1_main.tiles.iter().chain(output.p2_main.tiles.iter()) {
            if let Some(hero) = tile.hero() {
                prop_assert!(hero.current_energy >= 0, "energy went negative: {}", hero.current_energy);
            }
        }
    }

    /// Seeding the RNG pins the entire die-roll sequence: running the exact
    /// same round twice with the same seed must produce byte-identical
    /// output, even though the formula rolls dice.
    #[test]
    fn prop_same_seed_is_deterministic(seed in any::<u64>(), attacker_energy in 1i32..4) {
        let catalogs = roll_catalogs();
        let attacker = runtime(1, "attacker", 15, 0, 0, attacker_energy);
        let defender = runtime(2, "defender", 15, 0, 0, 0);
        let boards = boards_with(&[(2, attacker.clone())], &[(0, defender.clone())]);

        let input_a = round_input(&boards, 1, Side::P1);
        let output_a = execute_round(input_a, quiet_options(seed), &catalogs, None);

        let boards_again = boards_with(&[(2, attacker)], &[(0, defender)]);
        let input_b = round_input(&boards_again, 1, Side::P1);
        let output_b = execute_round(input_b, quiet_options(seed), &catalogs, None);

        prop_assert_eq!(output_a, output_b);
    }
}
