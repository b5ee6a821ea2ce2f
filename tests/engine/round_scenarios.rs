//! End-to-end round-executor scenarios, each driving `execute_round`
//! directly against a hand-built catalog and board rather than unit-testing
//! an individual helper.

use crate::support::*;
use tactics_engine::enums::{FormulaType, Side, TargetKind, TargetSide};
use tactics_engine::execute_round;
use tactics_engine::model::tile::Tile;
use tactics_engine::model::{EffectDefinition, EffectInstance, Formula, SpellDefinition, SpellSpec, TargetDescriptor, TileRef};
use tactics_engine::Catalogs;

fn register_basic_attack(catalogs: &mut Catalogs) {
    catalogs.register_spell(tactics_engine::catalogs::basic_attack_spell());
}

fn damage_spell(id: &str, value: i32, kind: TargetKind) -> SpellDefinition {
    SpellDefinition {
        id: id.to_string(),
        name: id.to_string(),
        cast_priority: 0,
        spec: SpellSpec {
            formula: Formula { kind: FormulaType::Damage, value, die: None, ignore_spell_power: true },
            targets: vec![TargetDescriptor { kind, side: TargetSide::Enemy }],
            effects: vec![],
            post: Default::default(),
            per_target_extras: None,
        },
        animation_ms: 0,
        animation_secondary: None,
        sound: None,
        sound_volume: None,
    }
}

#[test]
fn empty_column_projectile_misses_and_leaves_everyone_untouched() {
    let mut catalogs = empty_catalogs();
    catalogs.register_hero(minimal_template("striker", 10, 0, 0));
    catalogs.register_hero(minimal_template("dummy", 10, 0, 0));
    register_basic_attack(&mut catalogs);

    // P1's striker sits in column 0; the opposing column 0 is empty, so its
    // auto-queued basic attack (a Projectile) must resolve to zero targets.
    let striker = runtime(1, "striker", 10, 0, 0, 1);
    let dummy = runtime(2, "dummy", 10, 0, 0, 0); // column 1, out of the line of fire

    let boards = boards_with(&[(2, striker)], &[(3, dummy)]);
    let input = round_input(&boards, 1, Side::P1);
    let output = execute_round(input, quiet_options(1), &catalogs, None);

    let striker_after = output.p1_main.tiles[2].hero().unwrap();
    let dummy_after = output.p2_main.tiles[3].hero().unwrap();
    assert_eq!(dummy_after.current_health, 10, "off-column hero must take no damage from a missed projectile");
    assert_eq!(striker_after.current_health, 10);
    assert_eq!(striker_after.current_energy, 1, "a fizzled cast must not spend the caster's energy");
}

#[test]
fn defend_blocks_column_cast_at_and_behind_its_row() {
    let mut catalogs = empty_catalogs();
    catalogs.register_hero(with_front_slot(minimal_template("caster", 10, 0, 0), "columnBolt", 1, 1));
    catalogs.register_hero(minimal_template("blocker", 10, 0, 0));
    catalogs.register_spell(damage_spell("columnBolt", 5, TargetKind::Column));
    catalogs.register_effect(EffectDefinition {
        name: "Defend".into(),
        kind: tactics_engine::enums::EffectKind::Buff,
        duration: -1,
        modifiers: None,
        pulse: None,
        trigger_on_round_start: None,
        on_damaged: None,
        on_targeted: None,
        on_cast_apply_effect_to_targets: vec![],
        on_death: None,
        on_kill: None,
        blocks_projectile_and_column: true,
        spread_effect_to_adjacent_on_pulse: false,
        heal_applier_on_pulse: false,
        execute_at_or_below_health: None,
        execute_damage: None,
    });

    let caster = runtime(1, "caster", 10, 0, 0, 1);
    let front = runtime(10, "blocker", 10, 0, 0, 0);
    let mut middle = runtime(11, "blocker", 10, 0, 0, 0);
    middle.effects.push(EffectInstance { def_name: "Defend".into(), duration: -1, applied_by_instance_id: None, applied_by_board_name: None, applied_by_index: None });
    let back = runtime(12, "blocker", 10, 0, 0, 0);

    // P2 column 0: index 0 = front, 1 = middle (Defend), 2 = back.
    let boards = boards_with(&[(2, caster)], &[(0, front), (1, middle), (2, back)]);
    let input = round_input(&boards, 1, Side::P1);
    let output = execute_round(input, quiet_options(1), &catalogs, None);

    assert_eq!(output.p2_main.tiles[0].hero().unwrap().current_health, 5, "the row in front of Defend still takes the hit");
    assert_eq!(output.p2_main.tiles[1].hero().unwrap().current_health, 10, "Defend's own row is nullified");
    assert_eq!(output.p2_main.tiles[2].hero().unwrap().current_health, 10, "rows behind Defend are nullified too");
}

#[test]
fn priority_player_rotates_on_cross_side_tie() {
    let mut catalogs = empty_catalogs();
    catalogs.register_hero(minimal_template("a", 10, 0, 0));
    catalogs.register_hero(minimal_template("b", 10, 0, 0));
    register_basic_attack(&mut catalogs);

    let a = runtime(1, "a", 10, 0, 0, 1);
    let b = runtime(2, "b", 10, 0, 0, 1);
    // Same column so each basic attack lands on the other.
    let boards = boards_with(&[(2, a)], &[(0, b)]);
    let input = round_input(&boards, 1, Side::P1);
    let output = execute_round(input, quiet_options(1), &catalogs, None);

    assert_eq!(output.priority_player, Side::P2, "the side that loses the opening tie-break wins the next one");
}

#[test]
fn frenzy_grants_bonus_energy_on_its_own_pulse_damage() {
    let mut catalogs = empty_catalogs();
    catalogs.register_hero(minimal_template("burning", 10, 0, 0));
    catalogs.register_effect(EffectDefinition {
        name: "Burn".into(),
        kind: tactics_engine::enums::EffectKind::Debuff,
        duration: -1,
        modifiers: None,
        pulse: Some(tactics_engine::model::Pulse { kind: tactics_engine::enums::PulseType::Damage, value: 3, derived_from: None }),
        trigger_on_round_start: None,
        on_damaged: None,
        on_targeted: None,
        on_cast_apply_effect_to_targets: vec![],
        on_death: None,
        on_kill: None,
        blocks_projectile_and_column: false,
        spread_effect_to_adjacent_on_pulse: false,
        heal_applier_on_pulse: false,
        execute_at_or_below_health: None,
        execute_damage: None,
    });

    let mut hero = runtime(1, "burning", 10, 0, 0, 0);
    hero.effects.push(EffectInstance { def_name: "Burn".into(), duration: -1, applied_by_instance_id: None, applied_by_board_name: None, applied_by_index: None });
    hero.effects.push(EffectInstance { def_name: "Frenzy".into(), duration: -1, applied_by_instance_id: None, applied_by_board_name: None, applied_by_index: None });

    let boards = boards_with(&[(2, hero)], &[]);
    let input = round_input(&boards, 1, Side::P1);
    let output = execute_round(input, quiet_options(1), &catalogs, None);

    let after = output.p1_main.tiles[2].hero().unwrap();
    assert_eq!(after.current_health, 7, "Burn's pulse still applies its own damage");
    assert_eq!(after.current_energy, 1, "Frenzy converts that self-damage pulse into one bonus energy");
}

#[test]
fn phoenix_revives_once_instead_of_dying() {
    let mut catalogs = empty_catalogs();
    let mut phoenix_template = minimal_template("phoenix_hero", 10, 0, 0);
    phoenix_template.augments.phoenix = true;
    catalogs.register_hero(phoenix_template);
    catalogs.register_hero(with_front_slot(minimal_template("striker", 10, 0, 0), "strike", 1, 1));
    catalogs.register_spell(damage_spell("strike", 5, TargetKind::Projectile));

    let target = runtime(1, "phoenix_hero", 5, 0, 0, 0);
    let striker = runtime(2, "striker", 10, 0, 0, 1);

    let boards = boards_with(&[(2, target)], &[(0, striker)]);
    let input = round_input(&boards, 1, Side::P1);
    let output = execute_round(input, quiet_options(1), &catalogs, None);

    let after = output.p1_main.tiles[2].hero().unwrap();
    assert!(!after.dead, "phoenix should intercept the killing blow");
    assert_eq!(after.current_health, 3, "phoenix revives at 25% of max health, rounded up");
    assert!(after.phoenix_used);
}

#[test]
fn copy_cat_repeats_the_opponents_last_cast_across_rounds() {
    let mut catalogs = empty_catalogs();
    catalogs.register_hero(with_front_slot(minimal_template("mage", 10, 0, 0), "fireball", 1, 1));
    catalogs.register_hero(minimal_template("dummy", 10, 0, 0));
    catalogs.register_hero(with_front_slot(minimal_template("copier", 10, 0, 0), "copyCat", 1, 1));
    catalogs.register_spell(damage_spell("fireball", 4, TargetKind::Projectile));
    catalogs.register_spell(SpellDefinition {
        id: "copyCat".into(),
        name: "Copy Cat".into(),
        cast_priority: 0,
        spec: SpellSpec::default(),
        animation_ms: 0,
        animation_secondary: None,
        sound: None,
        sound_volume: None,
    });

    let mage = runtime(1, "mage", 10, 0, 0, 1);
    let dummy = runtime(2, "dummy", 10, 0, 0, 0);
    let round1_boards = boards_with(&[(2, mage)], &[(0, dummy)]);
    let round1_input = round_input(&round1_boards, 1, Side::P1);
    let round1_output = execute_round(round1_input, quiet_options(1), &catalogs, None);

    assert_eq!(round1_output.p2_main.tiles[0].hero().unwrap().current_health, 6);
    let last_cast = round1_output.last_cast_action_by_side.get(&Side::P1).cloned().expect("P1 cast fireball in round 1");
    assert_eq!(last_cast.spell_id, "fireball");
    assert_eq!(last_cast.caster, TileRef::main(Side::P1, 2));

    let mut round2_boards = tactics_engine::model::BoardState {
        p1_main: round1_output.p1_main,
        p2_main: round1_output.p2_main,
        p1_reserve: round1_output.p1_reserve,
        p2_reserve: round1_output.p2_reserve,
    };
    // Copier shares the mage's column so the copied Projectile reaches it.
    round2_boards.p2_main.tiles[1] = Tile::Occupied(runtime(3, "copier", 10, 0, 0, 1));

    let mut round2_input = round_input(&round2_boards, 2, round1_output.priority_player);
    round2_input.last_cast_action_by_side = round1_output.last_cast_action_by_side;
    let round2_output = execute_round(round2_input, quiet_options(1), &catalogs, None);

    assert_eq!(round2_output.p1_main.tiles[2].hero().unwrap().current_health, 6, "Copy Cat should repeat the 4-damage fireball against the original caster");
}
