//! Shared fixture builders for round-executor scenario tests: minimal
//! `HeroTemplate`/`HeroRuntime` constructors and a `BoardState` assembler,
//! mirroring the builder-function style the model/payload unit tests use.

use std::collections::HashMap;
use tactics_engine::model::hero::SlotSpell;
use tactics_engine::model::tile::{HeroRuntime, Tile};
use tactics_engine::model::{Augments, BoardState, HeroTemplate, MainBoard, ReserveBoard, RoundInput, RoundOptions};
use tactics_engine::Catalogs;

pub fn minimal_template(id: &str, base_health: i32, base_armor: i32, base_speed: i32) -> HeroTemplate {
    HeroTemplate {
        id: id.to_string(),
        name: id.to_string(),
        base_health,
        base_armor,
        base_speed,
        base_spell_power: 0,
        front: None,
        middle: None,
        back: None,
        passives: vec![],
        positional_modifiers: vec![],
        augments: Augments::default(),
        starting_effects: vec![],
        leaves_corpse: true,
    }
}

pub fn with_front_slot(mut template: HeroTemplate, spell_id: &str, cost: i32, casts: u32) -> HeroTemplate {
    template.front = Some(SlotSpell { spell_id: spell_id.to_string(), cost, casts });
    template
}

pub fn with_augments(mut template: HeroTemplate, augments: Augments) -> HeroTemplate {
    template.augments = augments;
    template
}

/// A hero runtime already marked as initialized (`starting_effects_applied`)
/// with explicit health, so `init_runtime`'s zero-health revive branch never
/// fires on fixtures that intentionally start below max health.
pub fn runtime(instance_id: u64, hero_id: &str, health: i32, armor: i32, speed: i32, energy: i32) -> HeroRuntime {
    let mut hero = HeroRuntime::new(instance_id, hero_id);
    hero.current_health = health;
    hero.current_armor = armor;
    hero.current_speed = speed;
    hero.current_energy = energy;
    hero.starting_effects_applied = true;
    hero
}

pub fn boards_with(p1: &[(usize, HeroRuntime)], p2: &[(usize, HeroRuntime)]) -> BoardState {
    let mut p1_main = MainBoard::empty();
    for (index, hero) in p1 {
        p1_main.tiles[*index] = Tile::Occupied(hero.clone());
    }
    let mut p2_main = MainBoard::empty();
    for (index, hero) in p2 {
        p2_main.tiles[*index] = Tile::Occupied(hero.clone());
    }
    BoardState { p1_main, p2_main, p1_reserve: ReserveBoard::empty(), p2_reserve: ReserveBoard::empty() }
}

pub fn round_input(boards: &BoardState, round_number: u32, priority_player: tactics_engine::enums::Side) -> RoundInput {
    RoundInput {
        p1_main: boards.p1_main.clone(),
        p2_main: boards.p2_main.clone(),
        p1_reserve: boards.p1_reserve.clone(),
        p2_reserve: boards.p2_reserve.clone(),
        round_number,
        priority_player,
        last_cast_action_by_side: HashMap::new(),
        game_mode: "duel".to_string(),
    }
}

pub fn quiet_options(seed: u64) -> RoundOptions {
    RoundOptions { quiet: true, rng_seed: Some(seed), ..RoundOptions::default() }
}

pub fn empty_catalogs() -> Catalogs {
    Catalogs::new()
}
