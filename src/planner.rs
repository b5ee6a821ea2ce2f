//! Auto-Cast Planner: scans Main-board tiles and enqueues deterministic
//! `QueuedCast` records based on available energy and remaining per-row
//! charges, falling back to a basic attack when no slot spell applies.

use crate::catalogs::{Catalogs, BASIC_ATTACK_SPELL_ID};
use crate::enums::Side;
use crate::geometry;
use crate::ids;
use crate::model::tile::{CastsRemaining, HeroRuntime, QueuedCast};
use crate::model::{BoardState, TileRef};

fn ensure_casts_remaining(hero: &mut HeroRuntime, catalogs: &Catalogs) {
    if hero.casts_remaining.is_some() {
        return;
    }
    let template = catalogs.hero(&hero.hero_id);
    let of = |slot: Option<&crate::model::hero::SlotSpell>| slot.map(|s| s.casts).unwrap_or(0);
    hero.casts_remaining = Some(match template {
        Some(t) => CastsRemaining { front: of(t.front.as_ref()), middle: of(t.middle.as_ref()), back: of(t.back.as_ref()) },
        None => CastsRemaining::default(),
    });
}

fn queued_count_for_slot(hero: &HeroRuntime, slot: crate::enums::RowSlot, spell_id: &str) -> u32 {
    hero.queued_casts
        .iter()
        .filter(|q| q.slot == slot && q.spell_id == spell_id && !q.tower_bonus_cast)
        .count() as u32
}

fn has_existing(hero: &HeroRuntime, spell_id: &str, slot: crate::enums::RowSlot, queued_energy: i32) -> bool {
    hero.queued_casts.iter().any(|q| q.spell_id == spell_id && q.slot == slot && q.queued_energy == queued_energy)
}

/// Run one planning pass over every alive Main-board tile of `side`.
pub fn plan(boards: &mut BoardState, side: Side, catalogs: &Catalogs) {
    let refs = boards.main_refs(side);
    for tile_ref in refs {
        plan_tile(boards, tile_ref, catalogs);
    }
}

fn plan_tile(boards: &mut BoardState, tile_ref: TileRef, catalogs: &Catalogs) {
    if !boards.is_alive(tile_ref) {
        return;
    }
    let slot = geometry::row_of(tile_ref.index, tile_ref.side);
    let Some(hero) = boards.hero_mut(tile_ref) else { return };
    ensure_casts_remaining(hero, catalogs);
    let slot_remaining = hero.casts_remaining.unwrap().get(slot);
    let hero_id = hero.hero_id.clone();
    let template = catalogs.hero(&hero_id).cloned();
    let slot_spell = template.as_ref().and_then(|t| t.slot(slot).cloned());

    let mut queued_any_this_tile = !hero.queued_casts.is_empty();

    if let Some(spec) = &slot_spell {
        if hero.current_energy > hero.last_auto_cast_energy {
            let cost = spec.cost.max(1);
            let mut cursor = hero.current_energy;
            let mut count = queued_count_for_slot(hero, slot, &spec.spell_id);
            let mut enqueued_this_pass = false;
            while cursor >= cost && count < slot_remaining {
                if !has_existing(hero, &spec.spell_id, slot, cursor) {
                    hero.queued_casts.push(QueuedCast {
                        spell_id: spec.spell_id.clone(),
                        slot,
                        queued_energy: cursor,
                        queued_cost: cost,
                        queued_id: ids::next_queued_id(),
                        caster: tile_ref,
                        tower_bonus_cast: false,
                    });
                    queued_any_this_tile = true;
                    enqueued_this_pass = true;
                }
                cursor -= cost;
                count += 1;
            }
            hero.last_auto_cast_energy = hero.current_energy;
            if enqueued_this_pass && cursor >= 1 {
                enqueue_basic_attack(hero, slot, cursor, tile_ref);
                queued_any_this_tile = true;
            }
        }
    }

    if slot_spell.is_none() || slot_remaining == 0 {
        if hero.current_energy >= 1 && !has_existing(hero, BASIC_ATTACK_SPELL_ID, slot, hero.current_energy) {
            enqueue_basic_attack(hero, slot, hero.current_energy, tile_ref);
            queued_any_this_tile = true;
        }
    }

    if !queued_any_this_tile && slot_remaining == 0 && hero.current_energy >= 1 {
        enqueue_basic_attack(hero, slot, hero.current_energy, tile_ref);
    }
}

fn enqueue_basic_attack(hero: &mut HeroRuntime, slot: crate::enums::RowSlot, queued_energy: i32, tile_ref: TileRef) {
    hero.queued_casts.push(QueuedCast {
        spell_id: BASIC_ATTACK_SPELL_ID.to_string(),
        slot,
        queued_energy,
        queued_cost: queued_energy,
        queued_id: ids::next_queued_id(),
        caster: tile_ref,
        tower_bonus_cast: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::RowSlot;
    use crate::model::hero::SlotSpell;
    use crate::model::tile::Tile;
    use crate::model::{Augments, HeroTemplate, MainBoard, ReserveBoard};

    fn boards_with_hero(hero: HeroRuntime) -> BoardState {
        let mut p1_main = MainBoard::empty();
        p1_main.tiles[2] = Tile::Occupied(hero); // P1 index 2 = Front
        BoardState { p1_main, p2_main: MainBoard::empty(), p1_reserve: ReserveBoard::empty(), p2_reserve: ReserveBoard::empty() }
    }

    #[test]
    fn falls_back_to_basic_attack_when_no_slot_spell() {
        let mut catalogs = Catalogs::new();
        catalogs.register_hero(HeroTemplate {
            id: "h".into(),
            name: "H".into(),
            base_health: 10,
            base_armor: 0,
            base_speed: 2,
            base_spell_power: 0,
            front: None,
            middle: None,
            back: None,
            passives: vec![],
            positional_modifiers: vec![],
            augments: Augments::default(),
            starting_effects: vec![],
            leaves_corpse: true,
        });
        let mut hero = HeroRuntime::new(1, "h");
        hero.current_energy = 3;
        let mut boards = boards_with_hero(hero);
        plan(&mut boards, Side::P1, &catalogs);
        let queued = &boards.hero(TileRef::main(Side::P1, 2)).unwrap().queued_casts;
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].spell_id, BASIC_ATTACK_SPELL_ID);
        assert_eq!(queued[0].queued_energy, 3);
    }

    #[test]
    fn enqueues_slot_spell_while_charges_and_energy_allow() {
        let mut catalogs = Catalogs::new();
        catalogs.register_hero(HeroTemplate {
            id: "h".into(),
            name: "H".into(),
            base_health: 10,
            base_armor: 0,
            base_speed: 2,
            base_spell_power: 0,
            front: Some(SlotSpell { spell_id: "bolt".into(), cost: 3, casts: 2 }),
            middle: None,
            back: None,
            passives: vec![],
            positional_modifiers: vec![],
            augments: Augments::default(),
            starting_effects: vec![],
            leaves_corpse: true,
        });
        let mut hero = HeroRuntime::new(1, "h");
        hero.current_energy = 6;
        let mut boards = boards_with_hero(hero);
        plan(&mut boards, Side::P1, &catalogs);
        let queued = &boards.hero(TileRef::main(Side::P1, 2)).unwrap().queued_casts;
        let bolts: Vec<_> = queued.iter().filter(|q| q.spell_id == "bolt").collect();
        assert_eq!(bolts.len(), 2);
        assert!(queued.iter().all(|q| q.slot == RowSlot::Front));
    }
}
