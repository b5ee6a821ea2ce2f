//! Effect Applier: apply/stack effects on a tile, recompute derived stats,
//! decay durations at end of round.

use crate::catalogs::Catalogs;
use crate::enums::RowSlot;
use crate::error_handling::{log_recovered, EngineError};
use crate::model::tile::HeroRuntime;
use crate::model::{EffectInstance, HeroTemplate, MainBoard};

const SHACKLE: &str = "Shackle";

pub fn clamp_health(hero: &mut HeroRuntime, template: &HeroTemplate) {
    hero.current_health = hero.current_health.max(0);
    if let Some(cap) = template.health_cap() {
        hero.current_health = hero.current_health.min(cap);
    }
}

/// Apply each named effect template to `hero`, stamping applier provenance.
/// Same-named effects stack by default — no dedup, no overwrite. Returns
/// the names actually applied (for `EffectApplied` events), skipping
/// unknown names and boss immunity to `Shackle`.
pub fn apply_effects(
    hero: &mut HeroRuntime,
    names: &[String],
    applied_by_instance_id: u64,
    applied_by_board_name: crate::enums::Side,
    applied_by_index: usize,
    is_boss: bool,
    catalogs: &Catalogs,
    quiet: bool,
) -> Vec<String> {
    let mut applied = Vec::new();
    for name in names {
        let Some(def) = catalogs.effect(name) else {
            log_recovered(&EngineError::MissingCatalogEntry { kind: "effect", id: name.clone() }, quiet);
            continue;
        };
        if is_boss && def.name == SHACKLE {
            continue;
        }
        hero.effects.push(EffectInstance {
            def_name: def.name.clone(),
            duration: def.duration,
            applied_by_instance_id: Some(applied_by_instance_id),
            applied_by_board_name: Some(applied_by_board_name),
            applied_by_index: Some(applied_by_index),
        });
        applied.push(def.name.clone());
    }
    applied
}

/// Rebuild `current_armor`/`current_speed`/`current_spell_power` from the
/// template base plus every active effect's modifiers plus any positional
/// modifier for the hero's row (or reserve). `fixed_positional` heroes
/// lock onto the row they first occupied — `fixed_positional_cached_row`
/// keeps the bonus stable across later movement.
pub fn recompute_modifiers(
    hero: &mut HeroRuntime,
    template: &HeroTemplate,
    catalogs: &Catalogs,
    current_row: Option<RowSlot>,
    is_reserve: bool,
) {
    let mut armor = template.base_armor;
    let mut speed = template.base_speed;
    let mut spell_power = template.base_spell_power;

    for instance in &hero.effects {
        if let Some(def) = catalogs.effect(&instance.def_name) {
            if let Some(m) = def.modifiers {
                armor += m.armor;
                speed += m.speed;
                spell_power += m.spell_power;
            }
        }
    }

    let positional_row = if template.augments.fixed_positional {
        if hero.fixed_positional_cached_row.is_none() && !is_reserve {
            hero.fixed_positional_cached_row = current_row;
        }
        hero.fixed_positional_cached_row
    } else {
        current_row
    };

    for modifier in &template.positional_modifiers {
        let matches = if is_reserve { modifier.reserve } else { modifier.row == positional_row };
        if matches {
            armor += modifier.armor;
            speed += modifier.speed;
            spell_power += modifier.spell_power;
        }
    }

    hero.current_armor = armor;
    hero.current_speed = speed;
    hero.current_spell_power = spell_power;
}

/// End-of-round duration decay on a Main board: `-1` is permanent, every
/// other finite duration ticks down by one and is removed at zero.
pub fn decay_durations(board: &mut MainBoard) {
    for tile in &mut board.tiles {
        if let Some(hero) = tile.hero_mut() {
            hero.effects.retain_mut(|effect| {
                if effect.duration < 0 {
                    return true;
                }
                effect.duration -= 1;
                effect.duration >= 0
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{EffectKind, Side};
    use crate::model::{Augments, EffectDefinition, EffectModifiers, HeroTemplate};

    fn template() -> HeroTemplate {
        HeroTemplate {
            id: "h".into(),
            name: "H".into(),
            base_health: 10,
            base_armor: 1,
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
        }
    }

    #[test]
    fn boss_is_immune_to_shackle() {
        let mut catalogs = Catalogs::new();
        catalogs.register_effect(EffectDefinition {
            name: SHACKLE.into(),
            kind: EffectKind::Debuff,
            duration: 2,
            modifiers: None,
            pulse: None,
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
        let mut hero = HeroRuntime::new(1, "h");
        let applied = apply_effects(&mut hero, &[SHACKLE.to_string()], 99, Side::P1, 0, true, &catalogs, true);
        assert!(applied.is_empty());
        assert!(hero.effects.is_empty());
    }

    #[test]
    fn modifiers_recompute_from_base_each_time() {
        let catalogs_with_buff = {
            let mut c = Catalogs::new();
            c.register_effect(EffectDefinition {
                name: "Strength".into(),
                kind: EffectKind::Buff,
                duration: 3,
                modifiers: Some(EffectModifiers { armor: 2, speed: 0, spell_power: 0 }),
                pulse: None,
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
            c
        };
        let tmpl = template();
        let mut hero = HeroRuntime::new(1, "h");
        apply_effects(&mut hero, &["Strength".to_string()], 1, Side::P1, 0, false, &catalogs_with_buff, true);
        recompute_modifiers(&mut hero, &tmpl, &catalogs_with_buff, Some(RowSlot::Front), false);
        assert_eq!(hero.current_armor, 3);
        hero.effects.clear();
        recompute_modifiers(&mut hero, &tmpl, &catalogs_with_buff, Some(RowSlot::Front), false);
        assert_eq!(hero.current_armor, 1);
    }
}
