//! Reaction/Trigger Engine: collects `onDamaged`, `onTargeted`, `onCast`,
//! `onKill`, and `onDeath` responses and deduplicates them by a stable key
//! before the executor applies and emits them.

use crate::catalogs::Catalogs;
use crate::model::{BoardState, OnDamagedKind, OnTargetedKind, TileRef};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Reaction {
    pub key: String,
    pub source_effect: String,
    pub owner: TileRef,
    pub target: TileRef,
    pub amount: i32,
    pub is_heal: bool,
    pub apply_effect: Option<String>,
}

/// `onDamaged` reactions triggered on `owner` after it takes `damage > 0`:
/// heal-all-allies-except-self (Prayer-style), or retaliate at the
/// attacker.
pub fn collect_on_damaged(owner: TileRef, attacker: Option<TileRef>, damage: i32, boards: &BoardState, catalogs: &Catalogs) -> Vec<Reaction> {
    let mut out = Vec::new();
    if damage <= 0 {
        return out;
    }
    let Some(hero) = boards.hero(owner) else { return out };
    for instance in &hero.effects {
        let Some(def) = catalogs.effect(&instance.def_name) else { continue };
        let Some(handler) = &def.on_damaged else { continue };
        match handler.kind {
            OnDamagedKind::HealAlliesExceptSelf => {
                for ally in boards.alive_main(owner.side) {
                    if ally == owner {
                        continue;
                    }
                    out.push(Reaction {
                        key: format!("on_damaged:heal_allies:{}:{:?}:{}", def.name, owner, ally.index),
                        source_effect: def.name.clone(),
                        owner,
                        target: ally,
                        amount: handler.value,
                        is_heal: true,
                        apply_effect: None,
                    });
                }
            }
            OnDamagedKind::DamageAttacker => {
                if let Some(attacker) = attacker {
                    out.push(Reaction {
                        key: format!("on_damaged:retaliate:{}:{:?}", def.name, owner),
                        source_effect: def.name.clone(),
                        owner,
                        target: attacker,
                        amount: handler.value,
                        is_heal: false,
                        apply_effect: None,
                    });
                }
            }
        }
    }
    out
}

/// `onTargeted` reactions on a tile when it is selected as a cast target,
/// before the payload applies.
pub fn collect_on_targeted(target: TileRef, attacker: TileRef, boards: &BoardState, catalogs: &Catalogs) -> Vec<Reaction> {
    let mut out = Vec::new();
    let Some(hero) = boards.hero(target) else { return out };
    for instance in &hero.effects {
        let Some(def) = catalogs.effect(&instance.def_name) else { continue };
        let Some(handler) = &def.on_targeted else { continue };
        match handler.kind {
            OnTargetedKind::Damage => out.push(Reaction {
                key: format!("on_targeted:damage:{}:{:?}", def.name, target),
                source_effect: def.name.clone(),
                owner: target,
                target: attacker,
                amount: handler.value,
                is_heal: false,
                apply_effect: None,
            }),
            OnTargetedKind::ApplyEffectToAttacker => out.push(Reaction {
                key: format!("on_targeted:apply_effect:{}:{:?}", def.name, target),
                source_effect: def.name.clone(),
                owner: target,
                target: attacker,
                amount: 0,
                is_heal: false,
                apply_effect: handler.effect.clone(),
            }),
        }
    }
    out
}

/// `onCastApplyEffectToTargets`: active buffs on the caster that apply an
/// extra effect to every target of the current cast.
pub fn collect_on_cast(caster: TileRef, targets: &[TileRef], boards: &BoardState, catalogs: &Catalogs) -> Vec<(TileRef, String)> {
    let mut out = Vec::new();
    let Some(hero) = boards.hero(caster) else { return out };
    for instance in &hero.effects {
        let Some(def) = catalogs.effect(&instance.def_name) else { continue };
        for effect_name in &def.on_cast_apply_effect_to_targets {
            for &target in targets {
                out.push((target, effect_name.clone()));
            }
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct DeathReaction {
    pub target: TileRef,
    pub amount: i32,
    pub is_heal: bool,
}

/// `onDeath` reactions fired when `victim` dies: heal the victim's allies,
/// or splash damage enemies at or below a speed threshold.
pub fn collect_on_death(victim: TileRef, boards: &BoardState, catalogs: &Catalogs) -> Vec<DeathReaction> {
    let mut out = Vec::new();
    let Some(hero) = boards.hero(victim) else { return out };
    for instance in &hero.effects {
        let Some(def) = catalogs.effect(&instance.def_name) else { continue };
        let Some(handler) = &def.on_death else { continue };
        match handler {
            crate::model::OnDeathHandler::HealAlliesExceptSelf { value } => {
                for ally in boards.alive_main(victim.side) {
                    if ally == victim {
                        continue;
                    }
                    out.push(DeathReaction { target: ally, amount: *value, is_heal: true });
                }
            }
            crate::model::OnDeathHandler::DamageEnemiesWithSpeedAtMost { max_speed, value } => {
                for enemy in boards.alive_main(victim.side.opponent()) {
                    if boards.hero(enemy).map(|h| h.current_speed <= *max_speed).unwrap_or(false) {
                        out.push(DeathReaction { target: enemy, amount: *value, is_heal: false });
                    }
                }
            }
        }
    }
    out
}

/// Remove reactions already seen by stable key, preserving enqueue order.
pub fn dedupe(reactions: Vec<Reaction>) -> Vec<Reaction> {
    let mut seen = HashSet::new();
    reactions.into_iter().filter(|r| seen.insert(r.key.clone())).collect()
}
