//! Payload Builder: turns a spell specification plus caster/target context
//! into a runtime payload the executor can apply — base values resolved,
//! dice rolled, targets resolved, per-target overrides aligned.

use crate::enums::FormulaType;
use crate::events::RollInfo;
use crate::model::{BoardState, PostHooks, SpellDefinition, TargetDescriptor, TileRef};
use crate::targeting::{self, ResolvedTarget};
use crate::{dice, error_handling::EngineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadAction {
    Damage,
    Heal,
    Energy,
    EffectOnly,
    None,
}

#[derive(Debug, Clone)]
pub struct CastPayload {
    pub caster: TileRef,
    pub spell_id: String,
    pub action: PayloadAction,
    pub base_value: i32,
    pub roll_info: Option<RollInfo>,
    pub targets: Vec<ResolvedTarget>,
    pub per_target_extras: Option<Vec<i32>>,
    pub effects: Vec<String>,
    pub post: PostHooks,
    pub copied_spell_id: Option<String>,
}

impl CastPayload {
    /// The base value for the Nth resolved target, honoring
    /// `per_target_extras` overrides when present.
    pub fn value_for(&self, index: usize) -> i32 {
        self.per_target_extras
            .as_ref()
            .and_then(|extras| extras.get(index).copied())
            .unwrap_or(self.base_value)
    }
}

fn derive_action(kind: FormulaType, has_effects: bool, has_delta_energy: bool) -> PayloadAction {
    match kind {
        FormulaType::Damage | FormulaType::AttackPower | FormulaType::Roll => PayloadAction::Damage,
        FormulaType::Heal | FormulaType::HealPower => PayloadAction::Heal,
        FormulaType::None => {
            if has_delta_energy {
                PayloadAction::Energy
            } else if has_effects {
                PayloadAction::EffectOnly
            } else {
                PayloadAction::None
            }
        }
    }
}

/// Build the runtime payload for a cast. `override_targets` lets the
/// executor force a spell's target descriptors (e.g. Cone of Cold always
/// hits `frontTwoRows enemy` regardless of its catalog entry). `copied_from`
/// lets Copy Cat rebuild another spell's payload with the current caster.
pub fn build(
    spell: &SpellDefinition,
    caster: TileRef,
    boards: &BoardState,
    bonus_damage: i32,
    override_targets: Option<&[TargetDescriptor]>,
    copied_spell_id: Option<String>,
) -> CastPayload {
    let spec = &spell.spec;
    let formula = &spec.formula;

    let spell_power_bonus = match formula.kind {
        FormulaType::Damage | FormulaType::AttackPower if !formula.ignore_spell_power => {
            boards.hero(caster).map(|h| h.current_spell_power).unwrap_or(0)
        }
        _ => 0,
    };

    let mut base_value = formula.value + bonus_damage + spell_power_bonus;
    let mut roll_info = None;
    if formula.kind == FormulaType::Roll {
        let info = dice::roll(formula.die.unwrap_or(6), base_value);
        base_value = info.total;
        roll_info = Some(info);
    }

    let descriptors = override_targets.unwrap_or(&spec.targets);
    let targets: Vec<ResolvedTarget> = descriptors
        .iter()
        .flat_map(|d| targeting::resolve(*d, caster, boards))
        .collect();

    let action = derive_action(formula.kind, !spec.effects.is_empty(), spec.post.delta_energy.is_some());

    CastPayload {
        caster,
        spell_id: spell.id.clone(),
        action,
        base_value,
        roll_info,
        targets,
        per_target_extras: spec.per_target_extras.clone(),
        effects: spec.effects.clone(),
        post: spec.post.clone(),
        copied_spell_id,
    }
}

/// `InvalidTarget` surfaces here when a payload resolves to zero targets
/// and the formula implies an effect (damage/heal/effect) rather than a
/// pure self-buff. The caller decides whether to drop the cast entirely.
pub fn validate_has_targets(payload: &CastPayload) -> Result<(), EngineError> {
    if payload.targets.is_empty() && payload.action != PayloadAction::None {
        return Err(EngineError::InvalidTarget { descriptor: "cast resolved to zero targets" });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{Side, TargetKind, TargetSide, Zone};
    use crate::model::tile::{HeroRuntime, Tile};
    use crate::model::{Formula, MainBoard, ReserveBoard, SpellSpec};

    fn sample_spell() -> SpellDefinition {
        SpellDefinition {
            id: "fireball".into(),
            name: "Fireball".into(),
            cast_priority: 0,
            spec: SpellSpec {
                formula: Formula { kind: FormulaType::Damage, value: 5, die: None, ignore_spell_power: false },
                targets: vec![TargetDescriptor { kind: TargetKind::Projectile, side: TargetSide::Enemy }],
                effects: vec![],
                post: PostHooks::default(),
                per_target_extras: None,
            },
            animation_ms: 0,
            animation_secondary: None,
            sound: None,
            sound_volume: None,
        }
    }

    #[test]
    fn damage_base_value_includes_spell_power() {
        let mut p2_main = MainBoard::empty();
        p2_main.tiles[0] = Tile::Occupied(HeroRuntime::new(1, "target"));
        let mut p1_main = MainBoard::empty();
        let mut caster = HeroRuntime::new(2, "caster");
        caster.current_spell_power = 3;
        p1_main.tiles[0] = Tile::Occupied(caster);
        let boards = BoardState { p1_main, p2_main, p1_reserve: ReserveBoard::empty(), p2_reserve: ReserveBoard::empty() };

        let spell = sample_spell();
        let payload = build(&spell, TileRef::main(Side::P1, 0), &boards, 0, None, None);
        assert_eq!(payload.base_value, 8);
        assert_eq!(payload.targets.len(), 1);
        assert_eq!(payload.targets[0].tile, TileRef { side: Side::P2, zone: Zone::Main, index: 0 });
    }
}
