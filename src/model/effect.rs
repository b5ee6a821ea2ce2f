use crate::enums::{DerivedFrom, EffectKind, PulseType, Side};
use crate::model::spell::SpellSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectModifiers {
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub speed: i32,
    #[serde(default)]
    pub spell_power: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub kind: PulseType,
    pub value: i32,
    #[serde(default)]
    pub derived_from: Option<DerivedFrom>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OnDamagedKind {
    HealAlliesExceptSelf,
    DamageAttacker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnDamagedHandler {
    pub kind: OnDamagedKind,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OnTargetedKind {
    Damage,
    ApplyEffectToAttacker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnTargetedHandler {
    pub kind: OnTargetedKind,
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub effect: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OnDeathHandler {
    HealAlliesExceptSelf { value: i32 },
    DamageEnemiesWithSpeedAtMost { max_speed: i32, value: i32 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OnKillHandler {
    #[serde(default)]
    pub heal: Option<i32>,
    #[serde(default)]
    pub apply_effect: Option<String>,
    #[serde(default)]
    pub consume: bool,
}

/// Read-only catalog entry describing one status effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    pub name: String,
    pub kind: EffectKind,
    /// Rounds remaining; `-1` is permanent.
    pub duration: i32,
    #[serde(default)]
    pub modifiers: Option<EffectModifiers>,
    #[serde(default)]
    pub pulse: Option<Pulse>,
    #[serde(default)]
    pub trigger_on_round_start: Option<SpellSpec>,
    #[serde(default)]
    pub on_damaged: Option<OnDamagedHandler>,
    #[serde(default)]
    pub on_targeted: Option<OnTargetedHandler>,
    #[serde(default)]
    pub on_cast_apply_effect_to_targets: Vec<String>,
    #[serde(default)]
    pub on_death: Option<OnDeathHandler>,
    #[serde(default)]
    pub on_kill: Option<OnKillHandler>,
    #[serde(default)]
    pub blocks_projectile_and_column: bool,
    #[serde(default)]
    pub spread_effect_to_adjacent_on_pulse: bool,
    #[serde(default)]
    pub heal_applier_on_pulse: bool,
    #[serde(default)]
    pub execute_at_or_below_health: Option<i32>,
    #[serde(default)]
    pub execute_damage: Option<i32>,
}

/// Runtime instance of an effect living on a tile. Carries provenance so a
/// later pulse (e.g. `heal_applier_on_pulse`) can find the original caster
/// even if the applier has since moved, died, or left the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub def_name: String,
    pub duration: i32,
    pub applied_by_instance_id: Option<u64>,
    pub applied_by_board_name: Option<Side>,
    pub applied_by_index: Option<usize>,
}
