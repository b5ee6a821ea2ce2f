use crate::enums::{FormulaType, TargetKind, TargetSide};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    #[serde(rename = "type")]
    pub kind: FormulaType,
    pub value: i32,
    #[serde(default)]
    pub die: Option<u32>,
    #[serde(default)]
    pub ignore_spell_power: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub kind: TargetKind,
    #[serde(default = "default_target_side")]
    pub side: TargetSide,
}

fn default_target_side() -> TargetSide {
    TargetSide::Enemy
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectChance {
    pub effect: String,
    pub chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveTopEffectByName {
    pub name: String,
    #[serde(default)]
    pub on_removed_damage: Option<i32>,
    #[serde(default)]
    pub on_removed_heal_caster: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveTopDebuff {
    #[serde(default)]
    pub heal_if_removed: Option<i32>,
    #[serde(default)]
    pub damage_effect_applier: Option<i32>,
    #[serde(default)]
    pub apply_effect_if_removed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageCaster {
    pub amount: i32,
    #[serde(default)]
    pub as_attack_power: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorGate {
    pub min_armor: i32,
    #[serde(default)]
    pub effects: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeltaEnergyTarget {
    Target,
    Ally,
    Caster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaEnergy {
    pub amount: i32,
    #[serde(default = "default_delta_energy_target")]
    pub target: DeltaEnergyTarget,
}

fn default_delta_energy_target() -> DeltaEnergyTarget {
    DeltaEnergyTarget::Target
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapWithReserve {
    #[serde(default)]
    pub gain_energy: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveCorpse {
    #[serde(default)]
    pub heal_caster_if_removed: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revive {
    #[serde(default)]
    pub heal: Option<i32>,
    #[serde(default)]
    pub ignore_spell_power: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetaliateGate {
    pub speed: i32,
    pub amount: i32,
}

/// Every post-cast hook a spell can carry. Every field is optional; a spell
/// may combine several. `None`/`false`/empty means "not present on this spell".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostHooks {
    #[serde(default)]
    pub apply_effect_to_self: Vec<String>,
    #[serde(default)]
    pub remove_debuffs: bool,
    #[serde(default)]
    pub remove_top_debuff: Option<RemoveTopDebuff>,
    #[serde(default)]
    pub remove_top_positive_effect: bool,
    #[serde(default)]
    pub remove_top_effect_by_name: Option<RemoveTopEffectByName>,
    #[serde(default)]
    pub heal_caster_equal_to_damage: bool,
    #[serde(default)]
    pub damage_caster: Option<DamageCaster>,
    #[serde(default)]
    pub only_apply_to_with_effect: Option<String>,
    #[serde(default)]
    pub only_apply_if_has_debuff: bool,
    #[serde(default)]
    pub apply_effect_with_chance: Vec<EffectChance>,
    #[serde(default)]
    pub apply_effect_if_target_armor_at_least: Option<ArmorGate>,
    #[serde(default)]
    pub delta_energy: Option<DeltaEnergy>,
    #[serde(default)]
    pub reduce_row_casts_by: Option<u32>,
    #[serde(default)]
    pub increase_row_casts_by: Option<u32>,
    #[serde(default)]
    pub move_row_back: bool,
    #[serde(default)]
    pub move_to_frontmost_available: bool,
    #[serde(default)]
    pub move_all_back: bool,
    #[serde(default)]
    pub swap_with_reserve: Option<SwapWithReserve>,
    #[serde(default)]
    pub remove_corpse: Option<RemoveCorpse>,
    #[serde(default)]
    pub revive: Option<Revive>,
    #[serde(default)]
    pub raise_dead_to_hero_id: Option<String>,
    #[serde(default)]
    pub target_retaliates_if_speed_above: Option<RetaliateGate>,
    #[serde(default)]
    pub conditional_secondary_on_would_kill: Option<Box<SpellSpec>>,
    #[serde(default)]
    pub heal_caster_amount: Option<i32>,
    #[serde(default)]
    pub bypass_triggers: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpellSpec {
    pub formula: Formula,
    #[serde(default)]
    pub targets: Vec<TargetDescriptor>,
    /// Effect template names applied to every resolved target.
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub post: PostHooks,
    /// Per-target overrides of `base_value`, aligned to the flattened
    /// target list (e.g. Multishot's per-arrow damage).
    #[serde(default)]
    pub per_target_extras: Option<Vec<i32>>,
}

impl Default for Formula {
    fn default() -> Self {
        Formula { kind: FormulaType::None, value: 0, die: None, ignore_spell_power: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cast_priority: i32,
    pub spec: SpellSpec,
    #[serde(default)]
    pub animation_ms: u32,
    #[serde(default)]
    pub animation_secondary: Option<u32>,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub sound_volume: Option<f32>,
}
