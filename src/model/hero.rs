use crate::enums::RowSlot;
use serde::{Deserialize, Serialize};

/// A spell assigned to one of a hero's three row slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSpell {
    pub spell_id: String,
    pub cost: i32,
    pub casts: u32,
}

/// A stat delta applied while a hero occupies a given row (or the reserve).
/// `row = None` together with `reserve = true` is the reserve-only bonus
/// that `fixed_positional` heroes apply exactly once per battle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionalModifier {
    pub row: Option<RowSlot>,
    #[serde(default)]
    pub reserve: bool,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub speed: i32,
    #[serde(default)]
    pub spell_power: i32,
    #[serde(default)]
    pub health: i32,
}

/// Hero-template augment flags. Every flag is load-bearing
/// somewhere in the cast-resolution pipeline; none is cosmetic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Augments {
    #[serde(default)]
    pub first_strike: bool,
    #[serde(default)]
    pub warm_up: bool,
    #[serde(default)]
    pub momentum: bool,
    #[serde(default)]
    pub echo_caster: bool,
    #[serde(default)]
    pub arcane_exchange: bool,
    #[serde(default)]
    pub keen_strike: bool,
    #[serde(default)]
    pub last_stand: bool,
    #[serde(default)]
    pub executioner: bool,
    #[serde(default)]
    pub vampiric: bool,
    #[serde(default)]
    pub spell_echo: bool,
    #[serde(default)]
    pub double_strike_chance: Option<f64>,
    #[serde(default)]
    pub focused_column: bool,
    #[serde(default)]
    pub predator_pace: bool,
    #[serde(default)]
    pub frontline_vanguard: bool,
    #[serde(default)]
    pub rearguard: bool,
    #[serde(default)]
    pub attunement: bool,
    #[serde(default)]
    pub tactical_swap: bool,
    #[serde(default)]
    pub early_spark: bool,
    #[serde(default)]
    pub phoenix: bool,
    #[serde(default)]
    pub void_shield: Option<i32>,
    #[serde(default)]
    pub tower_no_health_cap: bool,
    #[serde(default)]
    pub fixed_positional: bool,
    #[serde(default)]
    pub monster: bool,
    #[serde(default)]
    pub is_boss: bool,
}

/// Read-only catalog entry. The Engine never mutates `HeroTemplate`s; it
/// only reads them when initializing or recomputing a `HeroRuntime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroTemplate {
    pub id: String,
    pub name: String,
    pub base_health: i32,
    pub base_armor: i32,
    pub base_speed: i32,
    pub base_spell_power: i32,
    pub front: Option<SlotSpell>,
    pub middle: Option<SlotSpell>,
    pub back: Option<SlotSpell>,
    /// Hidden, not rendered to the UI, but otherwise a normal effect-like
    /// record applied at initialization.
    #[serde(default)]
    pub passives: Vec<String>,
    #[serde(default)]
    pub positional_modifiers: Vec<PositionalModifier>,
    #[serde(default)]
    pub augments: Augments,
    #[serde(default)]
    pub starting_effects: Vec<String>,
    #[serde(default = "default_leaves_corpse")]
    pub leaves_corpse: bool,
}

fn default_leaves_corpse() -> bool {
    true
}

impl HeroTemplate {
    pub fn slot(&self, slot: RowSlot) -> Option<&SlotSpell> {
        match slot {
            RowSlot::Front => self.front.as_ref(),
            RowSlot::Middle => self.middle.as_ref(),
            RowSlot::Back => self.back.as_ref(),
        }
    }

    pub fn health_cap(&self) -> Option<i32> {
        if self.augments.monster || self.augments.tower_no_health_cap {
            None
        } else {
            Some(15)
        }
    }
}
