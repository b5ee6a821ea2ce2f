use crate::enums::RowSlot;
use crate::model::effect::EffectInstance;
use crate::model::types::TileRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CastsRemaining {
    pub front: u32,
    pub middle: u32,
    pub back: u32,
}

impl CastsRemaining {
    pub fn get(&self, slot: RowSlot) -> u32 {
        match slot {
            RowSlot::Front => self.front,
            RowSlot::Middle => self.middle,
            RowSlot::Back => self.back,
        }
    }

    pub fn get_mut(&mut self, slot: RowSlot) -> &mut u32 {
        match slot {
            RowSlot::Front => &mut self.front,
            RowSlot::Middle => &mut self.middle,
            RowSlot::Back => &mut self.back,
        }
    }
}

/// An engine-owned pending spell resolution. `queued_id` is unique within
/// the process: a process-wide monotonic counter, never reset
/// between rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedCast {
    pub spell_id: String,
    pub slot: RowSlot,
    pub queued_energy: i32,
    pub queued_cost: i32,
    pub queued_id: u64,
    pub caster: TileRef,
    /// Set on `spell_echo`/`double_strike` re-fires; these never chain.
    pub tower_bonus_cast: bool,
}

/// Runtime state for a hero occupying a tile. Everything here is derived or
/// mutated during round execution; the immutable template lives in
/// `HeroTemplate` and is looked up by `hero_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroRuntime {
    pub instance_id: u64,
    pub hero_id: String,
    pub current_health: i32,
    pub current_armor: i32,
    pub current_speed: i32,
    pub current_energy: i32,
    pub current_spell_power: i32,
    pub effects: Vec<EffectInstance>,
    pub casts_remaining: Option<CastsRemaining>,
    pub queued_casts: Vec<QueuedCast>,
    pub dead: bool,

    // Transient per-round flags, cleared at round start.
    pub first_strike_used: bool,
    pub warm_up_used: bool,
    pub echo_caster_used: bool,
    pub momentum_gains: i32,
    pub reserve_bonus_applied: bool,
    pub last_auto_cast_energy: i32,
    pub last_reap_observed_health: i32,
    pub last_row: Option<RowSlot>,

    // Per-battle once-only trackers for survival passives and augments.
    pub undying_rage_used: bool,
    pub regeloop_uses: u32,
    pub phoenix_used: bool,
    pub starting_effects_applied: bool,
    pub predator_pace_pending: bool,
    pub echo_caster_pending: bool,
    pub fixed_positional_cached_row: Option<RowSlot>,
    pub marked: bool,
}

impl HeroRuntime {
    pub fn new(instance_id: u64, hero_id: impl Into<String>) -> Self {
        Self {
            instance_id,
            hero_id: hero_id.into(),
            current_health: 0,
            current_armor: 0,
            current_speed: 0,
            current_energy: 0,
            current_spell_power: 0,
            effects: Vec::new(),
            casts_remaining: None,
            queued_casts: Vec::new(),
            dead: false,
            first_strike_used: false,
            warm_up_used: false,
            echo_caster_used: false,
            momentum_gains: 0,
            reserve_bonus_applied: false,
            last_auto_cast_energy: -1,
            last_reap_observed_health: i32::MAX,
            last_row: None,
            undying_rage_used: false,
            regeloop_uses: 0,
            phoenix_used: false,
            starting_effects_applied: false,
            predator_pace_pending: false,
            echo_caster_pending: false,
            fixed_positional_cached_row: None,
            marked: false,
        }
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.def_name == name)
    }

    pub fn clear_energy_and_effects_on_death(&mut self) {
        self.effects.clear();
        self.queued_casts.clear();
        self.current_energy = 0;
        self.dead = true;
    }

    pub fn add_energy(&mut self, amount: i32) {
        self.current_energy = (self.current_energy + amount).max(0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Occupied(HeroRuntime),
}

impl Tile {
    pub fn hero(&self) -> Option<&HeroRuntime> {
        match self {
            Tile::Occupied(h) => Some(h),
            Tile::Empty => None,
        }
    }

    pub fn hero_mut(&mut self) -> Option<&mut HeroRuntime> {
        match self {
            Tile::Occupied(h) => Some(h),
            Tile::Empty => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, Tile::Occupied(h) if !h.dead)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }
}
