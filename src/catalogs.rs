//! Static catalogs. `HEROES`/`SPELLS`/`EFFECTS` are read-only
//! data the Engine consumes but never mutates. Rather than a mutable global
//! object literal, the Rust shape threads a `&Catalogs` borrow through
//! `execute_round` — the idiomatic way to pass read-only external data
//! without `unsafe` statics.
//! A small sample catalog below exists for tests and docs; a real
//! deployment builds its own from its hero/spell/effect data files.

use crate::model::{EffectDefinition, HeroTemplate, SpellDefinition};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub heroes: HashMap<String, HeroTemplate>,
    pub spells: HashMap<String, SpellDefinition>,
    pub effects: HashMap<String, EffectDefinition>,
}

impl Catalogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hero(&self, id: &str) -> Option<&HeroTemplate> {
        self.heroes.get(id)
    }

    pub fn spell(&self, id: &str) -> Option<&SpellDefinition> {
        self.spells.get(id)
    }

    pub fn effect(&self, name: &str) -> Option<&EffectDefinition> {
        self.effects.get(name)
    }

    pub fn cast_priority(&self, spell_id: &str) -> i32 {
        self.spell(spell_id).map(|s| s.cast_priority).unwrap_or(0)
    }

    pub fn register_hero(&mut self, hero: HeroTemplate) {
        self.heroes.insert(hero.id.clone(), hero);
    }

    pub fn register_spell(&mut self, spell: SpellDefinition) {
        self.spells.insert(spell.id.clone(), spell);
    }

    pub fn register_effect(&mut self, effect: EffectDefinition) {
        self.effects.insert(effect.name.clone(), effect);
    }
}

/// The id the Auto-Cast Planner falls back to when a hero has no assigned
/// spell in its active slot, or when it spends leftover energy after a
/// slot spell.
pub const BASIC_ATTACK_SPELL_ID: &str = "basicAttack";

pub fn basic_attack_spell() -> SpellDefinition {
    use crate::enums::{FormulaType, TargetKind, TargetSide};
    use crate::model::{Formula, SpellSpec, TargetDescriptor};

    SpellDefinition {
        id: BASIC_ATTACK_SPELL_ID.to_string(),
        name: "Basic Attack".to_string(),
        cast_priority: 0,
        spec: SpellSpec {
            formula: Formula { kind: FormulaType::AttackPower, value: 0, die: None, ignore_spell_power: false },
            targets: vec![TargetDescriptor { kind: TargetKind::Projectile, side: TargetSide::Enemy }],
            effects: Vec::new(),
            post: Default::default(),
            per_target_extras: None,
        },
        animation_ms: 400,
        animation_secondary: None,
        sound: None,
        sound_volume: None,
    }
}
