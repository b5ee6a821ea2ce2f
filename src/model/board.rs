use crate::enums::{Side, Winner};
use crate::model::tile::Tile;
use crate::model::types::TileRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainBoard {
    pub tiles: [Tile; 9],
}

impl MainBoard {
    pub fn empty() -> Self {
        Self { tiles: std::array::from_fn(|_| Tile::Empty) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveBoard {
    pub tiles: [Tile; 2],
}

impl ReserveBoard {
    pub fn empty() -> Self {
        Self { tiles: std::array::from_fn(|_| Tile::Empty) }
    }
}

/// Minimal record of the last cast by a side, kept across rounds so
/// `copyCat` can rebuild an enemy's most recent spell against the copier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastAction {
    pub spell_id: String,
    pub caster: TileRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundInput {
    pub p1_main: MainBoard,
    pub p2_main: MainBoard,
    pub p1_reserve: ReserveBoard,
    pub p2_reserve: ReserveBoard,
    pub round_number: u32,
    pub priority_player: Side,
    #[serde(default)]
    pub last_cast_action_by_side: HashMap<Side, CastAction>,
    #[serde(default = "default_game_mode")]
    pub game_mode: String,
}

fn default_game_mode() -> String {
    "duel".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOptions {
    #[serde(default = "default_cast_delay")]
    pub cast_delay_ms: u32,
    #[serde(default)]
    pub post_effect_delay_ms: u32,
    #[serde(default = "default_reaction_delay")]
    pub reaction_delay_ms: u32,
    #[serde(default = "default_post_cast_delay")]
    pub post_cast_delay_ms: u32,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_cast_delay() -> u32 {
    700
}
fn default_reaction_delay() -> u32 {
    1000
}
fn default_post_cast_delay() -> u32 {
    500
}

impl Default for RoundOptions {
    fn default() -> Self {
        Self {
            cast_delay_ms: default_cast_delay(),
            post_effect_delay_ms: 0,
            reaction_delay_ms: default_reaction_delay(),
            post_cast_delay_ms: default_post_cast_delay(),
            quiet: false,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutput {
    pub p1_main: MainBoard,
    pub p2_main: MainBoard,
    pub p1_reserve: ReserveBoard,
    pub p2_reserve: ReserveBoard,
    pub priority_player: Side,
    pub winner: Option<Winner>,
    pub last_cast_action_by_side: HashMap<Side, CastAction>,
}

/// The mutable board state the round executor operates on. Cloning this
/// (via `#[derive(Clone)]` on every component down to `EffectInstance`)
/// deep-copies effect arrays for free — the value-type representation
/// carries no aliasing between independent clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub p1_main: MainBoard,
    pub p2_main: MainBoard,
    pub p1_reserve: ReserveBoard,
    pub p2_reserve: ReserveBoard,
}

impl BoardState {
    pub fn from_input(input: &RoundInput) -> Self {
        Self {
            p1_main: input.p1_main.clone(),
            p2_main: input.p2_main.clone(),
            p1_reserve: input.p1_reserve.clone(),
            p2_reserve: input.p2_reserve.clone(),
        }
    }

    pub fn main(&self, side: Side) -> &MainBoard {
        match side {
            Side::P1 => &self.p1_main,
            Side::P2 => &self.p2_main,
        }
    }

    pub fn main_mut(&mut self, side: Side) -> &mut MainBoard {
        match side {
            Side::P1 => &mut self.p1_main,
            Side::P2 => &mut self.p2_main,
        }
    }

    pub fn reserve(&self, side: Side) -> &ReserveBoard {
        match side {
            Side::P1 => &self.p1_reserve,
            Side::P2 => &self.p2_reserve,
        }
    }

    pub fn reserve_mut(&mut self, side: Side) -> &mut ReserveBoard {
        match side {
            Side::P1 => &mut self.p1_reserve,
            Side::P2 => &mut self.p2_reserve,
        }
    }

    pub fn tile(&self, r: TileRef) -> &Tile {
        match r.zone {
            crate::enums::Zone::Main => &self.main(r.side).tiles[r.index],
            crate::enums::Zone::Reserve => &self.reserve(r.side).tiles[r.index],
        }
    }

    pub fn tile_mut(&mut self, r: TileRef) -> &mut Tile {
        match r.zone {
            crate::enums::Zone::Main => &mut self.main_mut(r.side).tiles[r.index],
            crate::enums::Zone::Reserve => &mut self.reserve_mut(r.side).tiles[r.index],
        }
    }

    pub fn hero(&self, r: TileRef) -> Option<&crate::model::tile::HeroRuntime> {
        self.tile(r).hero()
    }

    pub fn hero_mut(&mut self, r: TileRef) -> Option<&mut crate::model::tile::HeroRuntime> {
        self.tile_mut(r).hero_mut()
    }

    pub fn is_alive(&self, r: TileRef) -> bool {
        self.tile(r).is_alive()
    }

    pub fn main_refs(&self, side: Side) -> [TileRef; 9] {
        std::array::from_fn(|i| TileRef::main(side, i))
    }

    pub fn reserve_refs(&self, side: Side) -> [TileRef; 2] {
        std::array::from_fn(|i| TileRef::reserve(side, i))
    }

    pub fn alive_main(&self, side: Side) -> Vec<TileRef> {
        self.main_refs(side).into_iter().filter(|r| self.is_alive(*r)).collect()
    }

    pub fn alive_reserve(&self, side: Side) -> Vec<TileRef> {
        self.reserve_refs(side).into_iter().filter(|r| self.is_alive(*r)).collect()
    }

    pub fn alive_all(&self, side: Side) -> Vec<TileRef> {
        let mut v = self.alive_main(side);
        v.extend(self.alive_reserve(side));
        v
    }

    pub fn side_has_alive_main(&self, side: Side) -> bool {
        self.main_refs(side).into_iter().any(|r| self.is_alive(r))
    }

    pub fn into_output(
        self,
        priority_player: Side,
        winner: Option<Winner>,
        last_cast_action_by_side: HashMap<Side, CastAction>,
    ) -> RoundOutput {
        RoundOutput {
            p1_main: self.p1_main,
            p2_main: self.p2_main,
            p1_reserve: self.p1_reserve,
            p2_reserve: self.p2_reserve,
            priority_player,
            winner,
            last_cast_action_by_side,
        }
    }
}
