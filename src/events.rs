//! The observable event stream. `execute_round` emits these, in
//! order, through an optional `on_step` callback; the final event is always
//! `RoundComplete` or `GameEnd`.

use crate::enums::{EventAction, EventPhase, RowSlot, Side, Winner};
use crate::model::TileRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollInfo {
    pub die: u32,
    pub base: i32,
    pub roll: i32,
    pub total: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CastResult {
    pub target: TileRef,
    pub action: EventAction,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    EffectPulse {
        target: TileRef,
        effect_name: String,
        action: EventAction,
        amount: i32,
        phase: EventPhase,
        effect_index: Option<usize>,
        reaction_index: Option<usize>,
        owner_board_name: Option<Side>,
        owner_index: Option<usize>,
    },
    EnergyIncrement {
        target: TileRef,
        amount: i32,
        effect_name: Option<String>,
    },
    EffectPreCast {
        target: TileRef,
        effect_name: String,
        amount: i32,
        scale: f64,
        reaction_index: Option<usize>,
        owner_board_name: Option<Side>,
        owner_index: Option<usize>,
    },
    EffectApplied {
        target: TileRef,
        effect_name: String,
    },
    PreCast {
        caster: TileRef,
        spell_id: String,
    },
    Cast {
        caster: TileRef,
        spell_id: String,
        results: Vec<CastResult>,
        roll_info: Option<RollInfo>,
        animation_ms: Option<u32>,
        secondary_animation: bool,
        secondary_animation_ms: Option<u32>,
        secondary_targets: Vec<TileRef>,
        copied_spell_id: Option<String>,
    },
    PostCastWait {
        duration: u32,
    },
    PostEffectDelay {
        duration: u32,
    },
    OnRoundStartTriggered {
        effect_name: String,
        source: TileRef,
    },
    PulsesApplied,
    ReactionsApplied,
    CastApplied,
    DeathApplied,
    PreDeath {
        target: TileRef,
    },
    MoveRowBack {
        target: TileRef,
        from: RowSlot,
        to: RowSlot,
    },
    MoveAllBack {
        side: Side,
    },
    MoveToFrontmostAvailable {
        target: TileRef,
        to_index: usize,
    },
    SwapWithReserve {
        a: TileRef,
        b: TileRef,
    },
    ReduceRowCasts {
        board: Side,
        index: usize,
        slot: RowSlot,
        before: u32,
        after: u32,
    },
    IncreaseRowCasts {
        board: Side,
        index: usize,
        slot: RowSlot,
        before: u32,
        after: u32,
    },
    BountyActivated {
        killer: TileRef,
        victim: TileRef,
        heal: i32,
        applied_effect: String,
    },
    RoundComplete {
        winner: Option<Winner>,
    },
    GameEnd {
        winner: Winner,
    },
}

/// The callback signature `RoundOptions`-adjacent callers supply to observe
/// the stream. Kept as a trait object rather than a generic so
/// `execute_round`'s signature stays a plain function.
pub type StepSink<'a> = dyn FnMut(&crate::model::BoardState, &Event) + 'a;

/// Emits an event to the optional sink and, unless `quiet`, logs a concise
/// line through the `log` facade.
pub(crate) fn emit(
    sink: &mut Option<&mut StepSink<'_>>,
    boards: &crate::model::BoardState,
    quiet: bool,
    event: Event,
) {
    if !quiet {
        log::debug!("{:?}", event);
    }
    if let Some(cb) = sink.as_mut() {
        cb(boards, &event);
    }
}
