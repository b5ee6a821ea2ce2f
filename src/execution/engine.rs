//! Round Executor: drives start-of-round pulses, energy accrual, auto-cast
//! enqueue, ordered cast resolution, duration decay, and winner detection.
//! This is the authoring backbone; every other component is invoked from
//! here.

use crate::catalogs::Catalogs;
use crate::effects;
use crate::enums::{DerivedFrom, EventAction, EventPhase, PulseType, RowSlot, Side, Winner, Zone};
use crate::error_handling::{log_recovered, EngineError};
use crate::events::{self, CastResult, Event, StepSink};
use crate::ids;
use crate::model::tile::{HeroRuntime, QueuedCast};
use crate::model::{
    BoardState, CastAction, HeroTemplate, RoundInput, RoundOptions, RoundOutput, SpellDefinition, SpellSpec,
    TargetDescriptor, TileRef,
};
use crate::orderer;
use crate::payload::{self, CastPayload, PayloadAction};
use crate::planner;
use crate::reactions;
use crate::rng;
use crate::targeting::ResolvedTarget;

const EXECUTE_DAMAGE_DEFAULT: i32 = 999;
const REAP_THRESHOLD: i32 = 2;
const ACCEPT_CONTRACT_THRESHOLD: i32 = 4;

pub fn execute_round(
    input: RoundInput,
    options: RoundOptions,
    catalogs: &Catalogs,
    mut sink: Option<&mut StepSink<'_>>,
) -> RoundOutput {
    rng::seed_rng(options.rng_seed.unwrap_or_else(|| rng::default_seed(input.round_number, 0)));

    let mut boards = BoardState::from_input(&input);
    let mut priority_player = input.priority_player;
    let mut last_cast_action_by_side = input.last_cast_action_by_side.clone();
    let round_number = input.round_number;
    let quiet = options.quiet;

    init_runtime(&mut boards, catalogs, &mut sink, quiet, round_number);
    clear_queued_casts(&mut boards);
    run_start_of_round_pulses(&mut boards, catalogs, &mut sink, quiet, round_number);
    run_on_round_start_triggers(&mut boards, catalogs, &mut sink, quiet, round_number);
    events::emit(&mut sink, &boards, quiet, Event::PostEffectDelay { duration: options.post_effect_delay_ms });
    run_energy_increment(&mut boards, catalogs, &mut sink, quiet);
    run_reap_check(&mut boards, catalogs, &mut sink, quiet);
    run_generic_execute_check(&mut boards, catalogs, &mut sink, quiet);

    planner::plan(&mut boards, Side::P1, catalogs);
    planner::plan(&mut boards, Side::P2, catalogs);

    let mut pending = collect_pending(&boards);
    let mut processed_ids = std::collections::HashSet::new();
    let mut winner = None;

    while winner.is_none() {
        let Some(cast) = orderer::pop_next(&mut pending, catalogs, &mut priority_player) else { break };
        processed_ids.insert(cast.queued_id);
        remove_from_hero_queue(&mut boards, cast.queued_id);

        winner = resolve_one_cast(
            &mut boards,
            catalogs,
            &mut sink,
            quiet,
            options.post_cast_delay_ms,
            round_number,
            cast,
            &mut last_cast_action_by_side,
        );

        if winner.is_none() {
            planner::plan(&mut boards, Side::P1, catalogs);
            planner::plan(&mut boards, Side::P2, catalogs);
            for fresh in collect_pending(&boards) {
                if !processed_ids.contains(&fresh.queued_id) && !pending.iter().any(|p| p.queued_id == fresh.queued_id) {
                    pending.push(fresh);
                }
            }
        } else if let Some(w) = winner {
            events::emit(&mut sink, &boards, quiet, Event::GameEnd { winner: w });
        }
    }

    effects::decay_durations(&mut boards.p1_main);
    effects::decay_durations(&mut boards.p2_main);
    recompute_all(&mut boards, catalogs);

    let winner = winner.or_else(|| evaluate_winner_mid_round(&boards));
    events::emit(&mut sink, &boards, quiet, Event::RoundComplete { winner });

    boards.into_output(priority_player, winner, last_cast_action_by_side)
}

fn recompute_all(boards: &mut BoardState, catalogs: &Catalogs) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            recompute_one(boards, catalogs, tile_ref);
        }
    }
}

fn recompute_one(boards: &mut BoardState, catalogs: &Catalogs, tile_ref: TileRef) {
    let is_reserve = tile_ref.zone == Zone::Reserve;
    let row = if is_reserve { None } else { Some(crate::geometry::row_of(tile_ref.index, tile_ref.side)) };
    let Some(hero) = boards.hero(tile_ref) else { return };
    let Some(template) = catalogs.hero(&hero.hero_id).cloned() else { return };
    if let Some(hero) = boards.hero_mut(tile_ref) {
        effects::recompute_modifiers(hero, &template, catalogs, row, is_reserve);
        if let Some(row) = row {
            frontline_bonus(hero, &template, row);
        }
    }
}

/// `frontline_vanguard` / `rearguard`: a flat positional bonus tied to the
/// hero's current row rather than a once-per-battle trigger, so it tracks
/// row changes automatically without extra state.
fn frontline_bonus(hero: &mut HeroRuntime, template: &HeroTemplate, row: RowSlot) {
    if template.augments.frontline_vanguard && row == RowSlot::Front {
        hero.current_armor += 2;
    }
    if template.augments.rearguard && row == RowSlot::Back {
        hero.current_speed += 1;
    }
}

fn init_runtime(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool, round_number: u32) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side).into_iter().chain(boards.reserve_refs(side)) {
            let row = if tile_ref.zone == Zone::Main { Some(crate::geometry::row_of(tile_ref.index, side)) } else { None };
            let is_reserve = tile_ref.zone == Zone::Reserve;
            let Some(hero) = boards.hero(tile_ref) else { continue };
            let hero_id = hero.hero_id.clone();
            let Some(template) = catalogs.hero(&hero_id).cloned() else { continue };
            let instance_id = hero.instance_id;

            if round_number == 1 {
                if let Some(hero) = boards.hero_mut(tile_ref) {
                    hero.first_strike_used = false;
                }
            }

            if let Some(hero) = boards.hero_mut(tile_ref) {
                if hero.current_health == 0 && !hero.dead {
                    hero.current_health = template.base_health;
                    hero.current_energy = hero.current_energy.max(0);
                    hero.last_reap_observed_health = hero.current_health;
                }
                if hero.echo_caster_pending {
                    if let Some(slot) = hero.last_row {
                        if let Some(cr) = hero.casts_remaining.as_mut() {
                            *cr.get_mut(slot) += 1;
                        }
                    }
                    hero.echo_caster_pending = false;
                }
                if !is_reserve {
                    hero.last_row = row;
                }
            }

            if !boards.hero(tile_ref).map(|h| h.starting_effects_applied).unwrap_or(true) {
                let names = template.starting_effects.clone();
                apply_effects_and_emit(boards, catalogs, sink, quiet, tile_ref, &names, instance_id, side, tile_ref.index, template.augments.is_boss);
                if let Some(hero) = boards.hero_mut(tile_ref) {
                    hero.starting_effects_applied = true;
                }
            }
            if boards.hero(tile_ref).map(|h| h.predator_pace_pending).unwrap_or(false) {
                apply_effects_and_emit(
                    boards,
                    catalogs,
                    sink,
                    quiet,
                    tile_ref,
                    &["Predator's Pace".to_string()],
                    instance_id,
                    side,
                    tile_ref.index,
                    template.augments.is_boss,
                );
                if let Some(hero) = boards.hero_mut(tile_ref) {
                    hero.predator_pace_pending = false;
                }
            }

            recompute_one(boards, catalogs, tile_ref);
        }
    }
}

/// Applies named effects to `target` and emits `EffectApplied` for each
/// name the catalog actually recognizes, using `effects::apply_effects`'s
/// applied-names return to drive the event.
#[allow(clippy::too_many_arguments)]
fn apply_effects_and_emit(
    boards: &mut BoardState,
    catalogs: &Catalogs,
    sink: &mut Option<&mut StepSink<'_>>,
    quiet: bool,
    target: TileRef,
    names: &[String],
    applied_by_instance_id: u64,
    applied_by_board_name: Side,
    applied_by_index: usize,
    is_boss: bool,
) {
    let applied = match boards.hero_mut(target) {
        Some(hero) => effects::apply_effects(hero, names, applied_by_instance_id, applied_by_board_name, applied_by_index, is_boss, catalogs, quiet),
        None => Vec::new(),
    };
    for name in applied {
        events::emit(sink, boards, quiet, Event::EffectApplied { target, effect_name: name });
    }
}

fn clear_queued_casts(boards: &mut BoardState) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            if let Some(hero) = boards.hero_mut(tile_ref) {
                hero.queued_casts.clear();
            }
        }
    }
}

fn run_start_of_round_pulses(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool, round_number: u32) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            if !boards.is_alive(tile_ref) {
                continue;
            }
            let effect_names: Vec<String> = boards.hero(tile_ref).map(|h| h.effects.iter().map(|e| e.def_name.clone()).collect()).unwrap_or_default();
            for name in effect_names {
                let Some(def) = catalogs.effect(&name).cloned() else { continue };
                let Some(pulse) = def.pulse else { continue };
                let Some(hero) = boards.hero(tile_ref) else { continue };
                let raw = match pulse.derived_from {
                    Some(DerivedFrom::Armor) => hero.current_armor,
                    Some(DerivedFrom::RoundNumber) => round_number as i32,
                    None => pulse.value,
                };
                let action = match pulse.kind {
                    PulseType::Damage => EventAction::Damage,
                    PulseType::Heal => EventAction::Heal,
                };
                events::emit(
                    sink,
                    boards,
                    quiet,
                    Event::EffectPulse {
                        target: tile_ref,
                        effect_name: def.name.clone(),
                        action,
                        amount: raw,
                        phase: EventPhase::Primary,
                        effect_index: None,
                        reaction_index: None,
                        owner_board_name: None,
                        owner_index: None,
                    },
                );

                let applied = match pulse.kind {
                    PulseType::Damage => apply_damage_raw(boards, catalogs, tile_ref, raw),
                    PulseType::Heal => {
                        apply_heal(boards, catalogs, tile_ref, raw);
                        raw
                    }
                };

                if pulse.kind == PulseType::Damage && applied > 0 {
                    if def.heal_applier_on_pulse {
                        if let Some(applier) = resolve_applier_ref(boards, tile_ref, &name) {
                            apply_heal(boards, catalogs, applier, applied);
                        }
                    }
                    if def.spread_effect_to_adjacent_on_pulse {
                        for adj in crate::geometry::adjacent_indices(tile_ref.index) {
                            let adj_ref = TileRef::main(side, adj);
                            if boards.is_alive(adj_ref) {
                                apply_effects_and_emit(boards, catalogs, sink, quiet, adj_ref, &[name.clone()], 0, side, adj, false);
                            }
                        }
                    }
                    let pulse_reactions = reactions::dedupe(reactions::collect_on_damaged(tile_ref, None, applied, boards, catalogs));
                    if !pulse_reactions.is_empty() {
                        for reaction in &pulse_reactions {
                            apply_reaction(boards, catalogs, sink, quiet, reaction);
                        }
                        events::emit(sink, boards, quiet, Event::ReactionsApplied);
                    }
                    if boards.hero(tile_ref).map(|h| h.has_effect("Frenzy")).unwrap_or(false) {
                        events::emit(sink, boards, quiet, Event::EnergyIncrement { target: tile_ref, amount: 1, effect_name: Some("Frenzy".into()) });
                        if let Some(hero) = boards.hero_mut(tile_ref) {
                            hero.add_energy(1);
                        }
                    }
                }
            }
        }
    }
    process_deaths(boards, catalogs, sink, quiet, None);
    events::emit(sink, boards, quiet, Event::PulsesApplied);
}

fn run_on_round_start_triggers(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool, round_number: u32) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            if !boards.is_alive(tile_ref) {
                continue;
            }
            let effect_names: Vec<String> = boards.hero(tile_ref).map(|h| h.effects.iter().map(|e| e.def_name.clone()).collect()).unwrap_or_default();
            for name in effect_names {
                let Some(def) = catalogs.effect(&name).cloned() else { continue };
                let Some(spec) = def.trigger_on_round_start.clone() else { continue };
                let synthetic = synthetic_spell(format!("onRoundStart:{name}"), spec);
                let payload = payload::build(&synthetic, tile_ref, boards, 0, None, None);
                let caster_template = boards.hero(tile_ref).and_then(|h| catalogs.hero(&h.hero_id)).cloned();
                let is_basic = false;
                apply_cast_payload(boards, catalogs, sink, quiet, &payload, &caster_template, tile_ref, round_number, is_basic);
                events::emit(sink, boards, quiet, Event::OnRoundStartTriggered { effect_name: name, source: tile_ref });
            }
        }
    }
    process_deaths(boards, catalogs, sink, quiet, None);
}

fn synthetic_spell(id: String, spec: SpellSpec) -> SpellDefinition {
    SpellDefinition { id, name: String::new(), cast_priority: 0, spec, animation_ms: 0, animation_secondary: None, sound: None, sound_volume: None }
}

fn run_energy_increment(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            if !boards.is_alive(tile_ref) {
                continue;
            }
            let Some(hero) = boards.hero(tile_ref) else { continue };
            let speed = hero.current_speed;
            let before = hero.current_energy;
            events::emit(sink, boards, quiet, Event::EnergyIncrement { target: tile_ref, amount: speed, effect_name: None });
            if let Some(hero) = boards.hero_mut(tile_ref) {
                hero.add_energy(speed);
            }
            let after = boards.hero(tile_ref).map(|h| h.current_energy).unwrap_or(before);

            if before <= ACCEPT_CONTRACT_THRESHOLD && after > ACCEPT_CONTRACT_THRESHOLD {
                let enemy_has_contract = boards
                    .alive_main(side.opponent())
                    .iter()
                    .filter_map(|t| boards.hero(*t))
                    .filter_map(|h| catalogs.hero(&h.hero_id))
                    .any(|t| t.passives.iter().any(|p| p == "Accept Contract"));
                if enemy_has_contract {
                    let instance_id = boards.hero(tile_ref).filter(|h| !h.marked).map(|h| h.instance_id);
                    if let Some(instance_id) = instance_id {
                        if let Some(hero) = boards.hero_mut(tile_ref) {
                            hero.marked = true;
                        }
                        apply_effects_and_emit(boards, catalogs, sink, quiet, tile_ref, &["Marked".to_string()], instance_id, side, tile_ref.index, false);
                    }
                }
            }
        }
    }
}

fn run_reap_check(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            if !boards.is_alive(tile_ref) {
                continue;
            }
            let (prev, current) = match boards.hero(tile_ref) {
                Some(h) => (h.last_reap_observed_health, h.current_health),
                None => continue,
            };
            if prev > REAP_THRESHOLD && current <= REAP_THRESHOLD {
                let enemy_has_reap = boards
                    .alive_main(side.opponent())
                    .iter()
                    .filter_map(|t| boards.hero(*t))
                    .filter_map(|h| catalogs.hero(&h.hero_id))
                    .any(|t| t.passives.iter().any(|p| p == "Reap"));
                if enemy_has_reap {
                    apply_damage_raw(boards, catalogs, tile_ref, EXECUTE_DAMAGE_DEFAULT);
                }
            }
            if let Some(hero) = boards.hero_mut(tile_ref) {
                hero.last_reap_observed_health = hero.current_health;
            }
        }
    }
    process_deaths(boards, catalogs, sink, quiet, None);
}

/// Generic low-health execute: any active effect carrying
/// `execute_at_or_below_health` fires `execute_damage` (or the shared
/// execute-damage default) the instant its owner's health is at or below
/// that threshold, independent of the named "Reap" passive above.
fn run_generic_execute_check(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            if !boards.is_alive(tile_ref) {
                continue;
            }
            let Some(hero) = boards.hero(tile_ref) else { continue };
            let current_health = hero.current_health;
            let trigger = hero.effects.iter().find_map(|instance| {
                let def = catalogs.effect(&instance.def_name)?;
                let threshold = def.execute_at_or_below_health?;
                (current_health <= threshold).then(|| def.execute_damage.unwrap_or(EXECUTE_DAMAGE_DEFAULT))
            });
            if let Some(damage) = trigger {
                apply_damage_raw(boards, catalogs, tile_ref, damage);
            }
        }
    }
    process_deaths(boards, catalogs, sink, quiet, None);
}

fn collect_pending(boards: &BoardState) -> Vec<QueuedCast> {
    let mut out = Vec::new();
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            if let Some(hero) = boards.hero(tile_ref) {
                out.extend(hero.queued_casts.iter().cloned());
            }
        }
    }
    out
}

fn remove_from_hero_queue(boards: &mut BoardState, queued_id: u64) {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            if let Some(hero) = boards.hero_mut(tile_ref) {
                hero.queued_casts.retain(|q| q.queued_id != queued_id);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_one_cast(
    boards: &mut BoardState,
    catalogs: &Catalogs,
    sink: &mut Option<&mut StepSink<'_>>,
    quiet: bool,
    post_cast_delay_ms: u32,
    round_number: u32,
    cast: QueuedCast,
    last_cast_action_by_side: &mut std::collections::HashMap<Side, CastAction>,
) -> Option<Winner> {
    if !boards.is_alive(cast.caster) {
        return None;
    }
    let energy = boards.hero(cast.caster).map(|h| h.current_energy).unwrap_or(0);
    if energy < cast.queued_cost {
        log_recovered(&EngineError::InsufficientEnergy { caster: format!("{:?}", cast.caster), needed: cast.queued_cost, have: energy }, quiet);
        return None;
    }

    events::emit(sink, boards, quiet, Event::PreCast { caster: cast.caster, spell_id: cast.spell_id.clone() });

    let Some(spell) = catalogs.spell(&cast.spell_id).cloned() else {
        log_recovered(&EngineError::MissingCatalogEntry { kind: "spell", id: cast.spell_id.clone() }, quiet);
        return None;
    };

    let (mut payload, copied) = build_special_cased(&spell, cast.caster, boards, catalogs, last_cast_action_by_side);
    if let Err(err) = payload::validate_has_targets(&payload) {
        log_recovered(&err, quiet);
        return None;
    }
    apply_defend_interception(boards, catalogs, &mut payload);

    let hero_id = boards.hero(cast.caster).map(|h| h.hero_id.clone());
    let caster_template = hero_id.and_then(|id| catalogs.hero(&id).cloned());
    let is_basic = cast.spell_id == crate::catalogs::BASIC_ATTACK_SPELL_ID;

    let results = apply_cast_payload(boards, catalogs, sink, quiet, &payload, &caster_template, cast.caster, round_number, is_basic);

    events::emit(
        sink,
        boards,
        quiet,
        Event::Cast {
            caster: cast.caster,
            spell_id: cast.spell_id.clone(),
            results,
            roll_info: payload.roll_info,
            animation_ms: Some(spell.animation_ms),
            secondary_animation: spell.animation_secondary.is_some(),
            secondary_animation_ms: spell.animation_secondary,
            secondary_targets: payload.targets.iter().filter(|t| t.phase == EventPhase::Secondary).map(|t| t.tile).collect(),
            copied_spell_id: copied.clone(),
        },
    );

    apply_post_hooks(boards, catalogs, sink, quiet, &payload, cast.caster, &spell);

    if !is_basic && !cast.tower_bonus_cast {
        if let Some(hero) = boards.hero_mut(cast.caster) {
            let remaining = hero.casts_remaining.get_or_insert_with(Default::default).get_mut(cast.slot);
            *remaining = remaining.saturating_sub(1);
        }
    }

    let mut cost = cast.queued_cost;
    if let Some(t) = &caster_template {
        if t.augments.focused_column && payload.targets.iter().any(|r| r.kind == crate::enums::TargetKind::Column) {
            cost = cost.saturating_sub(1).max(1);
        }
    }
    if let Some(hero) = boards.hero_mut(cast.caster) {
        hero.current_energy = (hero.current_energy - cost).max(0);
    }

    if let Some(t) = &caster_template {
        maybe_enqueue_bonus_cast(boards, t, &cast);
    }

    events::emit(sink, boards, quiet, Event::PostCastWait { duration: post_cast_delay_ms });

    let winner = process_deaths(boards, catalogs, sink, quiet, Some(cast.caster));

    events::emit(sink, boards, quiet, Event::CastApplied);
    last_cast_action_by_side.insert(cast.caster.side, CastAction { spell_id: cast.spell_id, caster: cast.caster });

    winner
}

fn build_special_cased(
    spell: &SpellDefinition,
    caster: TileRef,
    boards: &BoardState,
    catalogs: &Catalogs,
    last_cast_action_by_side: &std::collections::HashMap<Side, CastAction>,
) -> (CastPayload, Option<String>) {
    if spell.id == "coneOfCold" {
        let overrides = [TargetDescriptor { kind: crate::enums::TargetKind::FrontTwoRows, side: crate::enums::TargetSide::Enemy }];
        return (payload::build(spell, caster, boards, 0, Some(&overrides), None), None);
    }
    if spell.id == "copyCat" {
        if let Some(action) = last_cast_action_by_side.get(&caster.side.opponent()) {
            if let Some(copied_spell) = catalogs.spell(&action.spell_id) {
                return (payload::build(copied_spell, caster, boards, 0, None, Some(copied_spell.id.clone())), Some(copied_spell.id.clone()));
            }
        }
        return (payload::build(spell, caster, boards, 0, None, None), None);
    }
    (payload::build(spell, caster, boards, 0, None, None), None)
}

/// Intercepts `Projectile`/`ProjectilePlus1`/`Column` casts against any hero
/// carrying an effect whose catalog entry sets `blocks_projectile_and_column`
/// — not a hardcoded "Defend" name, so any number of distinct block-style
/// effects can exist without touching this function.
fn apply_defend_interception(boards: &BoardState, catalogs: &Catalogs, payload: &mut CastPayload) {
    use crate::enums::TargetKind;
    let blocks = |t: TileRef| {
        boards
            .hero(t)
            .map(|h| h.effects.iter().any(|inst| catalogs.effect(&inst.def_name).map(|d| d.blocks_projectile_and_column).unwrap_or(false)))
            .unwrap_or(false)
    };

    if payload.targets.iter().any(|t| t.kind == TargetKind::Projectile) {
        if payload.targets.iter().any(|t| blocks(t.tile)) {
            payload.targets.clear();
        }
        return;
    }

    if payload.targets.iter().any(|t| t.kind == TargetKind::ProjectilePlus1) {
        let primary_blocked = payload.targets.iter().find(|t| t.phase == EventPhase::Primary).map(|t| blocks(t.tile)).unwrap_or(false);
        if primary_blocked {
            payload.targets.clear();
        } else {
            payload.targets.retain(|t| !(t.phase == EventPhase::Secondary && blocks(t.tile)));
        }
        return;
    }

    if payload.targets.iter().any(|t| t.kind == TargetKind::Column) {
        let mut blocked_at_or_behind: Option<(Side, usize, RowSlot)> = None;
        for t in &payload.targets {
            if blocks(t.tile) {
                let row = crate::geometry::row_of(t.tile.index, t.tile.side);
                let col = crate::geometry::column_of(t.tile.index, t.tile.side);
                blocked_at_or_behind = Some((t.tile.side, col, row));
                break;
            }
        }
        if let Some((side, col, block_row)) = blocked_at_or_behind {
            payload.targets.retain(|t| {
                if t.tile.side != side || crate::geometry::column_of(t.tile.index, t.tile.side) != col {
                    return true;
                }
                row_ordinal(crate::geometry::row_of(t.tile.index, t.tile.side)) < row_ordinal(block_row)
            });
        }
    }
}

fn row_ordinal(row: RowSlot) -> u8 {
    match row {
        RowSlot::Front => 0,
        RowSlot::Middle => 1,
        RowSlot::Back => 2,
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_cast_payload(
    boards: &mut BoardState,
    catalogs: &Catalogs,
    sink: &mut Option<&mut StepSink<'_>>,
    quiet: bool,
    payload: &CastPayload,
    caster_template: &Option<HeroTemplate>,
    caster: TileRef,
    round_number: u32,
    is_basic: bool,
) -> Vec<CastResult> {
    let mut results = Vec::new();

    if !payload.post.bypass_triggers {
        for target in &payload.targets {
            let targeted_reactions = reactions::dedupe(reactions::collect_on_targeted(target.tile, caster, boards, catalogs));
            if !targeted_reactions.is_empty() {
                for reaction in &targeted_reactions {
                    apply_reaction(boards, catalogs, sink, quiet, reaction);
                }
                events::emit(sink, boards, quiet, Event::ReactionsApplied);
            }
        }
        let target_tiles: Vec<TileRef> = payload.targets.iter().map(|t| t.tile).collect();
        for (target, effect_name) in reactions::collect_on_cast(caster, &target_tiles, boards, catalogs) {
            apply_effects_and_emit(boards, catalogs, sink, quiet, target, &[effect_name], caster.index as u64, caster.side, caster.index, false);
        }
    }

    for (index, target) in payload.targets.iter().enumerate() {
        if !boards.is_alive(target.tile) && payload.action != PayloadAction::None {
            continue;
        }
        let base = payload.value_for(index);
        match payload.action {
            PayloadAction::Damage => {
                let raw = compute_damage(boards, catalogs, caster, target.tile, caster_template, base, &payload.spell_id, round_number, is_basic);
                events::emit(
                    sink,
                    boards,
                    quiet,
                    Event::EffectPulse {
                        target: target.tile,
                        effect_name: payload.spell_id.clone(),
                        action: EventAction::Damage,
                        amount: raw,
                        phase: target.phase,
                        effect_index: None,
                        reaction_index: None,
                        owner_board_name: None,
                        owner_index: None,
                    },
                );
                let applied = apply_damage_raw(boards, catalogs, target.tile, raw);
                results.push(CastResult { target: target.tile, action: EventAction::Damage, amount: applied });
                if applied > 0 {
                    let damage_reactions = reactions::dedupe(reactions::collect_on_damaged(target.tile, Some(caster), applied, boards, catalogs));
                    if !damage_reactions.is_empty() {
                        for reaction in &damage_reactions {
                            apply_reaction(boards, catalogs, sink, quiet, reaction);
                        }
                        events::emit(sink, boards, quiet, Event::ReactionsApplied);
                    }
                    if let Some(gate) = &payload.post.target_retaliates_if_speed_above {
                        let target_speed = boards.hero(target.tile).map(|h| h.current_speed).unwrap_or(0);
                        if target_speed > gate.speed {
                            let reduced = {
                                let armor = boards.hero(caster).map(|h| h.current_armor).unwrap_or(0);
                                (gate.amount - armor).max(0)
                            };
                            apply_damage_raw(boards, catalogs, caster, reduced);
                        }
                    }
                }
                if let Some(heal_amount) = &payload.post.heal_caster_amount {
                    apply_heal(boards, catalogs, caster, *heal_amount);
                }
                if payload.post.heal_caster_equal_to_damage {
                    apply_heal(boards, catalogs, caster, applied);
                }
                if let Some(dc) = &payload.post.damage_caster {
                    apply_damage_raw(boards, catalogs, caster, dc.amount);
                }
            }
            PayloadAction::Heal => {
                events::emit(
                    sink,
                    boards,
                    quiet,
                    Event::EffectPulse {
                        target: target.tile,
                        effect_name: payload.spell_id.clone(),
                        action: EventAction::Heal,
                        amount: base,
                        phase: target.phase,
                        effect_index: None,
                        reaction_index: None,
                        owner_board_name: None,
                        owner_index: None,
                    },
                );
                apply_heal(boards, catalogs, target.tile, base);
                results.push(CastResult { target: target.tile, action: EventAction::Heal, amount: base });
            }
            PayloadAction::Energy => {
                if let Some(delta) = &payload.post.delta_energy {
                    apply_delta_energy(boards, caster, target.tile, delta.amount, delta.target);
                    results.push(CastResult { target: target.tile, action: EventAction::Energy, amount: delta.amount });
                }
            }
            PayloadAction::EffectOnly | PayloadAction::None => {}
        }

        if !payload.effects.is_empty() {
            let caster_instance = boards.hero(caster).map(|h| h.instance_id).unwrap_or(0);
            apply_effects_and_emit(boards, catalogs, sink, quiet, target.tile, &payload.effects, caster_instance, caster.side, caster.index, false);
        }
    }

    if !payload.post.apply_effect_to_self.is_empty() {
        let names = payload.post.apply_effect_to_self.clone();
        let instance_id = boards.hero(caster).map(|h| h.instance_id).unwrap_or(0);
        apply_effects_and_emit(boards, catalogs, sink, quiet, caster, &names, instance_id, caster.side, caster.index, false);
    }

    results
}

#[allow(clippy::too_many_arguments)]
fn compute_damage(
    boards: &mut BoardState,
    catalogs: &Catalogs,
    caster: TileRef,
    target: TileRef,
    caster_template: &Option<HeroTemplate>,
    base: i32,
    _spell_id: &str,
    round_number: u32,
    is_basic: bool,
) -> i32 {
    let mut raw = base as f64;

    if let Some(template) = caster_template {
        if is_basic && template.augments.keen_strike {
            raw += 2.0;
        }
        if template.augments.arcane_exchange {
            raw += 2.0;
        }
        if template.augments.early_spark && round_number == 1 {
            raw += 1.0;
        }
        let caster_hp = boards.hero(caster).map(|h| h.current_health).unwrap_or(0);
        if template.augments.last_stand && caster_hp * 4 <= template.base_health {
            raw += 3.0;
        }
        if template.augments.first_strike {
            if let Some(hero) = boards.hero_mut(caster) {
                if !hero.first_strike_used {
                    raw *= 1.5;
                    hero.first_strike_used = true;
                }
            }
        }
        if template.augments.executioner && !is_basic {
            let target_hp = boards.hero(target).map(|h| h.current_health).unwrap_or(0);
            let target_cap = boards
                .hero(target)
                .map(|h| h.hero_id.clone())
                .and_then(|id| catalogs.hero(&id))
                .and_then(|t| t.health_cap())
                .unwrap_or(15);
            if target_hp * 2 <= target_cap {
                raw *= 1.5;
            }
        }
    }

    let target_armor = boards.hero(target).map(|h| h.current_armor).unwrap_or(0);
    let mut effective = (raw.round() as i32 - target_armor).max(0);

    let target_template = boards.hero(target).map(|h| h.hero_id.clone()).and_then(|id| catalogs.hero(&id));
    if let Some(shield) = target_template.and_then(|t| t.augments.void_shield) {
        effective = (effective - shield).max(0);
    }

    effective
}

fn apply_damage_raw(boards: &mut BoardState, catalogs: &Catalogs, target: TileRef, amount: i32) -> i32 {
    if amount <= 0 || !boards.is_alive(target) {
        return 0;
    }

    let (redirect_amount, redirect_target) = if boards.hero(target).map(|h| h.has_effect("Soul Link")).unwrap_or(false) {
        let ally = boards
            .alive_main(target.side)
            .into_iter()
            .filter(|t| *t != target)
            .min_by_key(|t| boards.hero(*t).map(|h| h.current_health).unwrap_or(i32::MAX));
        (amount / 2, ally)
    } else {
        (0, None)
    };

    let direct = amount - redirect_amount;
    let hero_id = boards.hero(target).map(|h| h.hero_id.clone());
    let template = hero_id.and_then(|id| catalogs.hero(&id).cloned());
    if let Some(hero) = boards.hero_mut(target) {
        hero.current_health -= direct;
        if let Some(t) = &template {
            effects::clamp_health(hero, t);
        } else {
            hero.current_health = hero.current_health.max(0);
        }
    }

    if let (Some(redirect_target), true) = (redirect_target, redirect_amount > 0) {
        apply_damage_raw(boards, catalogs, redirect_target, redirect_amount);
    }

    direct.max(0)
}

fn apply_heal(boards: &mut BoardState, catalogs: &Catalogs, target: TileRef, amount: i32) {
    if amount <= 0 || !boards.is_alive(target) {
        return;
    }
    let hero_id = boards.hero(target).map(|h| h.hero_id.clone());
    let template = hero_id.and_then(|id| catalogs.hero(&id).cloned());
    if let Some(hero) = boards.hero_mut(target) {
        hero.current_health += amount;
        if let Some(t) = &template {
            effects::clamp_health(hero, t);
        }
    }
}

fn apply_delta_energy(boards: &mut BoardState, caster: TileRef, target: TileRef, amount: i32, kind: crate::model::DeltaEnergyTarget) {
    use crate::model::DeltaEnergyTarget;
    let recipient = match kind {
        DeltaEnergyTarget::Target => target,
        DeltaEnergyTarget::Caster => caster,
        DeltaEnergyTarget::Ally => target,
    };
    if let Some(hero) = boards.hero_mut(recipient) {
        hero.add_energy(amount);
    }
}

fn resolve_applier_ref(boards: &BoardState, tile: TileRef, effect_name: &str) -> Option<TileRef> {
    let instance = boards.hero(tile)?.effects.iter().find(|e| e.def_name == effect_name)?;
    let side = instance.applied_by_board_name?;
    let index = instance.applied_by_index?;
    let candidate = TileRef::main(side, index);
    if boards.is_alive(candidate) && boards.hero(candidate).map(|h| Some(h.instance_id) == instance.applied_by_instance_id).unwrap_or(false) {
        Some(candidate)
    } else {
        None
    }
}

/// Applies one collected reaction, pre-flashing `EffectPreCast` before the
/// mutation and following up with `EffectPulse` (damage/heal) or
/// `EffectApplied` (status effect), matching the event shape every other
/// mutation site in this module uses.
fn apply_reaction(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool, reaction: &reactions::Reaction) {
    events::emit(
        sink,
        boards,
        quiet,
        Event::EffectPreCast {
            target: reaction.target,
            effect_name: reaction.source_effect.clone(),
            amount: reaction.amount,
            scale: 1.0,
            reaction_index: None,
            owner_board_name: Some(reaction.owner.side),
            owner_index: Some(reaction.owner.index),
        },
    );

    if let Some(name) = &reaction.apply_effect {
        apply_effects_and_emit(boards, catalogs, sink, quiet, reaction.target, &[name.clone()], 0, reaction.owner.side, reaction.owner.index, false);
        return;
    }

    events::emit(
        sink,
        boards,
        quiet,
        Event::EffectPulse {
            target: reaction.target,
            effect_name: reaction.source_effect.clone(),
            action: if reaction.is_heal { EventAction::Heal } else { EventAction::Damage },
            amount: reaction.amount,
            phase: EventPhase::Primary,
            effect_index: None,
            reaction_index: None,
            owner_board_name: Some(reaction.owner.side),
            owner_index: Some(reaction.owner.index),
        },
    );

    if reaction.is_heal {
        apply_heal(boards, catalogs, reaction.target, reaction.amount);
    } else {
        apply_damage_raw(boards, catalogs, reaction.target, reaction.amount);
    }
}

fn apply_post_hooks(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool, payload: &CastPayload, caster: TileRef, _spell: &SpellDefinition) {
    let post = &payload.post;

    for target in &payload.targets {
        if post.remove_debuffs {
            if let Some(hero) = boards.hero_mut(target.tile) {
                hero.effects.retain(|e| catalogs.effect(&e.def_name).map(|d| d.kind != crate::enums::EffectKind::Debuff).unwrap_or(true));
            }
        }
        if let Some(cfg) = &post.remove_top_debuff {
            let removed = boards.hero_mut(target.tile).is_some_and(|hero| {
                match hero.effects.iter().rposition(|e| catalogs.effect(&e.def_name).map(|d| d.kind == crate::enums::EffectKind::Debuff).unwrap_or(false)) {
                    Some(pos) => {
                        hero.effects.remove(pos);
                        true
                    }
                    None => false,
                }
            });
            if removed {
                if let Some(heal) = cfg.heal_if_removed {
                    apply_heal(boards, catalogs, target.tile, heal);
                }
                if let Some(dmg) = cfg.damage_effect_applier {
                    apply_damage_raw(boards, catalogs, caster, dmg);
                }
                if let Some(name) = &cfg.apply_effect_if_removed {
                    apply_effects_and_emit(boards, catalogs, sink, quiet, target.tile, &[name.clone()], 0, caster.side, caster.index, false);
                }
            }
        }
        if post.remove_top_positive_effect {
            if let Some(hero) = boards.hero_mut(target.tile) {
                if let Some(pos) = hero.effects.iter().rposition(|e| catalogs.effect(&e.def_name).map(|d| d.kind == crate::enums::EffectKind::Buff).unwrap_or(false)) {
                    hero.effects.remove(pos);
                }
            }
        }
        if let Some(cfg) = &post.remove_top_effect_by_name {
            let removed = boards.hero_mut(target.tile).is_some_and(|hero| {
                match hero.effects.iter().rposition(|e| e.def_name == cfg.name) {
                    Some(pos) => {
                        hero.effects.remove(pos);
                        true
                    }
                    None => false,
                }
            });
            if removed {
                if let Some(dmg) = cfg.on_removed_damage {
                    apply_damage_raw(boards, catalogs, target.tile, dmg);
                }
                if let Some(heal) = cfg.on_removed_heal_caster {
                    apply_heal(boards, catalogs, caster, heal);
                }
            }
        }
    }

    if let Some(cfg) = &post.apply_effect_if_target_armor_at_least {
        for target in &payload.targets {
            let armor = boards.hero(target.tile).map(|h| h.current_armor).unwrap_or(0);
            if armor >= cfg.min_armor {
                apply_effects_and_emit(boards, catalogs, sink, quiet, target.tile, &cfg.effects, 0, caster.side, caster.index, false);
            }
        }
    }

    if !post.apply_effect_with_chance.is_empty() {
        for target in &payload.targets {
            for chance in &post.apply_effect_with_chance {
                if rng::roll_chance(chance.chance) {
                    apply_effects_and_emit(boards, catalogs, sink, quiet, target.tile, &[chance.effect.clone()], 0, caster.side, caster.index, false);
                }
            }
        }
    }

    if let Some(n) = post.reduce_row_casts_by {
        adjust_row_casts(boards, &payload.targets, -(n as i32), sink, quiet);
    }
    if let Some(n) = post.increase_row_casts_by {
        adjust_row_casts(boards, &payload.targets, n as i32, sink, quiet);
    }

    if post.move_row_back {
        for target in &payload.targets {
            move_row_back(boards, target.tile, sink, quiet);
        }
    }
    if post.move_to_frontmost_available {
        for target in &payload.targets {
            move_to_frontmost_available(boards, target.tile, sink, quiet);
        }
    }
    if post.move_all_back {
        if let Some(target) = payload.targets.first() {
            move_all_back(boards, target.tile.side, sink, quiet);
        }
    }
    if let Some(cfg) = &post.swap_with_reserve {
        if let Some(reserve_tile) = boards.alive_reserve(caster.side).first().copied() {
            swap_tiles(boards, caster, reserve_tile, sink, quiet);
            if let Some(gain) = cfg.gain_energy {
                if let Some(hero) = boards.hero_mut(reserve_tile) {
                    hero.add_energy(gain);
                }
            }
        }
    }
    if let Some(cfg) = &post.remove_corpse {
        for target in &payload.targets {
            if matches!(boards.tile(target.tile), crate::model::tile::Tile::Occupied(h) if h.dead) {
                *boards.tile_mut(target.tile) = crate::model::tile::Tile::Empty;
                if let Some(heal) = cfg.heal_caster_if_removed {
                    apply_heal(boards, catalogs, caster, heal);
                }
            }
        }
    }
    if let Some(cfg) = &post.revive {
        for target in &payload.targets {
            if matches!(boards.tile(target.tile), crate::model::tile::Tile::Occupied(h) if h.dead) {
                if let Some(hero) = boards.hero_mut(target.tile) {
                    hero.dead = false;
                    hero.current_health = cfg.heal.unwrap_or(1).max(1);
                }
            }
        }
    }
    if let Some(hero_id) = &post.raise_dead_to_hero_id {
        for target in &payload.targets {
            if boards.tile(target.tile).is_empty() {
                let instance_id = ids::next_queued_id();
                *boards.tile_mut(target.tile) = crate::model::tile::Tile::Occupied(HeroRuntime::new(instance_id, hero_id.clone()));
                recompute_one(boards, catalogs, target.tile);
            }
        }
    }
    if let Some(spec) = &post.conditional_secondary_on_would_kill {
        for target in &payload.targets {
            if boards.hero(target.tile).map(|h| h.current_health <= 0).unwrap_or(false) {
                let synthetic = synthetic_spell("conditionalSecondary".to_string(), (**spec).clone());
                let secondary_payload = payload::build(&synthetic, caster, boards, 0, None, None);
                let caster_template = boards.hero(caster).and_then(|h| catalogs.hero(&h.hero_id)).cloned();
                apply_cast_payload(boards, catalogs, sink, quiet, &secondary_payload, &caster_template, caster, 1, false);
            }
        }
    }
}

fn adjust_row_casts(boards: &mut BoardState, targets: &[ResolvedTarget], delta: i32, sink: &mut Option<&mut StepSink<'_>>, quiet: bool) {
    for target in targets {
        let side = target.tile.side;
        let row = crate::geometry::row_of(target.tile.index, side);
        for tile_ref in boards.main_refs(side) {
            if crate::geometry::row_of(tile_ref.index, side) != row {
                continue;
            }
            let change = boards.hero_mut(tile_ref).and_then(|hero| {
                hero.casts_remaining.as_mut().map(|cr| {
                    let before = cr.get(row);
                    let after = (before as i32 + delta).max(0) as u32;
                    *cr.get_mut(row) = after;
                    (before, after)
                })
            });
            if let Some((before, after)) = change {
                let event = if delta < 0 {
                    Event::ReduceRowCasts { board: side, index: tile_ref.index, slot: row, before, after }
                } else {
                    Event::IncreaseRowCasts { board: side, index: tile_ref.index, slot: row, before, after }
                };
                events::emit(sink, boards, quiet, event);
            }
        }
    }
}

fn move_row_back(boards: &mut BoardState, target: TileRef, sink: &mut Option<&mut StepSink<'_>>, quiet: bool) {
    let side = target.side;
    let from = crate::geometry::row_of(target.index, side);
    let Some(to) = from.step_back() else { return };
    let col = crate::geometry::column_of(target.index, side);
    let dest_indices = crate::geometry::column_indices(col, side);
    let dest_index = dest_indices.into_iter().find(|&i| crate::geometry::row_of(i, side) == to).unwrap();
    let dest = TileRef::main(side, dest_index);
    if boards.tile(dest).is_empty() {
        swap_tiles(boards, target, dest, sink, quiet);
        events::emit(sink, boards, quiet, Event::MoveRowBack { target, from, to });
        remap_queued_casts_to_row(boards, dest, to);
    } else if to.step_back().is_some() {
        move_row_back(boards, dest, sink, quiet);
        if boards.tile(dest).is_empty() {
            swap_tiles(boards, target, dest, sink, quiet);
            events::emit(sink, boards, quiet, Event::MoveRowBack { target, from, to });
            remap_queued_casts_to_row(boards, dest, to);
        }
    }
}

fn remap_queued_casts_to_row(boards: &mut BoardState, tile_ref: TileRef, row: RowSlot) {
    if let Some(hero) = boards.hero_mut(tile_ref) {
        for queued in &mut hero.queued_casts {
            queued.slot = row;
            queued.caster = tile_ref;
        }
    }
}

fn move_to_frontmost_available(boards: &mut BoardState, target: TileRef, sink: &mut Option<&mut StepSink<'_>>, quiet: bool) {
    let side = target.side;
    let col = crate::geometry::column_of(target.index, side);
    for idx in crate::geometry::column_indices(col, side) {
        if idx == target.index {
            break;
        }
        let dest = TileRef::main(side, idx);
        if boards.tile(dest).is_empty() {
            swap_tiles(boards, target, dest, sink, quiet);
            events::emit(sink, boards, quiet, Event::MoveToFrontmostAvailable { target, to_index: idx });
            remap_queued_casts_to_row(boards, dest, crate::geometry::row_of(idx, side));
            return;
        }
    }
}

fn move_all_back(boards: &mut BoardState, side: Side, sink: &mut Option<&mut StepSink<'_>>, quiet: bool) {
    for col in 0..3 {
        let indices = crate::geometry::column_indices(col, side);
        let occupied: Vec<TileRef> = indices.iter().map(|&i| TileRef::main(side, i)).filter(|t| !boards.tile(*t).is_empty()).collect();
        let back_first: Vec<usize> = {
            let mut v = indices.to_vec();
            v.sort_by_key(|&i| std::cmp::Reverse(row_ordinal(crate::geometry::row_of(i, side))));
            v
        };
        for (slot_pos, hero_tile) in back_first.into_iter().zip(occupied) {
            let dest = TileRef::main(side, slot_pos);
            if dest != hero_tile {
                swap_tiles(boards, hero_tile, dest, sink, quiet);
            }
        }
    }
    events::emit(sink, boards, quiet, Event::MoveAllBack { side });
}

fn swap_tiles(boards: &mut BoardState, a: TileRef, b: TileRef, sink: &mut Option<&mut StepSink<'_>>, quiet: bool) {
    let tile_a = boards.tile(a).clone();
    let tile_b = boards.tile(b).clone();
    *boards.tile_mut(a) = tile_b;
    *boards.tile_mut(b) = tile_a;
    events::emit(sink, boards, quiet, Event::SwapWithReserve { a, b });
}

#[allow(clippy::too_many_arguments)]
fn maybe_enqueue_bonus_cast(boards: &mut BoardState, template: &HeroTemplate, cast: &QueuedCast) {
    if cast.tower_bonus_cast {
        return;
    }
    let should_echo = template.augments.spell_echo;
    let should_double = template.augments.double_strike_chance.map(rng::roll_chance).unwrap_or(false);
    if !should_echo && !should_double {
        return;
    }
    if let Some(hero) = boards.hero_mut(cast.caster) {
        hero.queued_casts.push(QueuedCast {
            spell_id: cast.spell_id.clone(),
            slot: cast.slot,
            queued_energy: cast.queued_energy,
            queued_cost: cast.queued_cost,
            queued_id: ids::next_queued_id(),
            caster: cast.caster,
            tower_bonus_cast: true,
        });
    }
}

fn process_deaths(boards: &mut BoardState, catalogs: &Catalogs, sink: &mut Option<&mut StepSink<'_>>, quiet: bool, killer: Option<TileRef>) -> Option<Winner> {
    for side in [Side::P1, Side::P2] {
        for tile_ref in boards.main_refs(side) {
            let Some(hero) = boards.hero(tile_ref) else { continue };
            if hero.dead || hero.current_health > 0 {
                continue;
            }
            let hero_id = hero.hero_id.clone();
            let Some(template) = catalogs.hero(&hero_id).cloned() else { continue };

            if !hero.undying_rage_used && template.passives.iter().any(|p| p == "Undying Rage") {
                if let Some(hero) = boards.hero_mut(tile_ref) {
                    hero.current_health = 1;
                    hero.undying_rage_used = true;
                }
                continue;
            }
            if hero.regeloop_uses < 3 && template.passives.iter().any(|p| p == "Regeloop") {
                if let Some(hero) = boards.hero_mut(tile_ref) {
                    hero.current_health = 4;
                    hero.regeloop_uses += 1;
                    hero.effects.retain(|e| catalogs.effect(&e.def_name).map(|d| d.kind == crate::enums::EffectKind::Neutral).unwrap_or(true));
                }
                continue;
            }
            if !hero.phoenix_used && template.augments.phoenix {
                if let Some(hero) = boards.hero_mut(tile_ref) {
                    hero.current_health = ((template.base_health as f64) * 0.25).ceil().max(1.0) as i32;
                    hero.phoenix_used = true;
                }
                continue;
            }

            events::emit(sink, boards, quiet, Event::PreDeath { target: tile_ref });
            let death_reactions = reactions::collect_on_death(tile_ref, boards, catalogs);
            if let Some(hero) = boards.hero_mut(tile_ref) {
                hero.clear_energy_and_effects_on_death();
            }
            if !template.leaves_corpse {
                *boards.tile_mut(tile_ref) = crate::model::tile::Tile::Empty;
            }
            for reaction in death_reactions {
                if reaction.is_heal {
                    apply_heal(boards, catalogs, reaction.target, reaction.amount);
                } else {
                    apply_damage_raw(boards, catalogs, reaction.target, reaction.amount);
                }
            }
            events::emit(sink, boards, quiet, Event::DeathApplied);

            if let Some(killer_tile) = killer {
                if boards.is_alive(killer_tile) {
                    let killer_hero_id = boards.hero(killer_tile).map(|h| h.hero_id.clone());
                    let killer_template = killer_hero_id.and_then(|id| catalogs.hero(&id).cloned());
                    if let Some(kt) = &killer_template {
                        if kt.passives.iter().any(|p| p == "Bounty") {
                            apply_heal(boards, catalogs, killer_tile, 2);
                            let instance_id = boards.hero(killer_tile).map(|h| h.instance_id).unwrap_or(0);
                            apply_effects_and_emit(boards, catalogs, sink, quiet, killer_tile, &["Strength".to_string()], instance_id, killer_tile.side, killer_tile.index, false);
                            events::emit(
                                sink,
                                boards,
                                quiet,
                                Event::BountyActivated { killer: killer_tile, victim: tile_ref, heal: 2, applied_effect: "Strength".to_string() },
                            );
                        }
                        if kt.augments.predator_pace {
                            if let Some(hero) = boards.hero_mut(killer_tile) {
                                hero.predator_pace_pending = true;
                            }
                        }
                        let on_kill = boards
                            .hero(killer_tile)
                            .into_iter()
                            .flat_map(|h| h.effects.iter())
                            .filter_map(|e| catalogs.effect(&e.def_name))
                            .filter_map(|d| d.on_kill.clone())
                            .collect::<Vec<_>>();
                        for handler in on_kill {
                            if let Some(heal) = handler.heal {
                                apply_heal(boards, catalogs, killer_tile, heal);
                            }
                            if let Some(name) = &handler.apply_effect {
                                let instance_id = boards.hero(killer_tile).map(|h| h.instance_id).unwrap_or(0);
                                apply_effects_and_emit(boards, catalogs, sink, quiet, killer_tile, &[name.clone()], instance_id, killer_tile.side, killer_tile.index, false);
                            }
                        }
                    }
                }
            }
        }
    }

    evaluate_winner_mid_round(boards)
}

fn evaluate_winner_mid_round(boards: &BoardState) -> Option<Winner> {
    let p1_alive = boards.side_has_alive_main(Side::P1);
    let p2_alive = boards.side_has_alive_main(Side::P2);
    match (p1_alive, p2_alive) {
        (true, true) => None,
        (true, false) => Some(Winner::Player1),
        (false, true) => Some(Winner::Player2),
        (false, false) => Some(Winner::Draw),
    }
}
