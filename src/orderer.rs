//! Cast Orderer: sorts queued casts by (tier, energy, fixed book order,
//! rotating priority-player tie-break) and pops them one at a time.

use crate::catalogs::Catalogs;
use crate::enums::Side;
use crate::model::tile::QueuedCast;

const P1_BOOK_ORDER: [usize; 9] = [2, 5, 8, 1, 4, 7, 0, 3, 6];
const P2_BOOK_ORDER: [usize; 9] = [6, 3, 0, 7, 4, 1, 8, 5, 2];

fn book_index(side: Side, index: usize) -> usize {
    let order = match side {
        Side::P1 => &P1_BOOK_ORDER,
        Side::P2 => &P2_BOOK_ORDER,
    };
    order.iter().position(|&i| i == index).unwrap_or(order.len())
}

/// Pop the next cast to resolve, advancing `priority_player` on a
/// cross-side tie. Returns `None` once `pending` is empty.
pub fn pop_next(pending: &mut Vec<QueuedCast>, catalogs: &Catalogs, priority_player: &mut Side) -> Option<QueuedCast> {
    if pending.is_empty() {
        return None;
    }

    let max_tier = pending.iter().map(|c| catalogs.cast_priority(&c.spell_id)).max().unwrap();
    let tier_indices: Vec<usize> =
        (0..pending.len()).filter(|&i| catalogs.cast_priority(&pending[i].spell_id) == max_tier).collect();

    let max_energy = tier_indices.iter().map(|&i| pending[i].queued_energy).max().unwrap();
    let mut candidates: Vec<usize> = tier_indices.into_iter().filter(|&i| pending[i].queued_energy == max_energy).collect();

    candidates.sort_by_key(|&i| (book_index(pending[i].caster.side, pending[i].caster.index), pending[i].queued_id));

    let winner_side = {
        let has_priority_side = candidates.iter().any(|&i| pending[i].caster.side == *priority_player);
        if has_priority_side { *priority_player } else { priority_player.opponent() }
    };

    let chosen = candidates.into_iter().find(|&i| pending[i].caster.side == winner_side).unwrap();
    *priority_player = winner_side;

    Some(pending.remove(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::RowSlot;
    use crate::model::TileRef;

    fn cast(side: Side, index: usize, energy: i32, queued_id: u64) -> QueuedCast {
        QueuedCast {
            spell_id: "bolt".into(),
            slot: RowSlot::Front,
            queued_energy: energy,
            queued_cost: 3,
            queued_id,
            caster: TileRef::main(side, index),
            tower_bonus_cast: false,
        }
    }

    #[test]
    fn cross_side_tie_breaks_on_priority_player_and_advances() {
        let catalogs = Catalogs::new();
        let mut pending = vec![cast(Side::P1, 8, 5, 1), cast(Side::P2, 6, 5, 2)];
        let mut priority = Side::P2;
        let winner = orderer_pop(&mut pending, &catalogs, &mut priority);
        assert_eq!(winner.caster.side, Side::P2);
        assert_eq!(priority, Side::P2);
        let remaining = orderer_pop(&mut pending, &catalogs, &mut priority);
        assert_eq!(remaining.caster.side, Side::P1);
    }

    fn orderer_pop(pending: &mut Vec<QueuedCast>, catalogs: &Catalogs, priority: &mut Side) -> QueuedCast {
        pop_next(pending, catalogs, priority).expect("non-empty")
    }

    #[test]
    fn higher_tier_resolves_before_lower_tier() {
        let mut catalogs = Catalogs::new();
        catalogs.register_spell(crate::model::SpellDefinition {
            id: "ultimate".into(),
            name: "Ultimate".into(),
            cast_priority: 5,
            spec: Default::default(),
            animation_ms: 0,
            animation_secondary: None,
            sound: None,
            sound_volume: None,
        });
        let mut low_tier = cast(Side::P1, 0, 10, 1);
        low_tier.spell_id = "bolt".into();
        let mut high_tier = cast(Side::P2, 0, 1, 2);
        high_tier.spell_id = "ultimate".into();
        let mut pending = vec![low_tier, high_tier];
        let mut priority = Side::P1;
        let winner = pop_next(&mut pending, &catalogs, &mut priority).unwrap();
        assert_eq!(winner.spell_id, "ultimate");
    }
}
