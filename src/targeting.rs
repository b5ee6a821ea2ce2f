//! Targeting resolution: turns an abstract `TargetDescriptor` into concrete
//! tile references given a caster and the current boards.

use crate::enums::{EventPhase, RowSlot, Side, TargetKind, TargetSide};
use crate::geometry;
use crate::model::{BoardState, TargetDescriptor, TileRef};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTarget {
    pub tile: TileRef,
    pub phase: EventPhase,
    pub kind: TargetKind,
}

fn resolved_side(descriptor_side: TargetSide, caster_side: Side) -> Side {
    match descriptor_side {
        TargetSide::Enemy => caster_side.opponent(),
        TargetSide::Ally => caster_side,
    }
}

fn primary(tile: TileRef) -> ResolvedTarget {
    ResolvedTarget { tile, phase: EventPhase::Primary, kind: TargetKind::SelfTarget }
}

fn secondary(tile: TileRef) -> ResolvedTarget {
    ResolvedTarget { tile, phase: EventPhase::Secondary, kind: TargetKind::SelfTarget }
}

/// Resolve a descriptor against the current boards. Returns an empty vec on
/// a miss (empty column, no hero matching a stat extremum, etc.) — callers
/// treat that as a recoverable `InvalidTarget`, never a panic.
pub fn resolve(descriptor: TargetDescriptor, caster: TileRef, boards: &BoardState) -> Vec<ResolvedTarget> {
    let side = resolved_side(descriptor.side, caster.side);
    let mut out = match descriptor.kind {
        TargetKind::SelfTarget => vec![primary(caster)],
        TargetKind::Projectile => projectile(side, caster, boards).into_iter().map(primary).collect(),
        TargetKind::ProjectilePlus1 => projectile_plus_one(side, caster, boards),
        TargetKind::Column => column(side, caster, boards).into_iter().map(primary).collect(),
        TargetKind::FrontmostRowWithHero => frontmost_row_with_hero(side, boards).into_iter().map(primary).collect(),
        TargetKind::FrontTwoRows => front_two_rows(side, boards).into_iter().map(primary).collect(),
        TargetKind::BackRow => row_tiles(side, boards, RowSlot::Back).into_iter().map(primary).collect(),
        TargetKind::RowHighestArmor => row_by_armor_extreme(side, boards, true).into_iter().map(primary).collect(),
        TargetKind::RowLowestArmor => row_by_armor_extreme(side, boards, false).into_iter().map(primary).collect(),
        TargetKind::RowHighestSumArmor => row_by_highest_sum_armor(side, boards).into_iter().map(primary).collect(),
        TargetKind::HighestHealth => health_extreme(side, boards, true).into_iter().map(primary).collect(),
        TargetKind::LowestHealth => health_extreme(side, boards, false).into_iter().map(primary).collect(),
        TargetKind::Adjacent => adjacent(side, caster, boards).into_iter().map(primary).collect(),
        TargetKind::All => boards.alive_all(side).into_iter().map(primary).collect(),
        TargetKind::Board => boards.alive_main(side).into_iter().map(primary).collect(),
    };
    for t in &mut out {
        t.kind = descriptor.kind;
    }
    out
}

fn projectile(side: Side, caster: TileRef, boards: &BoardState) -> Option<TileRef> {
    let column = geometry::column_of(caster.index, caster.side);
    let order = geometry::column_indices(column, side);
    order.into_iter().map(|i| TileRef::main(side, i)).find(|t| boards.is_alive(*t))
}

fn projectile_plus_one(side: Side, caster: TileRef, boards: &BoardState) -> Vec<ResolvedTarget> {
    let column = geometry::column_of(caster.index, caster.side);
    let order = geometry::column_indices(column, side);
    let refs: Vec<TileRef> = order.into_iter().map(|i| TileRef::main(side, i)).collect();
    let mut alive_iter = refs.into_iter().filter(|t| boards.is_alive(*t));
    let mut out = Vec::new();
    if let Some(p) = alive_iter.next() {
        out.push(primary(p));
        if let Some(s) = alive_iter.next() {
            out.push(secondary(s));
        }
    }
    out
}

fn column(side: Side, caster: TileRef, boards: &BoardState) -> Vec<TileRef> {
    let col = geometry::column_of(caster.index, caster.side);
    geometry::column_indices(col, side)
        .into_iter()
        .map(|i| TileRef::main(side, i))
        .filter(|t| boards.is_alive(*t))
        .collect()
}

fn row_tiles(side: Side, boards: &BoardState, slot: RowSlot) -> Vec<TileRef> {
    let mut out: Vec<TileRef> = boards
        .alive_main(side)
        .into_iter()
        .filter(|t| geometry::row_of(t.index, side) == slot)
        .collect();
    out.sort_by_key(|t| t.index);
    out
}

fn frontmost_row_with_hero(side: Side, boards: &BoardState) -> Vec<TileRef> {
    for slot in RowSlot::ALL {
        let tiles = row_tiles(side, boards, slot);
        if !tiles.is_empty() {
            return tiles;
        }
    }
    Vec::new()
}

fn front_two_rows(side: Side, boards: &BoardState) -> Vec<TileRef> {
    let mut out = row_tiles(side, boards, RowSlot::Front);
    out.extend(row_tiles(side, boards, RowSlot::Middle));
    out
}

fn row_by_armor_extreme(side: Side, boards: &BoardState, highest: bool) -> Vec<TileRef> {
    let mut alive = boards.alive_main(side);
    alive.sort_by_key(|t| t.index);
    let best = alive.into_iter().fold(None::<TileRef>, |best, t| {
        let armor = boards.hero(t).map(|h| h.current_armor).unwrap_or(0);
        match best {
            None => Some(t),
            Some(b) => {
                let b_armor = boards.hero(b).map(|h| h.current_armor).unwrap_or(0);
                let better = if highest { armor > b_armor } else { armor < b_armor };
                if better { Some(t) } else { Some(b) }
            }
        }
    });
    match best {
        Some(t) => row_tiles(side, boards, geometry::row_of(t.index, side)),
        None => Vec::new(),
    }
}

fn row_by_highest_sum_armor(side: Side, boards: &BoardState) -> Vec<TileRef> {
    let best_slot = RowSlot::ALL.into_iter().max_by_key(|&slot| {
        row_tiles(side, boards, slot)
            .iter()
            .map(|t| boards.hero(*t).map(|h| h.current_armor).unwrap_or(0))
            .sum::<i32>()
    });
    match best_slot {
        Some(slot) => row_tiles(side, boards, slot),
        None => Vec::new(),
    }
}

fn health_extreme(side: Side, boards: &BoardState, highest: bool) -> Vec<TileRef> {
    let mut alive = boards.alive_all(side);
    alive.sort_by_key(|t| (t.zone == crate::enums::Zone::Reserve, t.index));
    let best = alive.into_iter().fold(None::<TileRef>, |best, t| {
        let hp = boards.hero(t).map(|h| h.current_health).unwrap_or(0);
        match best {
            None => Some(t),
            Some(b) => {
                let b_hp = boards.hero(b).map(|h| h.current_health).unwrap_or(0);
                let better = if highest { hp > b_hp } else { hp < b_hp };
                if better { Some(t) } else { Some(b) }
            }
        }
    });
    best.into_iter().collect()
}

fn adjacent(side: Side, caster: TileRef, boards: &BoardState) -> Vec<TileRef> {
    geometry::adjacent_indices(caster.index)
        .into_iter()
        .map(|i| TileRef::main(side, i))
        .filter(|t| boards.is_alive(*t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Zone;
    use crate::model::tile::{HeroRuntime, Tile};
    use crate::model::MainBoard;

    fn board_with(alive_indices: &[usize]) -> BoardState {
        let mut board = crate::model::BoardState {
            p1_main: MainBoard::empty(),
            p2_main: MainBoard::empty(),
            p1_reserve: crate::model::ReserveBoard::empty(),
            p2_reserve: crate::model::ReserveBoard::empty(),
        };
        for &i in alive_indices {
            board.p2_main.tiles[i] = Tile::Occupied(HeroRuntime::new(i as u64, "h"));
        }
        board
    }

    #[test]
    fn empty_column_projectile_misses() {
        let boards = board_with(&[]); // P2 column 0 (0,1,2) empty
        let caster = TileRef::main(Side::P1, 0);
        let descriptor = TargetDescriptor { kind: TargetKind::Projectile, side: TargetSide::Enemy };
        assert!(resolve(descriptor, caster, &boards).is_empty());
    }

    #[test]
    fn projectile_hits_frontmost_from_target_perspective() {
        // P2 column 0 = indices {0,1,2}; P2 front is index 0.
        let boards = board_with(&[0, 1, 2]);
        let caster = TileRef::main(Side::P1, 0); // P1 column 0
        let descriptor = TargetDescriptor { kind: TargetKind::Projectile, side: TargetSide::Enemy };
        let hits = resolve(descriptor, caster, &boards);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tile, TileRef::main(Side::P2, 0));
    }

    #[test]
    fn front_two_rows_on_empty_back_still_returns_front_and_middle() {
        // P2 front {0,3,6}, middle {1,4,7} alive; back {2,5,8} empty.
        let boards = board_with(&[0, 3, 6, 1, 4, 7]);
        let tiles = front_two_rows(Side::P2, &boards);
        assert_eq!(tiles.len(), 6);
        assert!(tiles.iter().all(|t| t.zone == Zone::Main));
    }
}
