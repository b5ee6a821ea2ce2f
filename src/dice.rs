//! Dice rolling for `formula.type == roll` formulas: sample uniformly
//! in `[1, die]` and record `{die, base, roll, total}`.

use crate::events::RollInfo;
use crate::rng;

pub fn roll(die: u32, base: i32) -> RollInfo {
    let value = rng::roll_die(die) as i32;
    RollInfo { die, base, roll: value, total: base + value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_total_combines_base_and_die() {
        rng::seed_rng(7);
        rng::force_roll(6, 3);
        let info = roll(6, 2);
        assert_eq!(info.roll, 3);
        assert_eq!(info.total, 5);
        rng::clear_rng();
    }
}
