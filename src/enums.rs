use serde::{Deserialize, Serialize};

/// The two sides of the board. A third side (`P3`) is deliberately not
/// implemented; see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }
}

/// Which strip a tile lives on. Reserve tiles never act (see `RoundExecutor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Main,
    Reserve,
}

/// A hero's active row, from its own side's perspective. Determines which
/// spell slot is live and which `casts_remaining` bucket is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowSlot {
    Front,
    Middle,
    Back,
}

impl RowSlot {
    pub const ALL: [RowSlot; 3] = [RowSlot::Front, RowSlot::Middle, RowSlot::Back];

    /// One step back (Front -> Middle -> Back). `None` past Back.
    pub fn step_back(self) -> Option<RowSlot> {
        match self {
            RowSlot::Front => Some(RowSlot::Middle),
            RowSlot::Middle => Some(RowSlot::Back),
            RowSlot::Back => None,
        }
    }
}

/// Which side of the caster a target descriptor resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSide {
    Enemy,
    Ally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormulaType {
    Damage,
    AttackPower,
    Heal,
    HealPower,
    Roll,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    SelfTarget,
    Projectile,
    ProjectilePlus1,
    Column,
    FrontmostRowWithHero,
    FrontTwoRows,
    BackRow,
    RowHighestArmor,
    RowLowestArmor,
    RowHighestSumArmor,
    HighestHealth,
    LowestHealth,
    Adjacent,
    All,
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventAction {
    Damage,
    Heal,
    Energy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPhase {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Buff,
    Debuff,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseType {
    Damage,
    Heal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivedFrom {
    Armor,
    RoundNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player1,
    Player2,
    Draw,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::P1 => Winner::Player1,
            Side::P2 => Winner::Player2,
        }
    }
}
