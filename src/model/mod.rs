pub mod board;
pub mod effect;
pub mod hero;
pub mod spell;
pub mod tile;
pub mod types;

pub use board::*;
pub use effect::*;
pub use hero::*;
pub use spell::*;
pub use tile::*;
pub use types::*;
