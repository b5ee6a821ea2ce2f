//! Internal error taxonomy. None of these ever escape
//! `execute_round` — content/data errors are recovered locally and logged;
//! only malformed-input contract violations are allowed to panic.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    InvalidTarget { descriptor: &'static str },
    MissingCatalogEntry { kind: &'static str, id: String },
    InsufficientEnergy { caster: String, needed: i32, have: i32 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidTarget { descriptor } => {
                write!(f, "target descriptor '{descriptor}' resolved to zero tiles")
            }
            EngineError::MissingCatalogEntry { kind, id } => {
                write!(f, "unknown {kind} catalog entry '{id}'")
            }
            EngineError::InsufficientEnergy { caster, needed, have } => {
                write!(f, "caster {caster} needed {needed} energy, had {have}")
            }
        }
    }
}

/// Log a recovered error at `warn` level and drop whatever it was attached
/// to (a cast, a per-target payload, an effect lookup). Called from every
/// site that hits one of the recovery branches above.
pub fn log_recovered(err: &EngineError, quiet: bool) {
    if !quiet {
        log::warn!("recovered: {err}");
    }
}
