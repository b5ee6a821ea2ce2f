#[path = "../engine/support.rs"]
mod support;
mod invariants;
