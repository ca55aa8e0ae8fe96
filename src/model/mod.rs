//! # Entity Model
//!
//! Clients and services derive their phase timeline once, at construction,
//! from the configured delays:
//!
//! ```text
//! 0 ── Boot ── boot_del ── Initial ── t_init ── Repetition ── Main ──▶
//! ```
//!
//! The Repetition Phase sends `rep_max + 1` messages, the gap doubling each
//! time starting from `rep_del`.

pub mod entity;
pub mod phase;
pub mod relation;

pub use entity::*;
pub use phase::*;
pub use relation::*;

mod tests;
