//! Source rendering for expression trees.
//!
//! `Display` on [`crate::ast::Expression`] is the inverse of parsing:
//! external layers persist and retransmit expressions through it.

mod surface;

pub use surface::format_number;
