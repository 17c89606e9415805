//! odds-movement: diff analyzer for football-match betting odds histories
//!
//! This library provides the core components for:
//! - Typed odds-history snapshots with safe numeric coercion at the feed
//!   boundary
//! - Two-pass temporal correlation of the unconditional and handicapped
//!   update series of one match
//! - Exactly-once attribution of every primary update to a movement row
//!
//! The analyzer is pure and reentrant: no I/O, no clock, no shared state.
//! It is safe to run concurrently across matches and idempotent for
//! identical inputs.

pub mod diff;
pub mod history;
