//! Up/down repeat controller ("spinner")
//!
//! Turns the Up and Down buttons into value changes: one change per short
//! press, and an accelerating stream of changes while a button is held.

pub mod controller;

pub use controller::{ActiveSpinner, ClickSetup, Direction, RepeatController};
