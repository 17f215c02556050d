//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (setup is the only place randomness enters)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{overlaps, overlaps_with_margin};
pub use rect::Rect;
pub use spawn::{PlacementError, place_targets};
pub use state::{
    Axis, Body, BodyError, BodyKind, Cannon, GameEvent, GameState, Motion, Outcome, Round,
    SetupError, Shape,
};
pub use tick::{ALL_CLEAR_MESSAGE, TIME_UP_MESSAGE, TickInput, tick};
