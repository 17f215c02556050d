//! Cannon Volley - a timed cannon range
//!
//! One cannon on the left edge, nine bouncing targets on the right, a
//! bouncing blocker in between, and ten seconds on the clock.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, round state)
//! - `session`: Single-threaded driver that feeds commands into the sim
//! - `config`: Gameplay configuration with validated overrides

pub mod config;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use session::Session;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds
    pub const TICK_MS: u64 = 16;
    /// Round duration in milliseconds
    pub const ROUND_MS: u64 = 10_000;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Target defaults - tall thin rectangles bouncing vertically
    pub const TARGET_COUNT: usize = 9;
    pub const TARGET_WIDTH: f32 = 20.0;
    pub const TARGET_HEIGHT: f32 = 65.0;
    /// Per-target speed is drawn uniformly from [min, max)
    pub const TARGET_SPEED_MIN: f32 = 0.5;
    pub const TARGET_SPEED_MAX: f32 = 2.5;

    /// Blocker defaults - the indestructible obstacle in mid-field
    pub const BLOCKER_WIDTH: f32 = 20.0;
    pub const BLOCKER_HEIGHT: f32 = 90.0;
    pub const BLOCKER_SPEED: f32 = 2.0;

    /// Cannon mount body, flush with the left edge
    pub const CANNON_WIDTH: f32 = 30.0;
    pub const CANNON_HEIGHT: f32 = 20.0;
    /// Barrel length, used by the presentation layer
    pub const BARREL_LENGTH: f32 = 40.0;

    /// Cannonball defaults
    pub const CANNONBALL_RADIUS: f32 = 5.0;
    /// Distance a cannonball travels per tick
    pub const CANNONBALL_STEP: f32 = 5.0;

    /// Minimum separation between spawned targets (and the blocker)
    pub const SPAWN_MARGIN: f32 = 80.0;
    /// Leftmost spawn x, measured from the blocker's left edge
    pub const SPAWN_CLEARANCE: f32 = 30.0;
    /// Shrinks the spawn span at the right edge of the field
    pub const SPAWN_RIGHT_MARGIN: f32 = 40.0;
    /// Top/bottom inset of the spawn region
    pub const SPAWN_EDGE_INSET: f32 = 20.0;
    /// Placement attempts per target before the roster is dealt again
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;
    /// Fresh rosters dealt before placement fails for good
    pub const MAX_PLACEMENT_RESTARTS: u32 = 10;
}

/// Angle from `origin` to `point` in degrees, normalized to (-180, 180].
///
/// Screen coordinates: y grows downward, so positive angles point toward
/// the bottom of the field.
#[inline]
pub fn angle_to_deg(origin: Vec2, point: Vec2) -> f32 {
    let deg = (point.y - origin.y).atan2(point.x - origin.x).to_degrees();
    // atan2 may yield -180 for points straight left; fold onto +180
    if deg <= -180.0 { deg + 360.0 } else { deg }
}

/// Unit heading vector for a degree angle (y-down screen coordinates)
#[inline]
pub fn heading_from_deg(deg: f32) -> Vec2 {
    let rad = deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
