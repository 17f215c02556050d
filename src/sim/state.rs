//! Game state and core simulation types
//!
//! All state that a round needs for determinism lives here. The `Round`
//! owns the live targets; nothing about the simulation is ever inferred
//! from what a renderer happens to be drawing.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::spawn::{self, PlacementError};
use crate::config::{ConfigError, GameConfig};
use crate::{angle_to_deg, heading_from_deg};

/// What a body is, for collision rules and presentation color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// The indestructible bouncing obstacle in mid-field
    Blocker,
    /// A destroyable bouncing target
    Target,
    /// A projectile in flight
    Cannonball,
}

/// Axis a bouncing body travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// How a body moves each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Fixed step along one axis, reversing instead of leaving the field.
    /// `dir` is +1 or -1.
    Bounce { axis: Axis, speed: f32, dir: f32 },
    /// Constant displacement per tick, no reflection
    Linear { velocity: Vec2 },
    /// Never moves
    Still,
}

/// Collision footprint of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Rectangle; the body position is its top-left corner
    Rect { size: Vec2 },
    /// Circle; the body position is its center
    Circle { radius: f32 },
}

/// A body construction that cannot move or collide sanely
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyError {
    /// Speeds must be finite and non-negative
    InvalidSpeed(f32),
    /// Rectangle sides and circle radii must be finite and positive
    InvalidSize(f32),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::InvalidSpeed(v) => write!(f, "invalid body speed: {v}"),
            BodyError::InvalidSize(v) => write!(f, "invalid body dimension: {v}"),
        }
    }
}

impl std::error::Error for BodyError {}

/// A moving (or movable) entity on the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: BodyKind,
    /// Top-left corner for rectangles, center for circles
    pub pos: Vec2,
    pub shape: Shape,
    pub motion: Motion,
}

impl Body {
    /// A rectangular body with bounce motion along one axis
    pub fn bouncing_rect(
        id: u32,
        kind: BodyKind,
        pos: Vec2,
        size: Vec2,
        axis: Axis,
        speed: f32,
        dir: f32,
    ) -> Result<Self, BodyError> {
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(BodyError::InvalidSpeed(speed));
        }
        if !(size.x.is_finite() && size.x > 0.0) {
            return Err(BodyError::InvalidSize(size.x));
        }
        if !(size.y.is_finite() && size.y > 0.0) {
            return Err(BodyError::InvalidSize(size.y));
        }
        Ok(Self {
            id,
            kind,
            pos,
            shape: Shape::Rect { size },
            motion: Motion::Bounce { axis, speed, dir },
        })
    }

    /// A cannonball flying along a fixed per-tick displacement
    pub fn ball(id: u32, pos: Vec2, radius: f32, velocity: Vec2) -> Self {
        Self {
            id,
            kind: BodyKind::Cannonball,
            pos,
            shape: Shape::Circle { radius },
            motion: Motion::Linear { velocity },
        }
    }

    /// Axis-aligned bounding box, used for every collision test
    pub fn aabb(&self) -> Rect {
        match self.shape {
            Shape::Rect { size } => Rect::from_pos_size(self.pos, size),
            Shape::Circle { radius } => Rect::new(
                self.pos.x - radius,
                self.pos.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
        }
    }

    /// Center of the body's bounding box
    pub fn center(&self) -> Vec2 {
        self.aabb().center()
    }

    /// Advance one tick of bounce motion within a `bounds`-sized field.
    ///
    /// If the moved box would cross either field edge on the bounce axis,
    /// the direction flips and the position holds for this tick. The
    /// perpendicular coordinate never changes.
    pub fn step_bounce(&mut self, bounds: Vec2) {
        let Motion::Bounce { axis, speed, dir } = self.motion else {
            return;
        };
        let aabb = self.aabb();
        let (min, extent, limit) = match axis {
            Axis::X => (aabb.x, aabb.w, bounds.x),
            Axis::Y => (aabb.y, aabb.h, bounds.y),
        };
        let step = speed * dir;
        if min + step < 0.0 || min + step + extent > limit {
            self.motion = Motion::Bounce { axis, speed, dir: -dir };
        } else {
            match axis {
                Axis::X => self.pos.x += step,
                Axis::Y => self.pos.y += step,
            }
        }
    }

    /// Advance one tick of linear motion
    pub fn step_linear(&mut self) {
        if let Motion::Linear { velocity } = self.motion {
            self.pos += velocity;
        }
    }
}

/// The player's cannon, pivoting against the left field edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cannon {
    /// Pivot point (center of the mount body)
    pub pivot: Vec2,
    /// Mount body size
    pub size: Vec2,
    /// Barrel length, for the presentation layer
    pub barrel_length: f32,
    /// Current heading in degrees, (-180, 180], 0 points straight right
    pub angle_deg: f32,
}

impl Cannon {
    /// Mount flush with the left edge, pivot at the vertical field center
    pub fn new(field_height: f32, size: Vec2, barrel_length: f32) -> Self {
        Self {
            pivot: Vec2::new(size.x / 2.0, field_height / 2.0),
            size,
            barrel_length,
            angle_deg: 0.0,
        }
    }

    /// Where cannonballs leave the cannon: half a mount width out from the
    /// pivot along the current heading
    pub fn muzzle(&self) -> Vec2 {
        self.pivot + heading_from_deg(self.angle_deg) * (self.size.x / 2.0)
    }

    /// Rotate to face `point` and return the unit heading
    pub fn aim_at(&mut self, point: Vec2) -> Vec2 {
        self.angle_deg = angle_to_deg(self.pivot, point);
        heading_from_deg(self.angle_deg)
    }
}

/// Round resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// One timed attempt at clearing the targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Live targets; a hit target is removed from this set
    pub targets: Vec<Body>,
    /// Ticks simulated since the round started
    pub elapsed_ticks: u64,
    /// Round length in ticks; the expiry signal arrives when it is reached
    pub time_limit_ticks: u64,
    /// Current resolution
    pub outcome: Outcome,
}

impl Round {
    /// Move to a terminal outcome. Returns false (and changes nothing)
    /// when the round is already terminal.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }
        self.outcome = outcome;
        true
    }
}

/// Things that happened during a tick, drained by the embedder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A cannonball left the muzzle
    CannonFired { id: u32, angle_deg: f32 },
    /// A cannonball destroyed a target
    TargetDestroyed { target: u32, cannonball: u32 },
    /// The blocker absorbed a cannonball
    CannonballBlocked { id: u32 },
    /// A cannonball flew off the field
    CannonballExited { id: u32 },
    /// The round reached its terminal outcome
    RoundEnded { won: bool, message: String },
}

/// Why a round could not be set up
#[derive(Debug)]
pub enum SetupError {
    Config(ConfigError),
    Placement(PlacementError),
    Body(BodyError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Config(e) => write!(f, "config rejected: {e}"),
            SetupError::Placement(e) => write!(f, "target placement failed: {e}"),
            SetupError::Body(e) => write!(f, "body construction failed: {e}"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetupError::Config(e) => Some(e),
            SetupError::Placement(e) => Some(e),
            SetupError::Body(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        SetupError::Config(e)
    }
}

impl From<PlacementError> for SetupError {
    fn from(e: PlacementError) -> Self {
        SetupError::Placement(e)
    }
}

impl From<BodyError> for SetupError {
    fn from(e: BodyError) -> Self {
        SetupError::Body(e)
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Config the world was built from
    pub config: GameConfig,
    /// The indestructible mid-field obstacle
    pub blocker: Body,
    /// The player's cannon
    pub cannon: Cannon,
    /// Live projectiles, in firing order
    pub cannonballs: Vec<Body>,
    /// Round bookkeeping and the live target set
    pub round: Round,
    /// Events since the last drain (transient)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build a world from a validated config and a seed.
    ///
    /// All randomness (target positions and speeds) is drawn here; after
    /// setup the simulation is fully determined by its inputs.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, SetupError> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let blocker_pos = Vec2::new(
            (config.field_width - config.blocker_size.x) / 2.0,
            (config.field_height - config.blocker_size.y) / 2.0,
        );
        let blocker = Body::bouncing_rect(
            1,
            BodyKind::Blocker,
            blocker_pos,
            config.blocker_size,
            Axis::Y,
            config.blocker_speed,
            -1.0,
        )?;
        let cannon = Cannon::new(config.field_height, config.cannon_size, config.barrel_length);

        let mut state = Self {
            seed,
            blocker,
            cannon,
            cannonballs: Vec::new(),
            round: Round {
                targets: Vec::new(),
                elapsed_ticks: 0,
                time_limit_ticks: config.time_limit_ticks,
                outcome: Outcome::InProgress,
            },
            events: Vec::new(),
            next_id: 2,
            config,
        };

        let positions = spawn::place_targets(&state.config, state.blocker.aabb(), &mut rng)?;
        for pos in positions {
            let speed =
                rng.random_range(state.config.target_speed_min..state.config.target_speed_max);
            let id = state.next_entity_id();
            let target = Body::bouncing_rect(
                id,
                BodyKind::Target,
                pos,
                state.config.target_size,
                Axis::Y,
                speed,
                -1.0,
            )?;
            state.round.targets.push(target);
        }

        log::info!(
            "round ready: seed {}, {} targets, {} tick limit",
            state.seed,
            state.round.targets.len(),
            state.round.time_limit_ticks
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounce_reverses_at_top_without_moving() {
        let mut body = Body::bouncing_rect(
            1,
            BodyKind::Target,
            Vec2::new(500.0, 1.0),
            Vec2::new(20.0, 65.0),
            Axis::Y,
            2.0,
            -1.0,
        )
        .unwrap();
        body.step_bounce(Vec2::new(800.0, 600.0));
        // Moving would cross y=0, so only the direction changes
        assert_eq!(body.pos, Vec2::new(500.0, 1.0));
        assert_eq!(
            body.motion,
            Motion::Bounce { axis: Axis::Y, speed: 2.0, dir: 1.0 }
        );
        // Next tick moves downward
        body.step_bounce(Vec2::new(800.0, 600.0));
        assert_eq!(body.pos, Vec2::new(500.0, 3.0));
    }

    #[test]
    fn test_bounce_reverses_at_bottom() {
        let mut body = Body::bouncing_rect(
            1,
            BodyKind::Target,
            Vec2::new(500.0, 534.0),
            Vec2::new(20.0, 65.0),
            Axis::Y,
            2.0,
            1.0,
        )
        .unwrap();
        // 534 + 2 + 65 = 601 > 600: flip
        body.step_bounce(Vec2::new(800.0, 600.0));
        assert_eq!(body.pos.y, 534.0);
        body.step_bounce(Vec2::new(800.0, 600.0));
        assert_eq!(body.pos.y, 532.0);
    }

    #[test]
    fn test_bounce_keeps_perpendicular_coordinate() {
        let mut body = Body::bouncing_rect(
            1,
            BodyKind::Target,
            Vec2::new(500.0, 300.0),
            Vec2::new(20.0, 65.0),
            Axis::Y,
            1.5,
            1.0,
        )
        .unwrap();
        for _ in 0..100 {
            body.step_bounce(Vec2::new(800.0, 600.0));
        }
        assert_eq!(body.pos.x, 500.0);
    }

    #[test]
    fn test_bounce_zero_speed_holds_position() {
        let mut body = Body::bouncing_rect(
            1,
            BodyKind::Target,
            Vec2::new(500.0, 300.0),
            Vec2::new(20.0, 65.0),
            Axis::Y,
            0.0,
            -1.0,
        )
        .unwrap();
        for _ in 0..10 {
            body.step_bounce(Vec2::new(800.0, 600.0));
        }
        assert_eq!(body.pos, Vec2::new(500.0, 300.0));
    }

    #[test]
    fn test_negative_speed_is_rejected() {
        let result = Body::bouncing_rect(
            1,
            BodyKind::Target,
            Vec2::ZERO,
            Vec2::new(20.0, 65.0),
            Axis::Y,
            -1.0,
            -1.0,
        );
        assert_eq!(result.unwrap_err(), BodyError::InvalidSpeed(-1.0));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let result = Body::bouncing_rect(
            1,
            BodyKind::Target,
            Vec2::ZERO,
            Vec2::new(20.0, 0.0),
            Axis::Y,
            1.0,
            -1.0,
        );
        assert_eq!(result.unwrap_err(), BodyError::InvalidSize(0.0));
    }

    #[test]
    fn test_ball_aabb_centers_on_position() {
        let ball = Body::ball(7, Vec2::new(30.0, 300.0), 5.0, Vec2::new(5.0, 0.0));
        let aabb = ball.aabb();
        assert_eq!(aabb.x, 25.0);
        assert_eq!(aabb.y, 295.0);
        assert_eq!(aabb.w, 10.0);
        assert_eq!(aabb.h, 10.0);
        assert_eq!(ball.center(), Vec2::new(30.0, 300.0));
    }

    #[test]
    fn test_cannon_muzzle_at_zero_angle() {
        let cannon = Cannon::new(600.0, Vec2::new(30.0, 20.0), 40.0);
        assert_eq!(cannon.pivot, Vec2::new(15.0, 300.0));
        assert_eq!(cannon.muzzle(), Vec2::new(30.0, 300.0));
    }

    #[test]
    fn test_cannon_aim_rotates_muzzle() {
        let mut cannon = Cannon::new(600.0, Vec2::new(30.0, 20.0), 40.0);
        // Straight down the field (y grows downward)
        cannon.aim_at(Vec2::new(15.0, 600.0));
        assert!((cannon.angle_deg - 90.0).abs() < 1e-4);
        let muzzle = cannon.muzzle();
        assert!((muzzle.x - 15.0).abs() < 1e-3);
        assert!((muzzle.y - 315.0).abs() < 1e-3);
    }

    #[test]
    fn test_cannon_aim_straight_left_folds_to_positive() {
        let mut cannon = Cannon::new(600.0, Vec2::new(30.0, 20.0), 40.0);
        cannon.aim_at(Vec2::new(0.0, 300.0));
        assert_eq!(cannon.angle_deg, 180.0);
    }

    #[test]
    fn test_round_finishes_only_once() {
        let mut round = Round {
            targets: Vec::new(),
            elapsed_ticks: 0,
            time_limit_ticks: 625,
            outcome: Outcome::InProgress,
        };
        assert!(round.finish(Outcome::Won));
        assert!(!round.finish(Outcome::Lost));
        assert_eq!(round.outcome, Outcome::Won);
    }

    #[test]
    fn test_new_state_builds_full_roster() {
        let state = GameState::new(GameConfig::default(), 42).unwrap();
        assert_eq!(state.round.targets.len(), 9);
        assert_eq!(state.round.outcome, Outcome::InProgress);
        assert_eq!(state.round.elapsed_ticks, 0);
        assert!(state.cannonballs.is_empty());
        // Blocker centered in the field
        assert_eq!(state.blocker.pos, Vec2::new(390.0, 255.0));
        // Entity IDs are unique
        let mut ids: Vec<u32> = state.round.targets.iter().map(|t| t.id).collect();
        ids.push(state.blocker.id);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(GameConfig::default(), 7).unwrap();
        let b = GameState::new(GameConfig::default(), 7).unwrap();
        for (ta, tb) in a.round.targets.iter().zip(&b.round.targets) {
            assert_eq!(ta.pos, tb.pos);
            assert_eq!(ta.motion, tb.motion);
        }
    }

    #[test]
    fn test_setup_rejects_invalid_config() {
        let config = GameConfig {
            blocker_speed: f32::INFINITY,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameState::new(config, 1),
            Err(SetupError::Config(_))
        ));
    }
}
