//! Fixed timestep simulation tick
//!
//! Core game loop that advances one round deterministically. Everything
//! external to the simulation arrives through `TickInput`, so the same
//! starting state and the same inputs always replay to the same round.

use glam::Vec2;

use super::collision::overlaps;
use super::rect::Rect;
use super::state::{Body, GameEvent, GameState, Outcome};

/// Shown when the clock beats the player
pub const TIME_UP_MESSAGE: &str = "Time's up! You didn't destroy all targets.";
/// Shown when the last target falls
pub const ALL_CLEAR_MESSAGE: &str = "You destroyed all targets!";

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire the cannon at this field point (click position)
    pub fire_at: Option<Vec2>,
    /// The round clock ran out before this tick
    pub time_expired: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // A finished round ignores everything, including the expiry signal
    if state.round.outcome.is_terminal() {
        return;
    }

    if let Some(point) = input.fire_at {
        fire(state, point);
    }

    let bounds = state.config.field_size();
    state.blocker.step_bounce(bounds);
    for target in &mut state.round.targets {
        target.step_bounce(bounds);
    }

    advance_cannonballs(state);
    resolve_collisions(state);

    state.round.elapsed_ticks += 1;

    if state.round.targets.is_empty() && state.round.finish(Outcome::Won) {
        log::info!("round won after {} ticks", state.round.elapsed_ticks);
        state.events.push(GameEvent::RoundEnded {
            won: true,
            message: ALL_CLEAR_MESSAGE.to_string(),
        });
    }

    // A clear on the expiry tick counts as a win
    if input.time_expired && state.round.finish(Outcome::Lost) {
        log::info!(
            "round lost with {} targets standing",
            state.round.targets.len()
        );
        state.events.push(GameEvent::RoundEnded {
            won: false,
            message: TIME_UP_MESSAGE.to_string(),
        });
    }
}

/// Rotate the cannon toward the click point and launch one cannonball
fn fire(state: &mut GameState, point: Vec2) {
    let heading = state.cannon.aim_at(point);
    let id = state.next_entity_id();
    let ball = Body::ball(
        id,
        state.cannon.muzzle(),
        state.config.cannonball_radius,
        heading * state.config.cannonball_step,
    );
    log::debug!(
        "cannonball {id} fired at {:.1} degrees",
        state.cannon.angle_deg
    );
    state.events.push(GameEvent::CannonFired {
        id,
        angle_deg: state.cannon.angle_deg,
    });
    state.cannonballs.push(ball);
}

/// Move every cannonball one step and drop the ones that left the field
fn advance_cannonballs(state: &mut GameState) {
    for ball in &mut state.cannonballs {
        ball.step_linear();
    }

    let field = Rect::new(0.0, 0.0, state.config.field_width, state.config.field_height);
    let events = &mut state.events;
    state.cannonballs.retain(|ball| {
        let inside = overlaps(&ball.aabb(), &field);
        if !inside {
            events.push(GameEvent::CannonballExited { id: ball.id });
        }
        inside
    });
}

/// Two-phase collision pass: scan every live cannonball against the blocker
/// and then the targets, collecting hits, then apply the removals.
///
/// A cannonball is spent on the first thing it touches, the blocker tested
/// first. A target can be claimed by at most one cannonball per tick; a
/// second ball overlapping the same target keeps flying.
fn resolve_collisions(state: &mut GameState) {
    let blocker_box = state.blocker.aabb();
    let mut used_balls: Vec<u32> = Vec::new();
    let mut hit_targets: Vec<u32> = Vec::new();
    let mut events: Vec<GameEvent> = Vec::new();

    for ball in &state.cannonballs {
        let ball_box = ball.aabb();

        if overlaps(&ball_box, &blocker_box) {
            used_balls.push(ball.id);
            events.push(GameEvent::CannonballBlocked { id: ball.id });
            continue;
        }

        for target in &state.round.targets {
            if hit_targets.contains(&target.id) {
                continue;
            }
            if overlaps(&ball_box, &target.aabb()) {
                used_balls.push(ball.id);
                hit_targets.push(target.id);
                events.push(GameEvent::TargetDestroyed {
                    target: target.id,
                    cannonball: ball.id,
                });
                break;
            }
        }
    }

    if !used_balls.is_empty() {
        state.cannonballs.retain(|ball| !used_balls.contains(&ball.id));
    }
    if !hit_targets.is_empty() {
        state
            .round
            .targets
            .retain(|target| !hit_targets.contains(&target.id));
        log::debug!("{} targets left", state.round.targets.len());
    }
    state.events.extend(events);
}
