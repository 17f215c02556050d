//! Target placement by bounded rejection sampling
//!
//! Candidates are drawn uniformly from the region right of the blocker and
//! rejected until one keeps its distance from everything already placed.
//! A jammed roster is thrown away and dealt again from scratch; the attempt
//! and restart budgets keep a crowded config from hanging setup.

use std::fmt;

use glam::Vec2;
use rand::Rng;

use super::collision::overlaps_with_margin;
use super::rect::Rect;
use crate::config::GameConfig;
use crate::consts::{
    MAX_PLACEMENT_ATTEMPTS, MAX_PLACEMENT_RESTARTS, SPAWN_CLEARANCE, SPAWN_EDGE_INSET,
    SPAWN_RIGHT_MARGIN,
};

/// Placement could not fit every target into the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// The sampling region has no area under this config
    NoSpawnRegion,
    /// Every dealt roster ran out of attempts before it was full
    Exhausted { placed: usize, attempts: u32 },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::NoSpawnRegion => {
                write!(f, "no room to the right of the blocker for targets")
            }
            PlacementError::Exhausted { placed, attempts } => write!(
                f,
                "placed {placed} targets, then used all {attempts} attempts on the next"
            ),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Pick a non-overlapping top-left corner for every target.
///
/// Each candidate box must sit fully inside the field and keep
/// `config.spawn_margin` of clear space from the blocker and from every
/// target committed before it. An unlucky early draw can jam a greedy
/// roster even when the config fits, so when a target uses up its attempt
/// budget the partial roster is discarded and placement deals again, up to
/// `MAX_PLACEMENT_RESTARTS` rosters. Candidates are drawn from the
/// caller's RNG, so placement is reproducible from the round seed.
pub fn place_targets<R: Rng>(
    config: &GameConfig,
    blocker: Rect,
    rng: &mut R,
) -> Result<Vec<Vec2>, PlacementError> {
    if config.target_count == 0 {
        return Ok(Vec::new());
    }

    let x_lo = blocker.x + SPAWN_CLEARANCE;
    let x_hi = x_lo + (config.field_width - blocker.x - SPAWN_RIGHT_MARGIN);
    let y_lo = SPAWN_EDGE_INSET;
    let y_hi = config.field_height - SPAWN_EDGE_INSET;
    if x_hi <= x_lo || y_hi <= y_lo {
        return Err(PlacementError::NoSpawnRegion);
    }

    let field = Rect::new(0.0, 0.0, config.field_width, config.field_height);
    let mut last_placed = 0;
    'roster: for _ in 0..MAX_PLACEMENT_RESTARTS {
        let mut placed: Vec<Rect> = Vec::with_capacity(config.target_count);
        while placed.len() < config.target_count {
            let mut found = None;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let pos = Vec2::new(rng.random_range(x_lo..x_hi), rng.random_range(y_lo..y_hi));
                let candidate = Rect::from_pos_size(pos, config.target_size);
                if is_clear(&candidate, &field, &blocker, &placed, config.spawn_margin) {
                    found = Some(candidate);
                    break;
                }
            }
            match found {
                Some(rect) => placed.push(rect),
                None => {
                    last_placed = placed.len();
                    log::debug!(
                        "roster jammed at {last_placed} of {} targets, dealing again",
                        config.target_count
                    );
                    continue 'roster;
                }
            }
        }
        return Ok(placed.iter().map(|rect| Vec2::new(rect.x, rect.y)).collect());
    }

    log::error!(
        "target placement exhausted: {last_placed} of {} placed on the last of {} rosters",
        config.target_count,
        MAX_PLACEMENT_RESTARTS
    );
    Err(PlacementError::Exhausted {
        placed: last_placed,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

fn is_clear(candidate: &Rect, field: &Rect, blocker: &Rect, placed: &[Rect], margin: f32) -> bool {
    field.contains_rect(candidate)
        && !overlaps_with_margin(candidate, blocker, margin)
        && !placed
            .iter()
            .any(|other| overlaps_with_margin(candidate, other, margin))
}
