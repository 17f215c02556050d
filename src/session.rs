//! Single-threaded round driver
//!
//! `Session` owns the game state and serializes the outside world into
//! tick inputs: clicks queue up FIFO and fire one per tick, and the round
//! clock is delivered as a one-shot input on the tick that reaches the
//! limit. Everything the simulation sees goes through `advance`, so a
//! session replays exactly from its seed and click timeline.

use std::collections::VecDeque;

use glam::Vec2;

use crate::config::GameConfig;
use crate::sim::{GameEvent, GameState, Outcome, SetupError, TickInput, tick};

pub struct Session {
    state: GameState,
    /// Clicks waiting for a tick, oldest first
    clicks: VecDeque<Vec2>,
    /// The expiry signal is delivered at most once
    expiry_sent: bool,
}

impl Session {
    /// Set up a fresh round
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, SetupError> {
        Ok(Self {
            state: GameState::new(config, seed)?,
            clicks: VecDeque::new(),
            expiry_sent: false,
        })
    }

    /// Queue a fire command at a field position.
    ///
    /// Commands arriving faster than the tick rate spread over subsequent
    /// ticks. Clicks on a finished round are dropped.
    pub fn on_click(&mut self, x: f32, y: f32) {
        if self.is_over() {
            log::debug!("click dropped, round already over");
            return;
        }
        self.clicks.push_back(Vec2::new(x, y));
    }

    /// Run one 16 ms heartbeat and return the events it produced
    pub fn advance(&mut self) -> Vec<GameEvent> {
        let input = TickInput {
            fire_at: self.clicks.pop_front(),
            time_expired: self.take_expiry(),
        };
        tick(&mut self.state, &input);
        self.state.drain_events()
    }

    /// True once on the tick that brings `elapsed_ticks` to the limit
    fn take_expiry(&mut self) -> bool {
        if self.expiry_sent {
            return false;
        }
        if self.state.round.elapsed_ticks + 1 >= self.state.round.time_limit_ticks {
            self.expiry_sent = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.state.round.outcome
    }

    /// The embedder stops scheduling heartbeats once this is true
    #[inline]
    pub fn is_over(&self) -> bool {
        self.state.round.outcome.is_terminal()
    }

    #[inline]
    pub fn pending_clicks(&self) -> usize {
        self.clicks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clicks_queue_fifo_one_per_tick() {
        let mut session = Session::new(GameConfig::default(), 5).unwrap();
        session.on_click(400.0, 300.0);
        session.on_click(15.0, 600.0);
        session.on_click(15.0, 0.0);
        assert_eq!(session.pending_clicks(), 3);

        let mut angles = Vec::new();
        for _ in 0..3 {
            for event in session.advance() {
                if let GameEvent::CannonFired { angle_deg, .. } = event {
                    angles.push(angle_deg);
                }
            }
        }
        assert_eq!(session.pending_clicks(), 0);
        assert_eq!(angles.len(), 3);
        assert_eq!(angles[0], 0.0);
        assert!((angles[1] - 90.0).abs() < 1e-4);
        assert!((angles[2] + 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_one_fire_command_per_tick() {
        let mut session = Session::new(GameConfig::default(), 9).unwrap();
        session.on_click(400.0, 300.0);
        session.on_click(400.0, 200.0);
        let events = session.advance();
        let fired = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CannonFired { .. }))
            .count();
        assert_eq!(fired, 1);
        assert_eq!(session.pending_clicks(), 1);
        assert_eq!(session.state().cannonballs.len(), 1);
    }

    #[test]
    fn test_round_expires_at_the_limit() {
        let config = GameConfig {
            time_limit_ticks: 50,
            ..GameConfig::default()
        };
        let mut session = Session::new(config, 11).unwrap();
        let mut ended = Vec::new();
        for _ in 0..50 {
            assert!(!session.is_over());
            for event in session.advance() {
                if let GameEvent::RoundEnded { won, .. } = event {
                    ended.push(won);
                }
            }
        }
        assert!(session.is_over());
        assert_eq!(session.outcome(), Outcome::Lost);
        assert_eq!(session.state().round.elapsed_ticks, 50);
        assert_eq!(ended, vec![false]);

        // Extra heartbeats after the end change nothing
        for _ in 0..5 {
            assert!(session.advance().is_empty());
        }
        assert_eq!(session.state().round.elapsed_ticks, 50);
    }

    #[test]
    fn test_clicks_dropped_after_round_ends() {
        let config = GameConfig {
            time_limit_ticks: 5,
            ..GameConfig::default()
        };
        let mut session = Session::new(config, 3).unwrap();
        for _ in 0..5 {
            session.advance();
        }
        assert!(session.is_over());
        session.on_click(400.0, 300.0);
        assert_eq!(session.pending_clicks(), 0);
        assert!(session.advance().is_empty());
    }

    #[test]
    fn test_empty_roster_wins_on_first_tick() {
        let config = GameConfig {
            target_count: 0,
            ..GameConfig::default()
        };
        let mut session = Session::new(config, 1).unwrap();
        let events = session.advance();
        assert!(session.is_over());
        assert_eq!(session.outcome(), Outcome::Won);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::RoundEnded { won: true, .. }))
        );
    }
}
