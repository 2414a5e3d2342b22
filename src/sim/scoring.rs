//! Scoring, ball reset and match end
//!
//! Rally -> (ball leaves left/right) -> AwaitingReset -> (delay) -> Rally.
//! While awaiting reset the exit checks are suppressed, so one exit scores
//! once. Reaching the winning score ends the match for good.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::ecs::{ComponentKind, Entity, Position, Score, Velocity, World};
use crate::sim::collision::{Rect, find_ball};
use crate::sim::particle::spawn_confetti;
use crate::sim::time::{Deadline, Millis};

/// Where the scoring state machine is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringPhase {
    /// Ball in play
    Rally,
    /// Point scored, ball parked until the deadline
    AwaitingReset { ball: Entity, deadline: Deadline },
    /// Someone reached the winning score
    MatchOver { winner: u8 },
}

/// A point that was just scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEvent {
    pub player: u8,
    /// Player's total after this point
    pub points: u32,
    pub match_won: bool,
}

#[derive(Debug, Clone)]
pub struct ScoringSystem {
    phase: ScoringPhase,
    screen: Vec2,
    winning_score: u32,
    reset_delay: Millis,
}

impl ScoringSystem {
    pub fn new(screen: Vec2, winning_score: u32) -> Self {
        Self {
            phase: ScoringPhase::Rally,
            screen,
            winning_score,
            reset_delay: RESET_DELAY_MS,
        }
    }

    pub fn phase(&self) -> ScoringPhase {
        self.phase
    }

    pub fn awaiting_reset(&self) -> bool {
        matches!(self.phase, ScoringPhase::AwaitingReset { .. })
    }

    pub fn winner(&self) -> Option<u8> {
        match self.phase {
            ScoringPhase::MatchOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Ball is parked (between points or after the match)
    pub fn is_frozen(&self) -> bool {
        !matches!(self.phase, ScoringPhase::Rally)
    }

    /// Run one frame of scoring
    pub fn process(&mut self, world: &mut World, now: Millis, rng: &mut impl Rng) -> Option<ScoreEvent> {
        match self.phase {
            ScoringPhase::MatchOver { .. } => None,
            ScoringPhase::AwaitingReset { ball, deadline } => {
                if deadline.is_due(now) {
                    self.reset_ball(world, ball, rng);
                    self.phase = ScoringPhase::Rally;
                }
                None
            }
            ScoringPhase::Rally => {
                let ball = find_ball(world)?;
                let rect = Rect::of(world, ball)?;
                let player = if rect.left() <= -rect.size.x {
                    2
                } else if rect.left() >= self.screen.x {
                    1
                } else {
                    return None;
                };
                self.handle_score(world, ball, player, now, rng)
            }
        }
    }

    /// Award a point to `player` and park the ball
    pub fn handle_score(
        &mut self,
        world: &mut World,
        ball: Entity,
        player: u8,
        now: Millis,
        rng: &mut impl Rng,
    ) -> Option<ScoreEvent> {
        let points = world
            .query(&[ComponentKind::Score])
            .into_iter()
            .find_map(|e| {
                let score = world.get_mut::<Score>(e)?;
                (score.player == player).then(|| {
                    score.points += 1;
                    score.points
                })
            })?;

        if let Some(vel) = world.get_mut::<Velocity>(ball) {
            vel.0 = Vec2::ZERO;
        }
        if let Some(origin) = world.get::<Position>(ball).map(|p| p.0) {
            spawn_confetti(world, origin, now, rng);
        }

        let match_won = points >= self.winning_score;
        if match_won {
            log::info!("Player {} wins the match with {} points", player, points);
            self.phase = ScoringPhase::MatchOver { winner: player };
        } else {
            log::info!("Player {} scores ({} points)", player, points);
            self.phase = ScoringPhase::AwaitingReset {
                ball,
                deadline: Deadline::armed(now, self.reset_delay),
            };
        }

        Some(ScoreEvent {
            player,
            points,
            match_won,
        })
    }

    /// Center the ball and serve it diagonally in a random direction
    fn reset_ball(&self, world: &mut World, ball: Entity, rng: &mut impl Rng) {
        let Some(rect) = Rect::of(world, ball) else {
            return;
        };
        if let Some(pos) = world.get_mut::<Position>(ball) {
            pos.0 = self.screen / 2.0 - rect.size / 2.0;
        }
        let sign = |heads: bool| -> f32 { if heads { 1.0 } else { -1.0 } };
        let vx = sign(rng.random_bool(0.5)) * BALL_BASE_SPEED;
        let vy = sign(rng.random_bool(0.5)) * BALL_BASE_SPEED;
        if let Some(vel) = world.get_mut::<Velocity>(ball) {
            vel.0 = Vec2::new(vx, vy);
        }
        log::debug!("Ball served at ({}, {})", vx, vy);
    }
}
