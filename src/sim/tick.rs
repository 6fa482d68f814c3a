//! Per-frame simulation step
//!
//! Advances one level by a variable frame length in a fixed order: platform,
//! balls, bonuses, sprites, brick cleanup, then the level-clear check.

use super::context::{FrameContext, SimulationContext};
use super::game::{Game, GameEvent, GameState};
use crate::Time;
use crate::consts::VICTORY_BONUS_PER_LIFE;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left key held
    pub move_left: bool,
    /// Right key held
    pub move_right: bool,
    /// Fast-move modifier held
    pub fast: bool,
    /// Release held balls
    pub release: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Apply `input`, then advance the game by `frame_length` seconds
pub fn tick(game: &mut Game, ctx: &mut SimulationContext, input: &TickInput, frame_length: Time) {
    if input.pause {
        game.toggle_pause();
    }

    game.set_movement(true, input.move_left, input.fast);
    game.set_movement(false, input.move_right, input.fast);

    if input.release && game.state == GameState::Running {
        game.release_balls();
    }

    step(game, ctx, frame_length);
}

/// Advance the game without touching input state, for collaborators that
/// drive the platform through the direct setters
pub fn step(game: &mut Game, ctx: &mut SimulationContext, frame_length: Time) {
    if game.state != GameState::Running {
        return;
    }

    let Some(mut frame) = ctx.frame() else {
        log::warn!("Tick without an attempt in progress");
        return;
    };

    let width = game.level.width() as f32;
    let fastest = game.fastest_ball_speed();
    game.platform.tick(frame_length, width, fastest);

    tick_balls(game, &mut frame, frame_length);
    tick_bonuses(game, &mut frame, frame_length);
    game.tick_sprites(frame_length);

    game.level.flush_removed();

    if game.state == GameState::Running && game.level.is_level_cleared() {
        let attempt = &mut *frame.attempt;
        attempt.increase_score(VICTORY_BONUS_PER_LIFE * attempt.lives());
        game.state = GameState::Victory;
        log::info!("VICTORY on level {}, score {}", game.level.id(), attempt.score());
        game.push_event(GameEvent::Victory {
            score: attempt.score(),
        });
    }
}

/// Tick a snapshot of the balls so spawns and deaths don't disturb iteration
fn tick_balls(game: &mut Game, frame: &mut FrameContext<'_>, dt: Time) {
    let mut balls = game.take_balls();
    let mut last_ball = None;

    for i in 0..balls.len() {
        balls[i].tick(game, frame, dt);

        if balls[i].is_dead() {
            let others = balls.iter().filter(|b| !b.is_dead()).count() + game.balls().len();
            if others == 0 {
                last_ball = Some(balls[i].id);
                break;
            }
        }
    }

    // The last ball costs a life instead of leaving play
    balls.retain(|b| !b.is_dead() || Some(b.id) == last_ball);
    game.restore_balls(balls);

    if last_ball.is_some() {
        lose_life(game, frame);
    }
}

fn lose_life(game: &mut Game, frame: &mut FrameContext<'_>) {
    frame.attempt.remove_lives(1);
    let lives = frame.attempt.lives();

    if lives == 0 {
        game.state = GameState::Defeat;
        log::info!("DEFEAT on level {}, score {}", game.level.id(), frame.attempt.score());
        game.push_event(GameEvent::Defeat {
            score: frame.attempt.score(),
        });
    } else {
        log::info!("Ball lost, {lives} lives left");
        game.reset_balls();
        game.push_event(GameEvent::LifeLost { lives });
    }
}

fn tick_bonuses(game: &mut Game, frame: &mut FrameContext<'_>, dt: Time) {
    let mut bonuses = game.take_bonuses();

    for bonus in &mut bonuses {
        bonus.tick(game, frame.attempt, dt);
    }

    bonuses.retain(|b| !b.is_dead());
    game.restore_bonuses(bonuses);
}
