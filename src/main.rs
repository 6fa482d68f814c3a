//! CleanOut headless driver
//!
//! Plays through the built-in levels with a simple autopilot and prints a
//! JSON summary of the run.
//!
//! Usage: `cleanout [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use serde::Serialize;

    use cleanout::Settings;
    use cleanout::sim::{Game, GameEvent, GameState, SimulationContext, TickInput, tick};

    /// Ten minutes of play at 60 fps
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// Outcome of a headless run
    #[derive(Debug, Serialize)]
    pub struct Summary {
        pub frames: u64,
        pub levels_cleared: u32,
        pub lives_lost: u32,
        pub score: u32,
        pub lives: u32,
        pub final_state: GameState,
    }

    /// Follow the lowest free ball, releasing held balls right away
    fn autopilot(game: &Game) -> TickInput {
        let mut input = TickInput {
            release: game.balls().iter().any(|b| b.is_held()),
            ..Default::default()
        };

        let lowest = game
            .balls()
            .iter()
            .filter(|b| !b.is_held())
            .min_by(|a, b| a.pos().y.total_cmp(&b.pos().y));

        if let Some(ball) = lowest {
            let offset = ball.pos().x - game.platform.position();
            // Aim slightly off center so the ball doesn't loop straight up and down
            let dead_zone = game.platform.size() / 8.0;
            input.move_left = offset < -dead_zone;
            input.move_right = offset > dead_zone;
            input.fast = offset.abs() > game.platform.size();
        }

        input
    }

    pub fn run(settings: Settings) -> Option<Summary> {
        let frame_length = settings.max_frame_length;
        let mut ctx = SimulationContext::new(settings);
        let mut game = ctx.start_game()?;

        let mut frames = 0;
        let mut levels_cleared = 0;
        let mut lives_lost = 0;

        while frames < MAX_FRAMES {
            let input = autopilot(&game);
            tick(&mut game, &mut ctx, &input, frame_length);
            frames += 1;

            for event in game.drain_events() {
                match event {
                    GameEvent::LifeLost { .. } => lives_lost += 1,
                    GameEvent::Victory { .. } => levels_cleared += 1,
                    GameEvent::Defeat { .. } => {}
                }
            }

            match game.state {
                GameState::Victory => match ctx.start_next_level() {
                    Some(next) => game = next,
                    None => break,
                },
                GameState::Defeat => break,
                GameState::Running | GameState::Paused => {}
            }
        }

        let attempt = ctx.end_attempt()?;
        Some(Summary {
            frames,
            levels_cleared,
            lives_lost,
            score: attempt.score(),
            lives: attempt.lives(),
            final_state: game.state,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("CleanOut (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => cleanout::Settings::load(std::path::Path::new(&path)),
        None => cleanout::Settings::default(),
    };

    let Some(summary) = headless::run(settings) else {
        log::warn!("Could not start a game");
        return;
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not serialize summary: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web
}
