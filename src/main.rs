//! Paddle ECS entry point
//!
//! Native headless runner: loads settings, starts a single-player match and
//! plays it for a fixed number of frames against a recording renderer. A
//! windowed frontend drives `Game::frame` the same way.
//!
//! Usage: `paddle-ecs [settings.json] [frames]`

use paddle_ecs::platform::InputState;
use paddle_ecs::renderer::DrawList;
use paddle_ecs::scene::{GameState, GameplayScene};
use paddle_ecs::{Game, GameError, Settings};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 60 * 60;

fn run(settings: Settings, frames: u32) -> Result<(), GameError> {
    let mut game = Game::new(settings)?;
    game.context_mut().states.set(GameState::PlayingSinglePlayer);

    let mut input = InputState::new();
    let mut renderer = DrawList::new();
    let mut last_scores = [0, 0];

    for frame in 0..frames {
        renderer.clear();
        if !game.frame(&input, FRAME_DT, &mut renderer)? {
            break;
        }
        input.clear_events();

        let scores = GameplayScene::scores(game.world());
        if scores != last_scores {
            log::info!("Frame {}: score {} - {}", frame, scores[0], scores[1]);
            last_scores = scores;
        }
    }

    log::info!(
        "Finished at {} ms with score {} - {}",
        game.context().clock.now(),
        last_scores[0],
        last_scores[1]
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Paddle ECS (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Could not load {}: {}, using defaults", path, e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    if let Err(e) = run(settings, frames) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser frontend; the library is driven by the host page
}
