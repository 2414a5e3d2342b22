//! Main menu

use glam::Vec2;

use super::ui::{BUTTON_WIDTH, spawn_button, update_buttons};
use super::{GameState, Scene, SceneContext};
use crate::ecs::{ButtonAction, Entity, World};
use crate::platform::InputState;
use crate::renderer::{Color, Renderer, draw_buttons};

const FIRST_BUTTON_Y: f32 = 200.0;
const BUTTON_SPACING: f32 = 70.0;

const ENTRIES: [(&str, GameState); 4] = [
    ("Play 1P", GameState::PlayingSinglePlayer),
    ("Play 2P", GameState::PlayingTwoPlayers),
    ("Options", GameState::Options),
    ("Exit", GameState::Exiting),
];

#[derive(Debug, Default)]
pub struct MainMenuScene {
    entities: Vec<Entity>,
}

impl MainMenuScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for MainMenuScene {
    fn setup(&mut self, world: &mut World, ctx: &mut SceneContext) {
        let x = ctx.screen.width / 2.0 - BUTTON_WIDTH / 2.0;
        self.entities = ENTRIES
            .iter()
            .enumerate()
            .map(|(i, (label, state))| {
                let y = FIRST_BUTTON_Y + i as f32 * BUTTON_SPACING;
                spawn_button(world, x, y, ButtonAction::Goto(*state), label)
            })
            .collect();
        log::info!("Main menu ready");
    }

    fn cleanup(&mut self, world: &mut World) {
        for e in self.entities.drain(..) {
            world.despawn(e);
        }
    }

    fn handle_input(&mut self, world: &mut World, input: &InputState, ctx: &mut SceneContext) {
        if let Some(ButtonAction::Goto(state)) = update_buttons(world, input) {
            ctx.states.set(state);
        }
    }

    fn draw(&self, world: &World, ctx: &SceneContext, renderer: &mut dyn Renderer) {
        let title = Vec2::new(ctx.screen.width / 2.0 - 60.0, 100.0);
        renderer.text(title, "PADDLE", Color::WHITE);
        draw_buttons(world, renderer);
    }
}
