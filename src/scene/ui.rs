//! Clickable buttons shared by the menu scenes

use crate::ecs::{Button, ButtonAction, ComponentKind, Dimensions, Entity, Position, World};
use crate::platform::InputState;
use crate::sim::collision::Rect;

pub const BUTTON_WIDTH: f32 = 200.0;
pub const BUTTON_HEIGHT: f32 = 50.0;

pub fn spawn_button(world: &mut World, x: f32, y: f32, action: ButtonAction, label: &str) -> Entity {
    let e = world.spawn();
    world.insert(e, Position::new(x, y));
    world.insert(e, Dimensions::new(BUTTON_WIDTH, BUTTON_HEIGHT));
    world.insert(e, Button::new(action, label));
    e
}

/// Update hover state and return the action of the first clicked button
///
/// A click is a left-button release inside the button.
pub fn update_buttons(world: &mut World, input: &InputState) -> Option<ButtonAction> {
    let mouse = input.mouse();
    let mut clicked = None;
    for e in world.query(&[
        ComponentKind::Button,
        ComponentKind::Position,
        ComponentKind::Dimensions,
    ]) {
        let Some(rect) = Rect::of(world, e) else {
            continue;
        };
        let Some(button) = world.get_mut::<Button>(e) else {
            continue;
        };
        button.hovered = rect.contains(mouse);
        button.pressed = button.hovered && input.left_pressed();
        if clicked.is_none() && input.left_releases().any(|pos| rect.contains(pos)) {
            clicked = Some(button.action);
        }
    }
    clicked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::GameState;
    use glam::Vec2;

    #[test]
    fn test_hover_and_click() {
        let mut world = World::new();
        let play = spawn_button(&mut world, 100.0, 100.0, ButtonAction::Goto(GameState::Options), "Options");
        spawn_button(&mut world, 100.0, 200.0, ButtonAction::ToggleMode, "Mode");

        let mut input = InputState::new();
        input.move_mouse(Vec2::new(150.0, 120.0));
        assert_eq!(update_buttons(&mut world, &input), None);
        assert!(world.get::<Button>(play).unwrap().hovered);

        input.click(Vec2::new(150.0, 220.0));
        assert_eq!(update_buttons(&mut world, &input), Some(ButtonAction::ToggleMode));
        assert!(!world.get::<Button>(play).unwrap().hovered);
    }

    #[test]
    fn test_click_outside_does_nothing() {
        let mut world = World::new();
        spawn_button(&mut world, 100.0, 100.0, ButtonAction::ToggleMode, "Mode");
        let mut input = InputState::new();
        input.click(Vec2::new(10.0, 10.0));
        assert_eq!(update_buttons(&mut world, &input), None);
    }
}
