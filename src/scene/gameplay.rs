//! Playing field for one or two players

use glam::Vec2;

use super::{GameState, Scene, SceneContext};
use crate::consts::*;
use crate::ecs::{
    AiControlled, Ball, ComponentKind, Dimensions, Entity, Paddle, PauseButton, Position, Score,
    Velocity, World,
};
use crate::platform::{InputState, Key};
use crate::renderer::{Color, Renderer, draw_gameplay, draw_particles, draw_scores};
use crate::sim::collision::Rect;
use crate::sim::tick::GameplaySystems;

const PAUSE_BUTTON_SIZE: f32 = 50.0;

#[derive(Debug)]
pub struct GameplayScene {
    two_players: bool,
    entities: Vec<Entity>,
    pause_button: Option<Entity>,
    systems: Option<GameplaySystems>,
}

impl GameplayScene {
    pub fn new(two_players: bool) -> Self {
        Self {
            two_players,
            entities: Vec::new(),
            pause_button: None,
            systems: None,
        }
    }

    pub fn single_player() -> Self {
        Self::new(false)
    }

    pub fn two_players() -> Self {
        Self::new(true)
    }

    pub fn systems(&self) -> Option<&GameplaySystems> {
        self.systems.as_ref()
    }

    /// Player who won the match, once it is over
    pub fn winner(&self) -> Option<u8> {
        self.systems.as_ref()?.scoring.winner()
    }

    /// Points for players 1 and 2
    pub fn scores(world: &World) -> [u32; 2] {
        let mut points = [0; 2];
        for e in world.query(&[ComponentKind::Score]) {
            if let Some(score) = world.get::<Score>(e) {
                if let Some(slot) = points.get_mut(usize::from(score.player).wrapping_sub(1)) {
                    *slot = score.points;
                }
            }
        }
        points
    }

    fn spawn_paddle(&mut self, world: &mut World, x: f32, y: f32) -> Entity {
        let e = world.spawn();
        world.insert(e, Position::new(x, y));
        world.insert(e, Dimensions::new(PADDLE_WIDTH, PADDLE_HEIGHT));
        world.insert(e, Velocity::default());
        self.entities.push(e);
        e
    }

    fn pause_clicked(&self, world: &World, input: &InputState) -> bool {
        self.pause_button
            .and_then(|e| Rect::of(world, e))
            .is_some_and(|rect| input.left_releases().any(|pos| rect.contains(pos)))
    }
}

impl Scene for GameplayScene {
    fn setup(&mut self, world: &mut World, ctx: &mut SceneContext) {
        let Vec2 { x: w, y: h } = ctx.screen.size();

        let pause = world.spawn();
        world.insert(pause, Position::new(w - 60.0, 10.0));
        world.insert(pause, Dimensions::new(PAUSE_BUTTON_SIZE, PAUSE_BUTTON_SIZE));
        world.insert(pause, PauseButton);
        self.pause_button = Some(pause);
        self.entities.push(pause);

        let paddle_y = h / 2.0 - PADDLE_HEIGHT / 2.0;
        let left = self.spawn_paddle(world, PADDLE_MARGIN, paddle_y);
        world.insert(left, Paddle { player: 1 });
        let right = self.spawn_paddle(world, w - PADDLE_MARGIN - PADDLE_WIDTH, paddle_y);
        if self.two_players {
            world.insert(right, Paddle { player: 2 });
        } else {
            world.insert(right, AiControlled);
        }

        let ball = world.spawn();
        world.insert(ball, Ball);
        world.insert(ball, Position::new(w / 2.0 - BALL_SIZE / 2.0, h / 2.0 - BALL_SIZE / 2.0));
        world.insert(ball, Dimensions::new(BALL_SIZE, BALL_SIZE));
        world.insert(ball, Velocity::new(BALL_BASE_SPEED, BALL_BASE_SPEED));
        self.entities.push(ball);

        for (player, x) in [(1, w / 4.0), (2, w * 3.0 / 4.0)] {
            let score = world.spawn();
            world.insert(score, Score::new(player));
            world.insert(score, Position::new(x, 50.0));
            self.entities.push(score);
        }

        self.systems = Some(GameplaySystems::new(
            ctx.screen.size(),
            &ctx.settings,
            ctx.clock.now(),
        ));
        log::info!(
            "Match started ({} players, {} mode, first to {})",
            if self.two_players { 2 } else { 1 },
            ctx.settings.mode.as_str(),
            ctx.settings.winning_score
        );
    }

    fn cleanup(&mut self, world: &mut World) {
        for e in self.entities.drain(..) {
            world.despawn(e);
        }
        // Spawned by the systems rather than by setup
        for kind in [ComponentKind::Particle, ComponentKind::PowerupItem] {
            for e in world.query(&[kind]) {
                world.despawn(e);
            }
        }
        self.pause_button = None;
        self.systems = None;
    }

    fn handle_input(&mut self, world: &mut World, input: &InputState, ctx: &mut SceneContext) {
        if input.key_pressed(Key::Escape) || self.pause_clicked(world, input) {
            ctx.states.set(GameState::Paused);
            return;
        }
        if let Some(systems) = self.systems.as_mut() {
            systems.input(world, &ctx.settings, input);
        }
    }

    fn update(&mut self, world: &mut World, ctx: &mut SceneContext, dt: f32) {
        let Some(systems) = self.systems.as_mut() else {
            return;
        };
        let now = ctx.clock.now();
        systems.update(world, &ctx.settings, now, dt, &mut ctx.rng);
    }

    fn draw(&self, world: &World, ctx: &SceneContext, renderer: &mut dyn Renderer) {
        draw_gameplay(world, ctx.clock.now(), renderer);
        draw_scores(world, renderer);
        draw_particles(world, renderer);
        if let Some(winner) = self.winner() {
            let pos = ctx.screen.center() - Vec2::new(80.0, 10.0);
            renderer.text(pos, &format!("Player {} wins!", winner), Color::YELLOW);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::PowerupItem;
    use crate::ecs::PowerupKind;
    use crate::renderer::DrawList;
    use crate::scene::Screen;
    use crate::settings::Settings;

    fn ctx(state: GameState) -> SceneContext {
        SceneContext::new(
            Settings::default(),
            Screen::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            state,
        )
    }

    #[test]
    fn test_single_player_setup() {
        let mut world = World::new();
        let mut ctx = ctx(GameState::PlayingSinglePlayer);
        let mut scene = GameplayScene::single_player();
        scene.setup(&mut world, &mut ctx);

        assert_eq!(world.count(ComponentKind::Paddle), 1);
        assert_eq!(world.count(ComponentKind::AiControlled), 1);
        assert_eq!(world.count(ComponentKind::Ball), 1);
        assert_eq!(world.count(ComponentKind::Score), 2);
        assert_eq!(world.count(ComponentKind::PauseButton), 1);

        let ai = world.first(&[ComponentKind::AiControlled]).unwrap();
        assert_eq!(world.get::<Position>(ai).unwrap().0, Vec2::new(735.0, 250.0));
        let ball = world.first(&[ComponentKind::Ball]).unwrap();
        assert_eq!(world.get::<Position>(ball).unwrap().0, Vec2::new(390.0, 290.0));
    }

    #[test]
    fn test_two_player_setup() {
        let mut world = World::new();
        let mut ctx = ctx(GameState::PlayingTwoPlayers);
        let mut scene = GameplayScene::two_players();
        scene.setup(&mut world, &mut ctx);
        assert_eq!(world.count(ComponentKind::Paddle), 2);
        assert_eq!(world.count(ComponentKind::AiControlled), 0);
    }

    #[test]
    fn test_cleanup_removes_everything() {
        let mut world = World::new();
        let mut ctx = ctx(GameState::PlayingSinglePlayer);
        let mut scene = GameplayScene::single_player();
        scene.setup(&mut world, &mut ctx);

        let item = world.spawn();
        world.insert(item, Position::new(400.0, 300.0));
        world.insert(
            item,
            PowerupItem {
                kind: PowerupKind::BigPaddle,
                spawned_at: 0,
            },
        );
        crate::sim::particle::spawn_confetti(&mut world, Vec2::ZERO, 0, &mut ctx.rng);

        scene.cleanup(&mut world);
        assert!(world.is_empty());
        assert!(scene.systems().is_none());
    }

    #[test]
    fn test_escape_and_pause_button_pause() {
        let mut world = World::new();
        let mut ctx = ctx(GameState::PlayingTwoPlayers);
        let mut scene = GameplayScene::two_players();
        scene.setup(&mut world, &mut ctx);

        let mut input = InputState::new();
        input.press(Key::Escape);
        scene.handle_input(&mut world, &input, &mut ctx);
        assert_eq!(ctx.states.current(), GameState::Paused);

        ctx.states.set(GameState::PlayingTwoPlayers);
        let mut input = InputState::new();
        input.click(Vec2::new(SCREEN_WIDTH - 35.0, 35.0));
        scene.handle_input(&mut world, &input, &mut ctx);
        assert_eq!(ctx.states.current(), GameState::Paused);
    }

    #[test]
    fn test_match_won_shows_winner() {
        let mut world = World::new();
        let mut ctx = ctx(GameState::PlayingTwoPlayers);
        ctx.settings.winning_score = 1;
        let mut scene = GameplayScene::two_players();
        scene.setup(&mut world, &mut ctx);

        let ball = world.first(&[ComponentKind::Ball]).unwrap();
        world.get_mut::<Position>(ball).unwrap().0.x = -BALL_SIZE;
        world.get_mut::<Velocity>(ball).unwrap().0 = Vec2::ZERO;
        scene.update(&mut world, &mut ctx, 0.0);

        assert_eq!(scene.winner(), Some(2));
        assert_eq!(GameplayScene::scores(&world), [0, 1]);

        let mut list = DrawList::new();
        scene.draw(&world, &ctx, &mut list);
        assert!(list.texts().any(|t| t == "Player 2 wins!"));
        assert_eq!(list.circle_count(), CONFETTI_COUNT);
    }
}
