//! Power-up spawning, pickup and timed effects
//!
//! At most one item lies on the field. The ball collects it for whichever
//! paddle touched the ball last; the effect is applied once and reversed
//! once its window has passed.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::ecs::{
    ActivePowerup, ComponentKind, Dimensions, Entity, Position, PowerupItem, PowerupKind, World,
};
use crate::sim::collision::{Rect, find_ball};
use crate::sim::time::{Deadline, Millis};

/// Drops a new item on the field every spawn interval
#[derive(Debug, Clone)]
pub struct PowerupSpawner {
    last_spawn: Millis,
    interval: Millis,
}

impl PowerupSpawner {
    /// Spawner whose first interval starts at `now`
    pub fn new(now: Millis, interval: Millis) -> Self {
        Self {
            last_spawn: now,
            interval,
        }
    }

    pub fn last_spawn(&self) -> Millis {
        self.last_spawn
    }

    /// Spawn an item if the interval has passed and none is on the field
    ///
    /// The item lands in the middle half of the width and the middle 60% of
    /// the height. Its kind is drawn from `kinds`.
    pub fn update(
        &mut self,
        world: &mut World,
        now: Millis,
        screen: Vec2,
        kinds: &[PowerupKind],
        rng: &mut impl Rng,
    ) -> Option<Entity> {
        if world.count(ComponentKind::PowerupItem) > 0 {
            return None;
        }
        if !Deadline::armed(self.last_spawn, self.interval).has_lapsed(now) {
            return None;
        }
        if kinds.is_empty() {
            return None;
        }

        let kind = kinds[rng.random_range(0..kinds.len())];
        let x = rng.random_range(screen.x * 0.25..=screen.x * 0.75);
        let y = rng.random_range(screen.y * 0.2..=screen.y * 0.8);

        let item = world.spawn();
        world.insert(item, Position::new(x, y));
        world.insert(item, Dimensions::new(POWERUP_SIZE, POWERUP_SIZE));
        world.insert(item, PowerupItem { kind, spawned_at: now });
        self.last_spawn = now;
        log::info!("Spawned {:?} power-up at ({:.0}, {:.0})", kind, x, y);
        Some(item)
    }
}

/// Tracks the last paddle to hit the ball and hands it collected items
#[derive(Debug, Clone, Default)]
pub struct PowerupCollector {
    last_paddle_hit: Option<Entity>,
}

impl PowerupCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_paddle_hit(&self) -> Option<Entity> {
        self.last_paddle_hit
    }

    pub fn record_hit(&mut self, paddle: Entity) {
        self.last_paddle_hit = Some(paddle);
    }

    /// Forget the last paddle (a new rally starts)
    pub fn clear(&mut self) {
        self.last_paddle_hit = None;
    }

    /// Collect the item the ball overlaps, if any
    ///
    /// The item is removed even when no paddle has touched the ball yet; in
    /// that case nothing is granted. Returns the paddle that received it.
    pub fn collect(
        &mut self,
        world: &mut World,
        now: Millis,
        duration: Millis,
        screen_height: f32,
    ) -> Option<(Entity, PowerupKind)> {
        let ball = find_ball(world)?;
        let ball_rect = Rect::of(world, ball)?;

        let items = world.query(&[
            ComponentKind::PowerupItem,
            ComponentKind::Position,
            ComponentKind::Dimensions,
        ]);
        let (item, kind) = items.into_iter().find_map(|item| {
            let rect = Rect::of(world, item)?;
            let kind = world.get::<PowerupItem>(item)?.kind;
            ball_rect.overlaps(&rect).then_some((item, kind))
        })?;
        world.despawn(item);

        let Some(paddle) = self.last_paddle_hit.filter(|p| world.contains(*p)) else {
            log::debug!("{:?} power-up collected with no paddle to receive it", kind);
            return None;
        };
        grant(world, paddle, kind, now, duration, screen_height);
        Some((paddle, kind))
    }
}

/// Give `paddle` a power-up
///
/// Same kind already active: the window restarts at `now`. Different kind:
/// the old effect is reversed before the new one replaces it.
pub fn grant(
    world: &mut World,
    paddle: Entity,
    kind: PowerupKind,
    now: Millis,
    duration: Millis,
    screen_height: f32,
) {
    if let Some(active) = world.get::<ActivePowerup>(paddle).copied() {
        if active.kind == kind {
            if let Some(active) = world.get_mut::<ActivePowerup>(paddle) {
                active.activated_at = now;
                active.duration = duration;
            }
            log::info!("Paddle {} {:?} extended", paddle, kind);
            return;
        }
        if active.applied {
            reverse_effect(world, paddle, active.kind, screen_height);
        }
    }
    world.insert(paddle, ActivePowerup::new(kind, now, duration));
    log::info!("Paddle {} received {:?}", paddle, kind);
}

/// Apply pending effects and expire finished ones
pub fn apply_powerup_effects(world: &mut World, now: Millis, screen_height: f32) {
    for paddle in world.query(&[ComponentKind::ActivePowerup]) {
        let Some(active) = world.get::<ActivePowerup>(paddle).copied() else {
            continue;
        };
        if active.window().has_lapsed(now) {
            if active.applied {
                reverse_effect(world, paddle, active.kind, screen_height);
            }
            world.remove::<ActivePowerup>(paddle);
            log::info!("Paddle {} {:?} expired", paddle, active.kind);
        } else if !active.applied {
            apply_effect(world, paddle, active.kind, screen_height);
            if let Some(active) = world.get_mut::<ActivePowerup>(paddle) {
                active.applied = true;
            }
        }
    }
}

fn apply_effect(world: &mut World, paddle: Entity, kind: PowerupKind, screen_height: f32) {
    match kind {
        PowerupKind::BigPaddle => resize_paddle(world, paddle, BIG_PADDLE_BONUS, screen_height),
        PowerupKind::Unknown => {}
    }
}

fn reverse_effect(world: &mut World, paddle: Entity, kind: PowerupKind, screen_height: f32) {
    match kind {
        PowerupKind::BigPaddle => resize_paddle(world, paddle, -BIG_PADDLE_BONUS, screen_height),
        PowerupKind::Unknown => {}
    }
}

/// Change paddle height by `delta`, keeping its center where it was
///
/// Near an edge the paddle is pushed back inside `[0, screen_height]`.
fn resize_paddle(world: &mut World, paddle: Entity, delta: f32, screen_height: f32) {
    let Some(dims) = world.get_mut::<Dimensions>(paddle) else {
        return;
    };
    let old = dims.height;
    dims.height = (old + delta).max(MIN_PADDLE_HEIGHT);
    let height = dims.height;
    let grown = height - old;
    if let Some(pos) = world.get_mut::<Position>(paddle) {
        pos.0.y = (pos.0.y - grown / 2.0).clamp(0.0, (screen_height - height).max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Ball, Paddle};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn screen() -> Vec2 {
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn spawn_paddle(world: &mut World) -> Entity {
        let paddle = world.spawn();
        world.insert(paddle, Paddle { player: 1 });
        world.insert(paddle, Position::new(50.0, 250.0));
        world.insert(paddle, Dimensions::new(PADDLE_WIDTH, PADDLE_HEIGHT));
        paddle
    }

    fn spawn_item_under_ball(world: &mut World, kind: PowerupKind) -> Entity {
        let ball = find_ball(world).unwrap_or_else(|| {
            let ball = world.spawn();
            world.insert(ball, Ball);
            world.insert(ball, Position::new(400.0, 300.0));
            world.insert(ball, Dimensions::new(BALL_SIZE, BALL_SIZE));
            ball
        });
        let pos = world.get::<Position>(ball).unwrap().0;
        let item = world.spawn();
        world.insert(item, Position(pos));
        world.insert(item, Dimensions::new(POWERUP_SIZE, POWERUP_SIZE));
        world.insert(item, PowerupItem { kind, spawned_at: 0 });
        item
    }

    #[test]
    fn test_spawn_interval_and_single_item() {
        let mut world = World::new();
        let mut spawner = PowerupSpawner::new(0, POWERUP_SPAWN_INTERVAL_MS);
        let mut rng = Pcg32::seed_from_u64(11);
        let kinds = [PowerupKind::BigPaddle];

        assert!(spawner.update(&mut world, 10_000, screen(), &kinds, &mut rng).is_none());
        let item = spawner.update(&mut world, 10_001, screen(), &kinds, &mut rng).unwrap();
        let pos = world.get::<Position>(item).unwrap().0;
        assert!((200.0..=600.0).contains(&pos.x));
        assert!((120.0..=480.0).contains(&pos.y));
        assert_eq!(spawner.last_spawn(), 10_001);

        // Never two at once
        assert!(spawner.update(&mut world, 50_000, screen(), &kinds, &mut rng).is_none());
        assert_eq!(world.count(ComponentKind::PowerupItem), 1);
    }

    #[test]
    fn test_spawn_with_no_kinds_is_noop() {
        let mut world = World::new();
        let mut spawner = PowerupSpawner::new(0, 10);
        let mut rng = Pcg32::seed_from_u64(11);
        assert!(spawner.update(&mut world, 100, screen(), &[], &mut rng).is_none());
    }

    #[test]
    fn test_collect_grants_last_paddle() {
        let mut world = World::new();
        let paddle = spawn_paddle(&mut world);
        let item = spawn_item_under_ball(&mut world, PowerupKind::BigPaddle);
        let mut collector = PowerupCollector::new();
        collector.record_hit(paddle);

        let got = collector.collect(&mut world, 2000, POWERUP_DURATION_MS, SCREEN_HEIGHT);
        assert_eq!(got, Some((paddle, PowerupKind::BigPaddle)));
        assert!(!world.contains(item));
        let active = world.get::<ActivePowerup>(paddle).unwrap();
        assert_eq!(active.activated_at, 2000);
        assert!(!active.applied);
    }

    #[test]
    fn test_collect_without_last_paddle_consumes_item() {
        let mut world = World::new();
        let paddle = spawn_paddle(&mut world);
        let item = spawn_item_under_ball(&mut world, PowerupKind::BigPaddle);
        let mut collector = PowerupCollector::new();

        assert_eq!(collector.collect(&mut world, 0, POWERUP_DURATION_MS, SCREEN_HEIGHT), None);
        assert!(!world.contains(item));
        assert!(world.get::<ActivePowerup>(paddle).is_none());
    }

    #[test]
    fn test_big_paddle_applies_once_and_reverses() {
        let mut world = World::new();
        let paddle = spawn_paddle(&mut world);
        grant(&mut world, paddle, PowerupKind::BigPaddle, 1000, POWERUP_DURATION_MS, SCREEN_HEIGHT);

        apply_powerup_effects(&mut world, 1000, SCREEN_HEIGHT);
        apply_powerup_effects(&mut world, 3000, SCREEN_HEIGHT);
        assert_eq!(world.get::<Dimensions>(paddle).unwrap().height, PADDLE_HEIGHT + BIG_PADDLE_BONUS);
        assert_eq!(world.get::<Position>(paddle).unwrap().0.y, 225.0);

        apply_powerup_effects(&mut world, 6000, SCREEN_HEIGHT);
        assert!(world.get::<ActivePowerup>(paddle).is_some());

        apply_powerup_effects(&mut world, 6001, SCREEN_HEIGHT);
        assert!(world.get::<ActivePowerup>(paddle).is_none());
        assert_eq!(world.get::<Dimensions>(paddle).unwrap().height, PADDLE_HEIGHT);
        assert_eq!(world.get::<Position>(paddle).unwrap().0.y, 250.0);
    }

    #[test]
    fn test_effects_twice_in_one_frame_apply_once() {
        let mut world = World::new();
        let paddle = spawn_paddle(&mut world);
        grant(&mut world, paddle, PowerupKind::BigPaddle, 500, POWERUP_DURATION_MS, SCREEN_HEIGHT);
        apply_powerup_effects(&mut world, 500, SCREEN_HEIGHT);
        apply_powerup_effects(&mut world, 500, SCREEN_HEIGHT);
        assert_eq!(world.get::<Dimensions>(paddle).unwrap().height, PADDLE_HEIGHT + BIG_PADDLE_BONUS);
    }

    #[test]
    fn test_big_paddle_stays_on_screen_at_edges() {
        let mut world = World::new();
        let top = spawn_paddle(&mut world);
        world.get_mut::<Position>(top).unwrap().0.y = 0.0;
        let bottom = spawn_paddle(&mut world);
        world.get_mut::<Position>(bottom).unwrap().0.y = SCREEN_HEIGHT - PADDLE_HEIGHT;

        for paddle in [top, bottom] {
            grant(&mut world, paddle, PowerupKind::BigPaddle, 0, POWERUP_DURATION_MS, SCREEN_HEIGHT);
        }
        apply_powerup_effects(&mut world, 0, SCREEN_HEIGHT);

        let grown = PADDLE_HEIGHT + BIG_PADDLE_BONUS;
        assert_eq!(world.get::<Dimensions>(top).unwrap().height, grown);
        assert_eq!(world.get::<Position>(top).unwrap().0.y, 0.0);
        assert_eq!(world.get::<Position>(bottom).unwrap().0.y, SCREEN_HEIGHT - grown);

        // Shrinking back stays inside as well
        apply_powerup_effects(&mut world, POWERUP_DURATION_MS + 1, SCREEN_HEIGHT);
        assert_eq!(world.get::<Position>(top).unwrap().0.y, 25.0);
        assert_eq!(world.get::<Position>(bottom).unwrap().0.y, SCREEN_HEIGHT - PADDLE_HEIGHT - 25.0);
    }

    #[test]
    fn test_regrant_same_kind_extends() {
        let mut world = World::new();
        let paddle = spawn_paddle(&mut world);
        grant(&mut world, paddle, PowerupKind::BigPaddle, 0, POWERUP_DURATION_MS, SCREEN_HEIGHT);
        apply_powerup_effects(&mut world, 0, SCREEN_HEIGHT);

        grant(&mut world, paddle, PowerupKind::BigPaddle, 4000, POWERUP_DURATION_MS, SCREEN_HEIGHT);
        apply_powerup_effects(&mut world, 6000, SCREEN_HEIGHT);
        // Still applied exactly once
        assert_eq!(world.get::<Dimensions>(paddle).unwrap().height, PADDLE_HEIGHT + BIG_PADDLE_BONUS);

        apply_powerup_effects(&mut world, 9001, SCREEN_HEIGHT);
        assert_eq!(world.get::<Dimensions>(paddle).unwrap().height, PADDLE_HEIGHT);
    }

    #[test]
    fn test_regrant_other_kind_reverses_first() {
        let mut world = World::new();
        let paddle = spawn_paddle(&mut world);
        grant(&mut world, paddle, PowerupKind::BigPaddle, 0, POWERUP_DURATION_MS, SCREEN_HEIGHT);
        apply_powerup_effects(&mut world, 0, SCREEN_HEIGHT);

        grant(&mut world, paddle, PowerupKind::Unknown, 100, POWERUP_DURATION_MS, SCREEN_HEIGHT);
        assert_eq!(world.get::<Dimensions>(paddle).unwrap().height, PADDLE_HEIGHT);
        assert_eq!(world.get::<ActivePowerup>(paddle).unwrap().kind, PowerupKind::Unknown);

        // Unknown kinds are harmless no-ops
        apply_powerup_effects(&mut world, 200, SCREEN_HEIGHT);
        apply_powerup_effects(&mut world, 10_000, SCREEN_HEIGHT);
        assert_eq!(world.get::<Dimensions>(paddle).unwrap().height, PADDLE_HEIGHT);
        assert!(world.get::<ActivePowerup>(paddle).is_none());
    }

    #[test]
    fn test_despawned_paddle_receives_nothing() {
        let mut world = World::new();
        let paddle = spawn_paddle(&mut world);
        spawn_item_under_ball(&mut world, PowerupKind::BigPaddle);
        let mut collector = PowerupCollector::new();
        collector.record_hit(paddle);
        world.despawn(paddle);
        assert_eq!(collector.collect(&mut world, 0, POWERUP_DURATION_MS, SCREEN_HEIGHT), None);
        assert_eq!(world.count(ComponentKind::PowerupItem), 0);
    }
}
