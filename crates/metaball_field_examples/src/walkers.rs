use std::collections::HashMap;

use glam::Vec2;
use metaball_field::prelude::EntityHost;
use rand::Rng as RngCore;

/// A bouncing point standing in for a game sprite.
#[derive(Clone, Copy, Debug)]
pub struct Walker {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Walkers keyed by id that bounce inside a rectangle and act as an [`EntityHost`].
#[derive(Debug, Default)]
pub struct Walkers {
    bounds: Vec2,
    walkers: HashMap<u32, Walker>,
    next_id: u32,
}

impl Walkers {
    pub fn new(bounds: Vec2) -> Self {
        Self {
            bounds,
            walkers: HashMap::new(),
            next_id: 0,
        }
    }

    /// Spawns a walker at a random position with a random velocity up to `max_speed`.
    pub fn spawn_random(&mut self, rng: &mut dyn RngCore, max_speed: f32) -> (u32, Vec2) {
        let position = Vec2::new(rand01(rng) * self.bounds.x, rand01(rng) * self.bounds.y);
        let velocity = Vec2::new(rand01(rng) * 2.0 - 1.0, rand01(rng) * 2.0 - 1.0) * max_speed;
        let id = self.spawn(Walker { position, velocity });
        (id, position)
    }

    pub fn spawn(&mut self, walker: Walker) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.walkers.insert(id, walker);
        id
    }

    pub fn despawn(&mut self, id: u32) -> bool {
        self.walkers.remove(&id).is_some()
    }

    /// Advances all walkers by `dt`, reflecting them off the bounds.
    pub fn step(&mut self, dt: f32) {
        for walker in self.walkers.values_mut() {
            walker.position += walker.velocity * dt;
            if walker.position.x < 0.0 || walker.position.x > self.bounds.x {
                walker.velocity.x = -walker.velocity.x;
                walker.position.x = walker.position.x.clamp(0.0, self.bounds.x);
            }
            if walker.position.y < 0.0 || walker.position.y > self.bounds.y {
                walker.velocity.y = -walker.velocity.y;
                walker.position.y = walker.position.y.clamp(0.0, self.bounds.y);
            }
        }
    }
}

impl EntityHost for Walkers {
    type Entity = u32;

    fn entity_position(&self, entity: u32) -> Option<Vec2> {
        self.walkers.get(&entity).map(|w| w.position)
    }
}

fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}
