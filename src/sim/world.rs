//! Physics world
//!
//! Fixed-shape bodies, constant-velocity integration, and contact
//! detection filtered by collision categories. Only dynamic bodies move;
//! everything else is a static collider. There is no gravity and no
//! damping, so velocities change only when a body bounces.
//!
//! Bodies are stored in ascending id order, so contacts come out in the
//! same order for the same inputs.

use std::collections::BTreeSet;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::ArcSegment;
use super::collision::{
    CollisionResult, ball_arc_collision, ball_circle_collision, ball_rect_collision,
    reflect_velocity,
};

/// Collision category of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Ball,
    Boundary,
    Star,
    Player,
}

impl Category {
    /// Single-bit mask for this category
    pub fn mask(self) -> CategoryMask {
        match self {
            Category::Ball => CategoryMask::BALL,
            Category::Boundary => CategoryMask::BOUNDARY,
            Category::Star => CategoryMask::STAR,
            Category::Player => CategoryMask::PLAYER,
        }
    }
}

bitflags! {
    /// Set of collision categories
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CategoryMask: u32 {
        const BALL = 1;
        const BOUNDARY = 1 << 1;
        const STAR = 1 << 2;
        const PLAYER = 1 << 3;
    }
}

/// Stable body handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collider shape, in the body's local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned rectangle centered on the body position
    Rect { half_extents: Vec2 },
    /// Arc band centered on the body position, turned by the body rotation
    Arc(ArcSegment),
}

/// A rigid body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub category: Category,
    /// Categories this body bounces off
    pub collides_with: CategoryMask,
    /// Categories that raise a contact event when touched
    pub notifies_on: CategoryMask,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Orientation (radians), only meaningful for arcs
    pub rotation: f32,
    /// Moves under its velocity; static bodies never move
    pub dynamic: bool,
    /// Inactive bodies are neither integrated nor tested
    pub active: bool,
}

impl Body {
    fn new(category: Category, shape: Shape, pos: Vec2, dynamic: bool) -> Self {
        Self {
            id: BodyId(0),
            category,
            collides_with: CategoryMask::empty(),
            notifies_on: CategoryMask::empty(),
            shape,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            dynamic,
            active: true,
        }
    }

    /// A body that moves under its own velocity
    pub fn dynamic(category: Category, shape: Shape, pos: Vec2) -> Self {
        Self::new(category, shape, pos, true)
    }

    /// A body that never translates
    pub fn fixed(category: Category, shape: Shape, pos: Vec2) -> Self {
        Self::new(category, shape, pos, false)
    }

    pub fn collides_with(mut self, mask: CategoryMask) -> Self {
        self.collides_with = mask;
        self
    }

    pub fn notifies_on(mut self, mask: CategoryMask) -> Self {
        self.notifies_on = mask;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Two bodies that started touching this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    pub category_a: Category,
    pub category_b: Category,
    /// Contact point on `b`'s surface
    pub point: Vec2,
    /// Surface normal pointing from `b` toward `a`
    pub normal: Vec2,
}

/// The simulation world
#[derive(Debug, Clone, Default)]
pub struct World {
    bodies: Vec<Body>,
    next_id: u32,
    /// Pairs that overlapped at the end of the previous step
    touching: BTreeSet<(BodyId, BodyId)>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body, returning its handle
    pub fn insert(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    /// Remove a body; returns it if it existed
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.index_of(id)?;
        self.touching.retain(|&(a, b)| a != id && b != id);
        Some(self.bodies.remove(idx))
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(|i| &mut self.bodies[i])
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Enable or disable a body; disabling also forgets its contacts
    pub fn set_active(&mut self, id: BodyId, active: bool) {
        if let Some(body) = self.get_mut(id) {
            body.active = active;
        }
        if !active {
            self.touching.retain(|&(a, b)| a != id && b != id);
        }
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    /// Advance the world by `dt` seconds
    ///
    /// Moves every active dynamic body, bounces it off whatever it
    /// collides with, and returns contacts that began this step.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        for body in self.bodies.iter_mut().filter(|b| b.active && b.dynamic) {
            body.pos += body.vel * dt;
        }

        let mut contacts = Vec::new();
        let mut touching = BTreeSet::new();

        for i in 0..self.bodies.len() {
            if !(self.bodies[i].active && self.bodies[i].dynamic) {
                continue;
            }

            for j in 0..self.bodies.len() {
                if i == j || !self.bodies[j].active {
                    continue;
                }
                // Dynamic pairs are visited once, from the lower id
                if self.bodies[j].dynamic && j < i {
                    continue;
                }

                let (body, other) = pair_mut(&mut self.bodies, i, j);

                let collide = body.collides_with.contains(other.category.mask());
                let notify = body.notifies_on.contains(other.category.mask())
                    || other.notifies_on.contains(body.category.mask());
                if !collide && !notify {
                    continue;
                }

                let Some(hit) = overlap(body, other) else {
                    continue;
                };

                let key = (body.id.min(other.id), body.id.max(other.id));
                touching.insert(key);

                if collide {
                    // Only bounce when moving into the surface
                    if body.vel.dot(hit.normal) < 0.0 {
                        body.vel = reflect_velocity(body.vel, hit.normal);
                    }
                    body.pos += hit.normal * hit.penetration;
                }

                if notify && !self.touching.contains(&key) {
                    log::debug!(
                        "contact {:?}#{} / {:?}#{}",
                        body.category,
                        body.id.0,
                        other.category,
                        other.id.0
                    );
                    contacts.push(Contact {
                        a: body.id,
                        b: other.id,
                        category_a: body.category,
                        category_b: other.category,
                        point: hit.point,
                        normal: hit.normal,
                    });
                }
            }
        }

        self.touching = touching;
        contacts
    }
}

/// Body `i` mutably alongside body `j` (`i != j`)
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &Body) {
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &lo[j])
    }
}

/// Narrow-phase test of a moving circle against another body
fn overlap(body: &Body, other: &Body) -> Option<CollisionResult> {
    let Shape::Circle { radius } = body.shape else {
        return None;
    };
    match other.shape {
        Shape::Circle { radius: r } => ball_circle_collision(body.pos, radius, other.pos, r),
        Shape::Rect { half_extents } => {
            ball_rect_collision(body.pos, radius, other.pos, half_extents)
        }
        Shape::Arc(arc) => ball_arc_collision(body.pos, radius, other.pos, &arc.rotated(other.rotation)),
    }
}
