//! Circle-overlap queries.
//!
//! Everything here is a pure read of positions and radii. The pairwise scan
//! is O(n²), which is fine for the tens-to-hundreds of entities a simulation
//! is expected to hold.

use serde::{Deserialize, Serialize};

use crate::entity::{Collidable, Entity, EntityId};

/// Two entities whose circles overlapped after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
    /// How far the circles interpenetrate.
    pub depth: f32,
}

impl Contact {
    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }
}

/// True iff the center distance is strictly below the sum of the radii.
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    a.center().distance(&b.center()) < a.collision_radius() + b.collision_radius()
}

/// Closest element of `others` whose center lies within `max_distance` of
/// `actor`'s center. `actor` itself is skipped if it appears in `others`.
/// Ties go to the first candidate encountered.
pub fn nearest_within<'a, T, I>(actor: &T, others: I, max_distance: f32) -> Option<&'a T>
where
    T: Collidable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let origin = actor.center();
    let mut best: Option<(&'a T, f32)> = None;

    for other in others {
        if std::ptr::eq(actor, other) {
            continue;
        }
        let distance = origin.distance(&other.center());
        if distance > max_distance {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((other, distance)),
        }
    }

    best.map(|(other, _)| other)
}

/// Every overlapping pair, in collection order (`a` before `b`).
pub fn find_contacts(entities: &[Entity]) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for (i, a) in entities.iter().enumerate() {
        for b in &entities[i + 1..] {
            if overlaps(a, b) {
                let depth = a.radius() + b.radius() - a.position().distance(&b.position());
                contacts.push(Contact {
                    a: a.id(),
                    b: b.id(),
                    depth,
                });
            }
        }
    }

    contacts
}
