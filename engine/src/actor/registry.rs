//! Thing Registry
//!
//! Map objects live in a [`SlotMap`], so a key to a removed thing simply
//! stops resolving instead of dangling. [`ThingRef`] is the non-owning
//! reference a camera keeps; it bumps the thing's `tracked_by` count on
//! assignment and drops it on release.

use slotmap::{SlotMap, new_key_type};

use crate::fixed::{Angle, Fixed, V3Fixed};
use crate::map::GroupId;

new_key_type! {
    /// Generation-checked handle to a [`Thing`].
    pub struct ThingKey;
}

/// Default thing height in map units.
pub const THING_HEIGHT: i32 = 56;

#[derive(Clone, Debug, PartialEq)]
pub struct Thing {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub height: Fixed,
    pub angle: Angle,
    pub group: GroupId,
    /// Number of live [`ThingRef`]s pointing here.
    pub tracked_by: u32,
}

impl Thing {
    pub fn new(position: V3Fixed, group: GroupId) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            height: Fixed::from_int(THING_HEIGHT),
            angle: Angle::EAST,
            group,
            tracked_by: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> V3Fixed {
        V3Fixed::new(self.x, self.y, self.z)
    }

    pub fn set_position(&mut self, position: V3Fixed) {
        self.x = position.x;
        self.y = position.y;
        self.z = position.z;
    }
}

#[derive(Debug, Default)]
pub struct ThingRegistry {
    things: SlotMap<ThingKey, Thing>,
}

impl ThingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, thing: Thing) -> ThingKey {
        self.things.insert(thing)
    }

    /// Remove a thing. Outstanding [`ThingRef`]s stop resolving.
    pub fn remove(&mut self, key: ThingKey) -> Option<Thing> {
        self.things.remove(key)
    }

    #[inline]
    pub fn get(&self, key: ThingKey) -> Option<&Thing> {
        self.things.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: ThingKey) -> Option<&mut Thing> {
        self.things.get_mut(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.things.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }
}

/// Non-owning reference to a thing, with back-link bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThingRef {
    key: Option<ThingKey>,
}

impl ThingRef {
    pub const fn none() -> Self {
        Self { key: None }
    }

    /// Point at `target`, releasing whatever was referenced before.
    pub fn set(&mut self, registry: &mut ThingRegistry, target: Option<ThingKey>) {
        if let Some(thing) = self.key.take().and_then(|old| registry.get_mut(old)) {
            thing.tracked_by = thing.tracked_by.saturating_sub(1);
        }
        if let Some(new) = target {
            if let Some(thing) = registry.get_mut(new) {
                thing.tracked_by += 1;
                self.key = Some(new);
            }
        }
    }

    #[inline]
    pub fn clear(&mut self, registry: &mut ThingRegistry) {
        self.set(registry, None);
    }

    #[inline]
    pub fn key(&self) -> Option<ThingKey> {
        self.key
    }

    /// The referenced thing, if it is still alive.
    #[inline]
    pub fn resolve<'a>(&self, registry: &'a ThingRegistry) -> Option<&'a Thing> {
        self.key.and_then(|key| registry.get(key))
    }

    /// Set but pointing at a removed thing.
    pub fn is_stale(&self, registry: &ThingRegistry) -> bool {
        self.key.is_some() && self.resolve(registry).is_none()
    }

    /// Drop a stale key without touching any thing.
    pub fn forget(&mut self) {
        self.key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_at(registry: &mut ThingRegistry, x: i32) -> ThingKey {
        registry.spawn(Thing::new(V3Fixed::units(x, 0, 0), GroupId(0)))
    }

    #[test]
    fn test_set_updates_back_links() {
        let mut registry = ThingRegistry::new();
        let a = spawn_at(&mut registry, 0);
        let b = spawn_at(&mut registry, 64);
        let mut tracker = ThingRef::none();

        tracker.set(&mut registry, Some(a));
        assert_eq!(registry.get(a).map(|t| t.tracked_by), Some(1));

        tracker.set(&mut registry, Some(b));
        assert_eq!(registry.get(a).map(|t| t.tracked_by), Some(0));
        assert_eq!(registry.get(b).map(|t| t.tracked_by), Some(1));

        tracker.clear(&mut registry);
        assert_eq!(registry.get(b).map(|t| t.tracked_by), Some(0));
        assert_eq!(tracker.key(), None);
    }

    #[test]
    fn test_removed_thing_stops_resolving() {
        let mut registry = ThingRegistry::new();
        let a = spawn_at(&mut registry, 0);
        let mut tracker = ThingRef::none();
        tracker.set(&mut registry, Some(a));

        registry.remove(a);
        assert!(tracker.resolve(&registry).is_none());
        assert!(tracker.is_stale(&registry));

        // A new thing in the recycled slot must not be mistaken for the old one.
        let _b = spawn_at(&mut registry, 32);
        assert!(tracker.resolve(&registry).is_none());
    }

    #[test]
    fn test_set_to_dead_key_leaves_reference_empty() {
        let mut registry = ThingRegistry::new();
        let a = spawn_at(&mut registry, 0);
        registry.remove(a);

        let mut tracker = ThingRef::none();
        tracker.set(&mut registry, Some(a));
        assert_eq!(tracker.key(), None);
    }
}
