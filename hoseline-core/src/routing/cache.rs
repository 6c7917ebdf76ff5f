//! Process-local memo of provider answers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use geo::Coord;

use crate::{RouteResult, TransportMode};

/// Cached provider answer: `Some` for a route, `None` for "no route".
pub type CachedRoute = Option<RouteResult>;

/// Cache key identifying one (origin, destination, mode) triple.
///
/// Coordinates are compared bit for bit; two requests hit the same entry only
/// when their coordinates are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    origin: [u64; 2],
    destination: [u64; 2],
    mode: TransportMode,
}

impl RouteKey {
    /// Build a key for the given triple.
    pub fn new(origin: Coord<f64>, destination: Coord<f64>, mode: TransportMode) -> Self {
        Self {
            origin: coord_bits(origin),
            destination: coord_bits(destination),
            mode,
        }
    }
}

fn coord_bits(coord: Coord<f64>) -> [u64; 2] {
    [coord.x.to_bits(), coord.y.to_bits()]
}

/// Route answers shared across evaluations within one session.
///
/// Cloning yields another handle to the same storage. Entries are never
/// removed or mutated once computed; a concurrent second insert for the same
/// key replaces the first with an equal value. Dropping the cache loses
/// nothing but time.
#[derive(Debug, Clone, Default)]
pub struct RouteCache {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: RwLock<HashMap<RouteKey, CachedRoute>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RouteCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previous answer.
    pub fn get(&self, key: &RouteKey) -> Option<CachedRoute> {
        let entries = self
            .inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let found = entries.get(key).cloned();
        let counter = if found.is_some() {
            &self.inner.hits
        } else {
            &self.inner.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Record an answer. Last writer wins.
    pub fn insert(&self, key: RouteKey, value: CachedRoute) {
        self.inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    /// Number of cached triples.
    pub fn len(&self) -> usize {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookups answered from the cache so far.
    pub fn hits(&self) -> u64 {
        self.inner.hits.load(Ordering::Relaxed)
    }

    /// Lookups that had to go to the provider so far.
    pub fn misses(&self) -> u64 {
        self.inner.misses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(mode: TransportMode) -> RouteKey {
        RouteKey::new(Coord { x: 1.0, y: 2.0 }, Coord { x: 3.0, y: 4.0 }, mode)
    }

    #[rstest]
    fn stores_routes_and_negative_answers() {
        let cache = RouteCache::new();
        let route = RouteResult::straight(42.0, Coord { x: 1.0, y: 2.0 }, Coord { x: 3.0, y: 4.0 });
        cache.insert(key(TransportMode::Driving), Some(route.clone()));
        cache.insert(key(TransportMode::ServiceDriving), None);

        assert_eq!(cache.get(&key(TransportMode::Driving)), Some(Some(route)));
        assert_eq!(cache.get(&key(TransportMode::ServiceDriving)), Some(None));
        assert_eq!(cache.get(&key(TransportMode::Walking)), None);
        assert_eq!(cache.len(), 2);
        assert_eq!((cache.hits(), cache.misses()), (2, 1));
    }

    #[rstest]
    fn clones_share_storage() {
        let cache = RouteCache::new();
        let other = cache.clone();
        other.insert(key(TransportMode::Cycling), None);
        assert!(!cache.is_empty());
    }

    #[rstest]
    fn direction_matters() {
        let a = Coord { x: 1.0, y: 2.0 };
        let b = Coord { x: 3.0, y: 4.0 };
        assert_ne!(
            RouteKey::new(a, b, TransportMode::Walking),
            RouteKey::new(b, a, TransportMode::Walking)
        );
    }
}
