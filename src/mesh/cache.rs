//! Per-surface caches of immutable indices and pools of query objects.
//!
//! Each index (topology, geodesic, signed distance) is built at most once per
//! surface and shared through an `Arc`. Query objects hold scratch space and
//! an `Arc` of their index; the pool keeps one `Arc` of each, and an entry is
//! free for reuse when that is the only reference left.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::surface::Surface;
use crate::algo::geodesic::{GeodesicBase, GeodesicQuery};
use crate::algo::signed_distance::{OctreeOptions, SignedDistanceBase, SignedDistanceQuery};
use crate::topology::{TopologyBase, TopologyHelper};

/// A query object that borrows an immutable index.
pub(crate) trait Pooled {
    /// The shared index type.
    type Base;

    /// The index this object queries.
    fn pooled_base(&self) -> &Arc<Self::Base>;
}

struct PoolState<H: Pooled> {
    base: Option<Arc<H::Base>>,
    helpers: Vec<Arc<H>>,
    next: usize,
}

/// Lazily built index plus a pool of query objects over it.
pub(crate) struct Pool<H: Pooled> {
    state: Mutex<PoolState<H>>,
}

impl<H: Pooled> Default for Pool<H> {
    fn default() -> Self {
        Self {
            state: Mutex::new(PoolState {
                base: None,
                helpers: Vec::new(),
                next: 0,
            }),
        }
    }
}

impl<H: Pooled> Pool<H> {
    fn lock(&self) -> MutexGuard<'_, PoolState<H>> {
        // The state is only pointer swaps, so a panic elsewhere cannot leave it half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached index, building it with `build` if there is none or the
    /// cached one is rejected by `accept`.
    ///
    /// Construction runs without the lock held. If two threads race, the
    /// first one to finish installs its index and the other adopts it.
    pub fn base(
        &self,
        accept: impl Fn(&H::Base) -> bool,
        build: impl FnOnce() -> H::Base,
    ) -> Arc<H::Base> {
        if let Some(base) = self.lock().base.as_ref().filter(|b| accept(b)) {
            return Arc::clone(base);
        }

        let built = Arc::new(build());

        let mut state = self.lock();
        if let Some(base) = state.base.as_ref().filter(|b| accept(b)) {
            return Arc::clone(base);
        }
        state.base = Some(Arc::clone(&built));
        // Pooled helpers point at the index being replaced.
        state.helpers.clear();
        state.next = 0;
        built
    }

    /// A free query object over `base`, creating one if every pooled object
    /// is in use.
    pub fn helper(&self, base: &Arc<H::Base>, make: impl FnOnce(Arc<H::Base>) -> H) -> Arc<H> {
        {
            let mut state = self.lock();
            let count = state.helpers.len();
            for offset in 0..count {
                let index = (state.next + offset) % count;
                let helper = &state.helpers[index];
                if Arc::strong_count(helper) == 1 && Arc::ptr_eq(helper.pooled_base(), base) {
                    let helper = Arc::clone(helper);
                    state.next = (index + 1) % count;
                    return helper;
                }
            }
        }

        let helper = Arc::new(make(Arc::clone(base)));
        let mut state = self.lock();
        let is_current = state
            .base
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, base));
        if is_current {
            state.helpers.push(Arc::clone(&helper));
            debug!(pooled = state.helpers.len(), "grew query pool");
        }
        helper
    }

    /// Drop the cached index and forget all pooled objects.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.base = None;
        state.helpers.clear();
        state.next = 0;
    }

    #[cfg(test)]
    pub fn pooled(&self) -> usize {
        self.lock().helpers.len()
    }
}

/// All caches owned by a [`Surface`].
#[derive(Default)]
pub(crate) struct SurfaceCaches {
    pub topology: Pool<TopologyHelper>,
    pub geodesic: Pool<GeodesicQuery>,
    pub signed_distance: Pool<SignedDistanceQuery>,
}

impl Surface {
    /// The unsorted topology index (a sorted one is returned if cached).
    pub fn topology(&self) -> Arc<TopologyBase> {
        self.topology_base(false)
    }

    /// The topology index, built on first use.
    ///
    /// Requesting `sorted` when the cached index is unsorted rebuilds it in
    /// sorted mode. An unsorted request is served by a sorted index.
    pub fn topology_base(&self, sorted: bool) -> Arc<TopologyBase> {
        self.caches.topology.base(
            |base| !sorted || base.is_sorted(),
            || TopologyBase::from_surface(self, sorted),
        )
    }

    /// A pooled topology helper for neighbourhood queries.
    pub fn topology_helper(&self, sorted: bool) -> Arc<TopologyHelper> {
        let base = self.topology_base(sorted);
        self.caches.topology.helper(&base, TopologyHelper::new)
    }

    /// The geodesic index, built on first use.
    pub fn geodesic_base(&self) -> Arc<GeodesicBase> {
        self.caches
            .geodesic
            .base(|_| true, || GeodesicBase::new(self))
    }

    /// A pooled geodesic query object.
    ///
    /// The returned handle is exclusive to the caller until dropped; each
    /// thread should hold its own.
    pub fn geodesic_query(&self) -> Arc<GeodesicQuery> {
        let base = self.geodesic_base();
        self.caches.geodesic.helper(&base, GeodesicQuery::new)
    }

    /// The signed-distance octree, built on first use with default options.
    pub fn signed_distance_base(&self) -> Arc<SignedDistanceBase> {
        self.caches.signed_distance.base(
            |_| true,
            || SignedDistanceBase::new(self, &OctreeOptions::default()),
        )
    }

    /// A pooled signed-distance query object.
    pub fn signed_distance_query(&self) -> Arc<SignedDistanceQuery> {
        let base = self.signed_distance_base();
        self.caches
            .signed_distance
            .helper(&base, SignedDistanceQuery::new)
    }

    /// Drop every cached index and pooled query object.
    ///
    /// Objects already handed out keep their own reference to the index
    /// they were created with and remain usable.
    pub fn invalidate_caches(&self) {
        self.caches.topology.invalidate();
        self.caches.geodesic.invalidate();
        self.caches.signed_distance.invalidate();
        debug!("invalidated surface caches");
    }
}
