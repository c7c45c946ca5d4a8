//! Explicit framework state.
//!
//! A [`Session`] owns the two pieces of state that are process-wide in a
//! reflective framework: the node identity counter and the concretization
//! cache of generic record types. Every record type captures the session it
//! was built in; node ids and specializations are minted there.
//!
//! # Design
//!
//! - **Ids**: a relaxed atomic counter. Ids only need to be unique, not ordered
//!   across threads.
//! - **Cache**: `parking_lot::RwLock` over an `FxHashMap`, read-mostly.
//!   Cached specializations hold their generic base, which holds the session,
//!   so a session with a non-empty cache lives until [`Session::clear_cache`].


use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::model::RecordTypeRef;
use crate::node::NodeId;
use crate::types::TypeDesc;

/// Shared handle to a [`Session`].
pub type SharedSession = Arc<Session>;

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct SpecializationKey {
    pub(crate) generic: RecordTypeRef,
    pub(crate) args: Vec<TypeDesc>,
}

/// Node identity counter and generic concretization cache.
pub struct Session {
    next_id: AtomicU64,
    pub(crate) specializations: RwLock<FxHashMap<SpecializationKey, RecordTypeRef>>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            next_id: AtomicU64::new(1),
            specializations: RwLock::new(FxHashMap::default()),
        }
    }

    /// Create a new session behind an `Arc`.
    pub fn shared() -> SharedSession {
        Arc::new(Session::new())
    }

    /// Mint the next node id.
    pub fn next_node_id(&self) -> NodeId {
        NodeId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Id the next node will receive.
    pub fn peek_node_id(&self) -> NodeId {
        NodeId::new(self.next_id.load(Ordering::Relaxed))
    }

    /// Restart node numbering at `start`.
    ///
    /// Rewinding may hand out ids already carried by live nodes.
    pub fn reset_ids(&self, start: u64) {
        let previous = self.next_id.swap(start, Ordering::Relaxed);
        if start < previous {
            tracing::warn!(
                previous,
                start,
                "node id counter rewound; ids may be repeated"
            );
        }
    }

    /// Drop all cached specializations.
    pub fn clear_cache(&self) {
        let mut cache = self.specializations.write();
        tracing::debug!(entries = cache.len(), "clearing specialization cache");
        cache.clear();
    }

    /// Restart ids at 1 and clear the cache.
    pub fn reset(&self) {
        self.reset_ids(1);
        self.clear_cache();
    }

    /// Number of cached specializations.
    pub fn cached_specializations(&self) -> usize {
        self.specializations.read().len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .field("specializations", &self.cached_specializations())
            .finish()
    }
}
