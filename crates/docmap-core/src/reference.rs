//! Parent/child reference relations without cyclic serialization.
//!
//! Only the forward side of a relation (the parent's children) is written.
//! The child's link back to its parent is a [`BackLink`], which the mapper
//! never writes or reads; after the parent has been read and placed in an
//! `Arc`, [`ReferenceRelation::link`] points every child back at it.
//!
//! The link is a `Weak`, so a parent holding its children does not leak
//! through the cycle, and it is set through `OnceLock`, so linking needs only
//! shared access to the already-built graph.

use log::debug;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// A set-once, weak link from a child to its parent.
///
/// Links take no part in equality: two children compare equal on their
/// persisted fields whether or not either is linked. `Debug` reports only
/// whether the link is set, so printing a child never walks the cycle.
pub struct BackLink<P> {
    target: OnceLock<Weak<P>>,
}

impl<P> BackLink<P> {
    pub fn new() -> Self {
        Self {
            target: OnceLock::new(),
        }
    }

    /// The parent, if linked and still alive.
    pub fn get(&self) -> Option<Arc<P>> {
        self.target.get().and_then(Weak::upgrade)
    }

    pub fn is_linked(&self) -> bool {
        self.target.get().is_some()
    }

    /// Point this link at `parent`. Returns `false` if it was already set;
    /// an existing link is never replaced.
    pub fn link(&self, parent: &Arc<P>) -> bool {
        self.target.set(Arc::downgrade(parent)).is_ok()
    }
}

impl<P> Default for BackLink<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for BackLink<P> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<P> PartialEq for BackLink<P> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<P> Eq for BackLink<P> {}

impl<P> fmt::Debug for BackLink<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackLink")
            .field("linked", &self.is_linked())
            .finish()
    }
}

/// A named parent/child relation: where a parent keeps its children and
/// where each child keeps its [`BackLink`].
///
/// The name matches the one given to `managed` and `back_reference` on the
/// two descriptors.
pub struct ReferenceRelation<P, C> {
    name: &'static str,
    children: fn(&P) -> &[C],
    back_link: fn(&C) -> &BackLink<P>,
}

impl<P, C> ReferenceRelation<P, C> {
    pub const fn new(
        name: &'static str,
        children: fn(&P) -> &[C],
        back_link: fn(&C) -> &BackLink<P>,
    ) -> Self {
        Self {
            name,
            children,
            back_link,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Link every child of `parent` back to it. Returns how many links were
    /// newly set; children that were already linked keep their link.
    pub fn link(&self, parent: &Arc<P>) -> usize {
        let linked = (self.children)(parent)
            .iter()
            .filter(|child| (self.back_link)(child).link(parent))
            .count();
        debug!("relation {:?}: linked {linked} children", self.name);
        linked
    }
}

impl<P, C> Clone for ReferenceRelation<P, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C> Copy for ReferenceRelation<P, C> {}

impl<P, C> fmt::Debug for ReferenceRelation<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceRelation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
