//! Last-created identifier per resource kind.
//!
//! Lets a caller say "the bookmark I just created" instead of carrying the
//! generated id around. An entry appears on the first successful create of
//! a kind, is overwritten by every later one and is never removed; a
//! delete, successful or not, leaves it in place.
//!
//! Concurrent creates of the same kind are last-write-wins. The tracker is
//! injected into `SentinelClient`, so sessions that must not see each
//! other's resources get their own instance.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{Result, SentinelError};
use crate::resource::{ResourceKind, ResourceRef};

#[derive(Debug, Default)]
pub struct ResourceTracker {
    last_created: RwLock<HashMap<ResourceKind, String>>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_last_created(&self, kind: ResourceKind, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!(%kind, %id, "recording last created resource");
        // The map holds plain strings, so a poisoned lock still has
        // consistent contents.
        self.last_created
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, id);
    }

    /// Id of the most recently created `kind`.
    ///
    /// # Errors
    ///
    /// `SentinelError::NoPriorResource` when nothing of that kind has been
    /// created through this tracker.
    pub fn last_created(&self, kind: ResourceKind) -> Result<String> {
        self.last_created
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .ok_or(SentinelError::NoPriorResource { kind })
    }

    /// Turns a reference into a concrete id.
    pub fn resolve(&self, kind: ResourceKind, reference: ResourceRef<'_>) -> Result<String> {
        match reference {
            ResourceRef::Id(id) => Ok(id.to_string()),
            ResourceRef::LastCreated => self.last_created(kind),
        }
    }
}
