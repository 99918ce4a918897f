//! Registry of acquired resource handles keyed by capability.

use std::collections::HashMap;

use super::ResourceHandle;
use crate::ids::HandleId;
use crate::permission::PermissionCapability;

/// Holds at most one live handle per capability.
///
/// Dropping the registry stops everything it still holds.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    handles: HashMap<PermissionCapability, ResourceHandle>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` under its capability.
    ///
    /// A handle already held for that capability is stopped and removed
    /// first; its id is returned.
    pub fn register(&mut self, handle: ResourceHandle) -> Option<HandleId> {
        let capability = handle.capability();
        let replaced = self.handles.remove(&capability).map(|previous| {
            previous.stop();
            previous.id().clone()
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            capability = %capability,
            handle_id = %handle.id(),
            replaced = ?replaced,
            "resource handle registered"
        );

        self.handles.insert(capability, handle);
        replaced
    }

    pub fn get(&self, capability: PermissionCapability) -> Option<&ResourceHandle> {
        self.handles.get(&capability)
    }

    pub fn contains(&self, capability: PermissionCapability) -> bool {
        self.handles.contains_key(&capability)
    }

    /// Stops and removes the handle for `capability`. Returns whether one was held.
    pub fn release(&mut self, capability: PermissionCapability) -> bool {
        match self.handles.remove(&capability) {
            Some(handle) => {
                handle.stop();
                #[cfg(feature = "tracing")]
                tracing::debug!(capability = %capability, handle_id = %handle.id(), "resource handle released");
                true
            }
            None => false,
        }
    }

    /// Releases every held capability and returns how many were held.
    pub fn release_all(&mut self) -> usize {
        let held = self.held();
        held.into_iter()
            .filter(|capability| self.release(*capability))
            .count()
    }

    /// Held capabilities in catalog order.
    pub fn held(&self) -> Vec<PermissionCapability> {
        let mut held: Vec<_> = self.handles.keys().copied().collect();
        held.sort();
        held
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}
