//! Ordered collection of navigable output devices.
//!
//! The collection is an immutable snapshot. `initialize` builds the
//! replacement off to the side and publishes it with a single pointer
//! swap, so concurrent readers see either the old or the new set.

use super::device::{AudioError, Endpoint};
use super::hidden::HiddenSetFilter;
use super::system::AudioSystem;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

pub struct DeviceRegistry {
    system: Arc<dyn AudioSystem>,
    hidden: HiddenSetFilter,
    endpoints: RwLock<Arc<Vec<Endpoint>>>,
}

impl DeviceRegistry {
    /// Create an empty registry. Call [`initialize`](Self::initialize) to populate it.
    pub fn new(system: Arc<dyn AudioSystem>, hidden: HiddenSetFilter) -> Self {
        Self {
            system,
            hidden,
            endpoints: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Enumerate devices and publish the new snapshot.
    ///
    /// On failure the previous snapshot stays in place. Returns the number
    /// of endpoints published.
    pub fn initialize(&self) -> Result<usize, AudioError> {
        let endpoints = self.build()?;
        let count = endpoints.len();
        *self.endpoints.write() = Arc::new(endpoints);
        info!(count, "Audio device registry refreshed");
        Ok(count)
    }

    fn build(&self) -> Result<Vec<Endpoint>, AudioError> {
        let default = self.system.default_endpoint()?;
        let default_id = default.as_ref().map(|d| d.id.clone());
        let hidden = self.hidden.snapshot();

        let mut default_listed = false;
        let mut endpoints = Vec::new();
        for descriptor in self.system.active_endpoints()? {
            if descriptor.id.is_empty() {
                continue;
            }
            let is_default = default_id.as_deref() == Some(descriptor.id.as_str());
            default_listed |= is_default;
            if hidden.device_ids.contains(&descriptor.id) {
                debug!(device_id = %descriptor.id, "Skipping hidden device");
                continue;
            }
            endpoints.push(
                Endpoint::new(descriptor.id, descriptor.name, descriptor.control)
                    .with_default(is_default),
            );
        }

        // Some systems leave the default endpoint out of the active list
        if let Some(descriptor) = default {
            if !default_listed
                && !descriptor.id.is_empty()
                && !hidden.device_ids.contains(&descriptor.id)
            {
                debug!(device_id = %descriptor.id, "Adding unlisted default device");
                endpoints.insert(
                    0,
                    Endpoint::new(descriptor.id, descriptor.name, descriptor.control)
                        .with_default(true),
                );
            }
        }

        Ok(endpoints)
    }

    /// Number of endpoints in the current snapshot.
    pub fn count(&self) -> usize {
        self.endpoints.read().len()
    }

    /// Endpoint at `index` in the current snapshot.
    pub fn at(&self, index: usize) -> Result<Endpoint, AudioError> {
        let endpoints = self.snapshot();
        endpoints
            .get(index)
            .cloned()
            .ok_or(AudioError::IndexOutOfRange {
                index,
                count: endpoints.len(),
            })
    }

    /// The current snapshot, for iteration.
    pub fn snapshot(&self) -> Arc<Vec<Endpoint>> {
        Arc::clone(&self.endpoints.read())
    }
}
