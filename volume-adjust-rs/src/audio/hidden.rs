//! Devices and processes excluded from navigation.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// IDs of hidden devices and names of hidden processes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenSet {
    pub device_ids: HashSet<String>,
    pub process_names: HashSet<String>,
}

impl HiddenSet {
    pub fn new<D, P>(device_ids: D, process_names: P) -> Self
    where
        D: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        Self {
            device_ids: device_ids.into_iter().collect(),
            process_names: process_names.into_iter().collect(),
        }
    }

    /// True if the hidden device sets differ in any element.
    pub fn devices_differ(&self, other: &HiddenSet) -> bool {
        self.device_ids
            .symmetric_difference(&other.device_ids)
            .next()
            .is_some()
    }

    /// True if the hidden process sets differ in any element.
    pub fn processes_differ(&self, other: &HiddenSet) -> bool {
        self.process_names
            .symmetric_difference(&other.process_names)
            .next()
            .is_some()
    }
}

/// Shared handle to the current hidden set.
///
/// Written by the settings collaborator, read during registry refresh and
/// session listing.
#[derive(Debug, Clone, Default)]
pub struct HiddenSetFilter {
    inner: Arc<RwLock<HiddenSet>>,
}

impl HiddenSetFilter {
    pub fn new(set: HiddenSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    pub fn snapshot(&self) -> HiddenSet {
        self.inner.read().clone()
    }

    /// Replace the hidden set, returning the previous one.
    pub fn replace(&self, set: HiddenSet) -> HiddenSet {
        std::mem::replace(&mut *self.inner.write(), set)
    }
}
