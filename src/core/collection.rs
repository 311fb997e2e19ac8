//! Collection state for one photo widget
//!
//! [`PhotoCollection`] is the plain state machine: mode, ordered items and
//! the busy flag. It performs no I/O and sends no notifications; the
//! [`CollectionManager`](crate::core::manager::CollectionManager) wraps it
//! with acquisition, confirmation and listener plumbing.

use crate::core::asset::ImageAsset;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Whether a widget holds one image or many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionMode {
    /// At most one image; a new acquisition replaces the current one
    #[default]
    Single,
    /// Ordered list of images; acquisitions append
    Multiple,
}

impl CollectionMode {
    /// Check if this is multiple mode
    pub fn is_multiple(&self) -> bool {
        matches!(self, CollectionMode::Multiple)
    }
}

impl Display for CollectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionMode::Single => write!(f, "single"),
            CollectionMode::Multiple => write!(f, "multiple"),
        }
    }
}

/// Mutable state of one widget instance
#[derive(Debug, Clone)]
pub struct PhotoCollection {
    mode: CollectionMode,
    items: Vec<ImageAsset>,
    busy: bool,
}

impl PhotoCollection {
    /// Create an empty collection
    pub fn new(mode: CollectionMode) -> Self {
        Self {
            mode,
            items: Vec::new(),
            busy: false,
        }
    }

    /// Create a collection holding preloaded items.
    ///
    /// In single mode only the last item is kept.
    pub fn with_items(mode: CollectionMode, items: Vec<ImageAsset>) -> Self {
        let mut collection = Self::new(mode);
        collection.add_all(items);
        collection
    }

    /// Collection mode, fixed for the instance lifetime
    pub fn mode(&self) -> CollectionMode {
        self.mode
    }

    /// Items in insertion order
    pub fn items(&self) -> &[ImageAsset] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an acquisition is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark the start of an acquisition.
    ///
    /// Returns `false` if one is already in flight.
    pub fn try_begin_acquisition(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    /// Mark the end of an acquisition (any terminal outcome)
    pub fn end_acquisition(&mut self) {
        self.busy = false;
    }

    /// Add a batch of assets.
    ///
    /// Multiple mode appends in order. Single mode keeps only the last asset
    /// of the batch, replacing any current item. Returns the assets that
    /// entered the collection, in order.
    pub fn add_all(&mut self, assets: Vec<ImageAsset>) -> Vec<ImageAsset> {
        match self.mode {
            CollectionMode::Multiple => {
                self.items.extend(assets.iter().cloned());
                assets
            }
            CollectionMode::Single => match assets.into_iter().last() {
                Some(last) => {
                    self.items.clear();
                    self.items.push(last.clone());
                    vec![last]
                }
                None => Vec::new(),
            },
        }
    }

    /// Index that `remove(index)` would act on, if any.
    ///
    /// Single mode targets the lone item regardless of `index`.
    pub fn removal_target(&self, index: usize) -> Option<usize> {
        match self.mode {
            CollectionMode::Single => (!self.items.is_empty()).then_some(0),
            CollectionMode::Multiple => (index < self.items.len()).then_some(index),
        }
    }

    /// The item a removal at `index` would take out
    pub fn item_to_remove(&self, index: usize) -> Option<ImageAsset> {
        self.removal_target(index)
            .and_then(|target| self.items.get(target).cloned())
    }

    /// Remove an item, preserving the order of the rest
    pub fn remove(&mut self, index: usize) -> Option<ImageAsset> {
        let target = self.removal_target(index)?;
        Some(self.items.remove(target))
    }

    /// Ordered list of canonical payloads
    pub fn payloads(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.encoded_payload().to_string())
            .collect()
    }
}
