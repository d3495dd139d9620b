use std::collections::BTreeMap;

use crate::assets::store::PreparedImage;

/// Content substituted for an image key at composite time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DynamicOverlay {
    /// Draw this image instead of the asset.
    Image(PreparedImage),
    /// Skip sprites bound to the key.
    Hidden,
}

/// Read-only overlay map handed to the compositor.
///
/// Copied from the animation description when a prepare starts and left untouched
/// until the next prepare.
#[derive(Clone, Debug, Default)]
pub struct DynamicOverlays {
    entries: BTreeMap<String, DynamicOverlay>,
}

impl DynamicOverlays {
    pub(crate) fn from_map(entries: &BTreeMap<String, DynamicOverlay>) -> Self {
        Self {
            entries: entries.clone(),
        }
    }

    /// Overlay registered for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&DynamicOverlay> {
        self.entries.get(key)
    }

    /// Number of overlays.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if there are no overlays.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
