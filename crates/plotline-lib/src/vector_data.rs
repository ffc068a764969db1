//! VectorData - Layered line art passed through the pipeline
//!
//! Maps positive integer layer ids to [`LineCollection`]s. A missing id means the layer
//! does not exist, which is distinct from an existing but empty layer.

use crate::collection::union_rect;
use crate::{DataError, LineCollection, MergeConfig, ReloopConfig, Result};

use geo::Rect;
use rand::Rng;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Layer identifier; valid ids are 1 and above
pub type LayerId = i64;

/// Layer id to line collection map, iterated in ascending id order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorData {
    layers: BTreeMap<LayerId, LineCollection>,
}

#[inline]
fn check_layer_id(layer_id: LayerId) -> Result<()> {
    if layer_id < 1 {
        return Err(DataError::InvalidLayerId(layer_id));
    }
    Ok(())
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl VectorData {
    /// Create an empty vector data
    pub fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn layers(&self) -> &BTreeMap<LayerId, LineCollection> {
        &self.layers
    }

    /// Existing layer ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys().copied()
    }

    /// Layers for the given ids, skipping ids that do not exist
    pub fn layers_from_ids<'a>(
        &'a self,
        layer_ids: impl IntoIterator<Item = LayerId> + 'a,
    ) -> impl Iterator<Item = &'a LineCollection> + 'a {
        layer_ids
            .into_iter()
            .filter_map(move |id| self.layers.get(&id))
    }

    #[inline]
    pub fn exists(&self, layer_id: LayerId) -> bool {
        self.layers.contains_key(&layer_id)
    }

    /// Get a layer by id
    pub fn get(&self, layer_id: LayerId) -> Result<&LineCollection> {
        self.layers
            .get(&layer_id)
            .ok_or(DataError::LayerNotFound(layer_id))
    }

    /// Get a mutable layer by id
    pub fn get_mut(&mut self, layer_id: LayerId) -> Result<&mut LineCollection> {
        self.layers
            .get_mut(&layer_id)
            .ok_or(DataError::LayerNotFound(layer_id))
    }

    /// Store `lc` at `layer_id`, replacing any existing layer
    pub fn set(&mut self, layer_id: LayerId, lc: LineCollection) -> Result<()> {
        check_layer_id(layer_id)?;
        self.layers.insert(layer_id, lc);
        Ok(())
    }

    /// Lowest positive id not in use
    pub fn free_id(&self) -> LayerId {
        let mut id = 1;
        // Keys are sorted: the first gap is the answer
        for &existing in self.layers.keys() {
            if existing > id {
                break;
            }
            if existing == id {
                id += 1;
            }
        }
        id
    }

    /// Add `lc` to a layer
    ///
    /// With no id, a new layer is created at [`free_id`](Self::free_id). An existing
    /// layer is extended, never replaced.
    ///
    /// # Returns
    /// The id of the layer that received the lines
    pub fn add(&mut self, lc: LineCollection, layer_id: Option<LayerId>) -> Result<LayerId> {
        let layer_id = match layer_id {
            Some(id) => {
                check_layer_id(id)?;
                id
            }
            None => self.free_id(),
        };

        match self.layers.entry(layer_id) {
            Entry::Occupied(mut entry) => entry.get_mut().extend(lc),
            Entry::Vacant(entry) => {
                entry.insert(lc);
            }
        }
        Ok(layer_id)
    }

    /// Add every layer of `other` at the same id
    pub fn extend(&mut self, other: VectorData) {
        for (layer_id, lc) in other.layers {
            // Ids coming from another VectorData are already valid
            match self.layers.entry(layer_id) {
                Entry::Occupied(mut entry) => entry.get_mut().extend(lc),
                Entry::Vacant(entry) => {
                    entry.insert(lc);
                }
            }
        }
    }

    /// True if no layer holds any line
    pub fn is_empty(&self) -> bool {
        self.layers.values().all(LineCollection::is_empty)
    }

    /// Remove and return a layer
    pub fn pop(&mut self, layer_id: LayerId) -> Result<LineCollection> {
        self.layers
            .remove(&layer_id)
            .ok_or(DataError::LayerNotFound(layer_id))
    }

    /// Number of layers
    #[inline]
    pub fn count(&self) -> usize {
        self.layers.len()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for layer in self.layers.values_mut() {
            layer.translate(dx, dy);
        }
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        for layer in self.layers.values_mut() {
            layer.scale(sx, sy);
        }
    }

    pub fn rotate(&mut self, angle: f64) {
        for layer in self.layers.values_mut() {
            layer.rotate(angle);
        }
    }

    /// Bounds of the given layers (all layers when `None`)
    ///
    /// Missing and empty layers are ignored. Returns `NoGeometry` if nothing remains.
    pub fn bounds(&self, layer_ids: Option<&[LayerId]>) -> Result<Rect<f64>> {
        let bounds = match layer_ids {
            Some(ids) => self
                .layers_from_ids(ids.iter().copied())
                .filter_map(|lc| lc.bounds().ok())
                .reduce(union_rect),
            None => self
                .layers
                .values()
                .filter_map(|lc| lc.bounds().ok())
                .reduce(union_rect),
        };
        bounds.ok_or(DataError::NoGeometry)
    }

    /// Total drawn length across all layers
    pub fn length(&self) -> f64 {
        self.layers.values().map(LineCollection::length).sum()
    }

    /// Total pen-up travel across all layers (layers are measured independently)
    pub fn pen_up_length(&self) -> f64 {
        self.layers.values().map(|lc| lc.pen_up_length().total).sum()
    }

    /// Total number of segments across all layers
    pub fn segment_count(&self) -> usize {
        self.layers.values().map(LineCollection::segment_count).sum()
    }

    /// Merge lines in every layer, layers processed in parallel
    pub fn merge(&mut self, config: &MergeConfig) {
        #[cfg(feature = "profiling")]
        profiling::scope!("vector_data::merge");

        self.layers
            .par_iter_mut()
            .for_each(|(_, lc)| lc.merge(config.tolerance, config.flip));
    }

    /// Reloop closed lines in every layer, in ascending layer order
    pub fn reloop<R: Rng + ?Sized>(&mut self, config: &ReloopConfig, rng: &mut R) {
        for lc in self.layers.values_mut() {
            lc.reloop(config.tolerance, config.seam, rng);
        }
    }
}
