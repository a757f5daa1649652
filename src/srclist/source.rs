// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sky-model source types.

use indexmap::IndexMap;
use marlu::RADec;

use super::FluxDensityType;

/// A collection of sky-model sources, keyed by name. The insertion order is
/// the order components are flattened in when the list is partitioned into
/// chunks, so it must be stable for reproducible runs.
#[derive(Debug, Clone, Default)]
pub struct SourceList(IndexMap<String, Source>);

impl SourceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The total number of components over all sources.
    pub fn num_components(&self) -> usize {
        self.0.values().map(|src| src.components.len()).sum()
    }
}

impl From<IndexMap<String, Source>> for SourceList {
    fn from(map: IndexMap<String, Source>) -> Self {
        Self(map)
    }
}

impl std::ops::Deref for SourceList {
    type Target = IndexMap<String, Source>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for SourceList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// A sky-model source, comprising one or more components.
#[derive(Debug, Clone)]
pub struct Source {
    /// The components associated with the source.
    pub components: Vec<SourceComponent>,
}

/// Information on a single sky-model component.
#[derive(Debug, Clone)]
pub struct SourceComponent {
    /// Coordinates of the component.
    pub radec: RADec,
    /// The component type.
    pub comp_type: ComponentType,
    /// The flux densities associated with this component.
    pub flux_type: FluxDensityType,
}

/// Shape information on a component.
#[derive(Debug, Clone, Copy)]
pub enum ComponentType {
    Point,

    Gaussian {
        /// Major axis size \[radians\]
        maj: f64,
        /// Minor axis size \[radians\]
        min: f64,
        /// Position angle \[radians\]
        pa: f64,
    },
}
