// Per-algorithm multipliers adjusted by observed outcomes

use log::debug;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use crate::config::WeightsConfig;
use crate::types::Algorithm;

/// One value per algorithm, serialized as a map keyed by algorithm name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgorithmTable {
    values: [f64; 4],
}

impl AlgorithmTable {
    pub fn filled(value: f64) -> Self {
        AlgorithmTable { values: [value; 4] }
    }

    pub fn get(&self, algorithm: Algorithm) -> f64 {
        self.values[algorithm.index()]
    }

    pub fn set(&mut self, algorithm: Algorithm, value: f64) {
        self.values[algorithm.index()] = value;
    }

    /// (algorithm, value) pairs in comparison order
    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, f64)> + '_ {
        Algorithm::all()
            .into_iter()
            .map(move |alg| (alg, self.values[alg.index()]))
    }
}

impl Serialize for AlgorithmTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for (alg, value) in self.iter() {
            map.serialize_entry(&alg, &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AlgorithmTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<Algorithm, f64>::deserialize(deserializer)?;
        let mut table = AlgorithmTable::filled(0.0);
        for (alg, value) in entries {
            table.set(alg, value);
        }
        Ok(table)
    }
}

/// Arbitration weights; only ever changed through `update`
#[derive(Debug, Clone)]
pub struct WeightTable {
    weights: AlgorithmTable,
    success_multiplier: f64,
    failure_multiplier: f64,
    floor: f64,
}

impl WeightTable {
    pub fn from_config(config: &WeightsConfig) -> Self {
        let mut weights = AlgorithmTable::filled(1.0);
        weights.set(Algorithm::PathSearch, config.path_search);
        weights.set(Algorithm::SpaceFallback, config.space_fallback);
        weights.set(Algorithm::Survival, config.survival);
        weights.set(Algorithm::TreeSearch, config.tree_search);
        WeightTable {
            weights,
            success_multiplier: config.success_multiplier,
            failure_multiplier: config.failure_multiplier,
            floor: config.floor,
        }
    }

    /// Restores previously observed weights, keeping the update rule from `config`
    pub fn restore(config: &WeightsConfig, weights: AlgorithmTable) -> Self {
        let mut table = Self::from_config(config);
        for (alg, value) in weights.iter() {
            table.weights.set(alg, value.max(table.floor));
        }
        table
    }

    pub fn get(&self, algorithm: Algorithm) -> f64 {
        self.weights.get(algorithm)
    }

    /// Snapshot of the current weights
    pub fn values(&self) -> AlgorithmTable {
        self.weights
    }

    /// Applies the outcome of a tick to the algorithm that produced its move
    pub fn update(&mut self, algorithm: Algorithm, success: bool) {
        let factor = if success {
            self.success_multiplier
        } else {
            self.failure_multiplier
        };
        let before = self.weights.get(algorithm);
        let after = (before * factor).max(self.floor);
        self.weights.set(algorithm, after);
        debug!(
            "Weight {} {} -> {:.4} ({})",
            algorithm,
            before,
            after,
            if success { "success" } else { "failure" }
        );
    }
}
