// Factor weight vectors and the JSON-backed weight store
// (config/factor_weights.json, config/player_weights.json).

use crate::data::normalize_name;
use crate::factor::Factor;
use crate::io::write_atomic;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Index, IndexMut};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WeightsError {
    #[error("failed to access weights file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in weights file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid weight for `{factor}`: {message}")]
    Invalid { factor: String, message: String },
}

// ---------------------------------------------------------------------------
// FactorWeights
// ---------------------------------------------------------------------------

/// One non-negative weight per factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights([f64; Factor::COUNT]);

impl Default for FactorWeights {
    fn default() -> Self {
        let mut values = [0.0; Factor::COUNT];
        for f in Factor::ALL {
            values[f.index()] = f.default_weight();
        }
        FactorWeights(values)
    }
}

impl FactorWeights {
    pub fn from_array(values: [f64; Factor::COUNT]) -> Self {
        FactorWeights(values)
    }

    /// Build from an optimizer parameter vector. Missing trailing entries
    /// keep their default weight.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut weights = FactorWeights::default();
        for (slot, v) in weights.0.iter_mut().zip(values) {
            *slot = *v;
        }
        weights
    }

    pub fn get(&self, factor: Factor) -> f64 {
        self.0[factor.index()]
    }

    pub fn set(&mut self, factor: Factor, weight: f64) {
        self.0[factor.index()] = weight;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Rescale so the weights sum to 1. An all-zero vector has no direction,
    /// so the defaults are returned instead.
    pub fn normalized(&self) -> FactorWeights {
        let sum = self.sum();
        if sum <= f64::EPSILON || !sum.is_finite() {
            return FactorWeights::default();
        }
        let mut out = *self;
        for w in out.0.iter_mut() {
            *w /= sum;
        }
        out
    }

    /// Every weight must be finite and non-negative.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for f in Factor::ALL {
            let w = self.get(f);
            if !w.is_finite() || w < 0.0 {
                return Err(WeightsError::Invalid {
                    factor: f.key().to_string(),
                    message: format!("must be a finite value >= 0, got {w}"),
                });
            }
        }
        Ok(())
    }

    /// Factors paired with their weights, heaviest first.
    pub fn sorted_descending(&self) -> Vec<(Factor, f64)> {
        let mut pairs: Vec<(Factor, f64)> = Factor::ALL.iter().map(|f| (*f, self.get(*f))).collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }

    /// Parse a `{factor_key: weight}` map. Missing keys take the default
    /// weight; unknown keys are ignored.
    pub fn from_map(map: &BTreeMap<String, f64>) -> FactorWeights {
        let mut weights = FactorWeights::default();
        for (key, value) in map {
            match Factor::from_key(key) {
                Some(f) => weights.set(f, *value),
                None => warn!("ignoring unknown factor '{}' in weights", key),
            }
        }
        weights
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        Factor::ALL
            .iter()
            .map(|f| (f.key().to_string(), self.get(*f)))
            .collect()
    }
}

impl Index<Factor> for FactorWeights {
    type Output = f64;

    fn index(&self, factor: Factor) -> &f64 {
        &self.0[factor.index()]
    }
}

impl IndexMut<Factor> for FactorWeights {
    fn index_mut(&mut self, factor: Factor) -> &mut f64 {
        &mut self.0[factor.index()]
    }
}

// ---------------------------------------------------------------------------
// WeightStore
// ---------------------------------------------------------------------------

/// Where a resolved weight vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightSource {
    Player,
    Global,
}

impl WeightSource {
    pub fn label(self) -> &'static str {
        match self {
            WeightSource::Player => "player",
            WeightSource::Global => "global",
        }
    }
}

/// A player's stored override, keyed by the name as it was saved.
#[derive(Debug, Clone)]
struct PlayerEntry {
    name: String,
    weights: FactorWeights,
}

/// Global weights plus per-player overrides.
#[derive(Debug, Clone, Default)]
pub struct WeightStore {
    global: FactorWeights,
    /// normalized name -> entry
    players: BTreeMap<String, PlayerEntry>,
    /// Normalized names reset since loading, removed from the file on save.
    reset: BTreeSet<String>,
}

impl WeightStore {
    /// Load both weight files. A missing or unreadable global file falls back
    /// to the defaults, a missing or unreadable player file to no overrides.
    pub fn load(global_path: &Path, player_path: &Path) -> WeightStore {
        let global = match read_global(global_path) {
            Ok(Some(w)) => w,
            Ok(None) => {
                info!("no global weights at {}, using defaults", global_path.display());
                FactorWeights::default()
            }
            Err(e) => {
                warn!("{e}; using default weights");
                FactorWeights::default()
            }
        };

        let players = match read_players(player_path) {
            Ok(map) => map,
            Err(e) => {
                warn!("{e}; ignoring player weight overrides until the file is fixed");
                BTreeMap::new()
            }
        };

        WeightStore {
            global,
            players,
            reset: BTreeSet::new(),
        }
    }

    pub fn global(&self) -> &FactorWeights {
        &self.global
    }

    pub fn set_global(&mut self, weights: FactorWeights) {
        self.global = weights;
    }

    /// Resolve the weights for a player: override, else global.
    pub fn weights_for(&self, player: &str) -> (FactorWeights, WeightSource) {
        match self.players.get(&normalize_name(player)) {
            Some(entry) => (entry.weights, WeightSource::Player),
            None => (self.global, WeightSource::Global),
        }
    }

    pub fn player_override(&self, player: &str) -> Option<&FactorWeights> {
        self.players.get(&normalize_name(player)).map(|e| &e.weights)
    }

    pub fn set_player(&mut self, player: &str, weights: FactorWeights) {
        let key = normalize_name(player);
        self.reset.remove(&key);
        self.players.insert(
            key,
            PlayerEntry {
                name: player.trim().to_string(),
                weights,
            },
        );
    }

    /// Drop a player's override. Returns whether one existed.
    pub fn reset_player(&mut self, player: &str) -> bool {
        let key = normalize_name(player);
        let existed = self.players.remove(&key).is_some();
        if existed {
            self.reset.insert(key);
        }
        existed
    }

    /// Names of players with stored overrides, as they were saved.
    pub fn players(&self) -> Vec<&str> {
        self.players.values().map(|e| e.name.as_str()).collect()
    }

    /// Replace the global weights file. A file that exists but does not
    /// parse is left alone and reported.
    pub fn save_global(&self, path: &Path) -> Result<(), WeightsError> {
        read_json::<serde_json::Value>(path)?;
        write_json(path, &self.global.to_map())
    }

    /// Merge this store's overrides into the player file. Players only on
    /// disk are kept, players reset here are removed. A file that does not
    /// parse is left alone and reported.
    pub fn save_players(&self, path: &Path) -> Result<(), WeightsError> {
        let mut map = read_json::<BTreeMap<String, serde_json::Value>>(path)?.unwrap_or_default();
        map.retain(|name, _| {
            let key = normalize_name(name);
            !self.reset.contains(&key) && !self.players.contains_key(&key)
        });
        for entry in self.players.values() {
            let weights = serde_json::to_value(entry.weights.to_map()).map_err(|e| {
                WeightsError::Json {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
            map.insert(entry.name.clone(), weights);
        }
        write_json(path, &map)
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, WeightsError> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(WeightsError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| WeightsError::Json {
            path: path.to_path_buf(),
            source: e,
        })
}

fn read_global(path: &Path) -> Result<Option<FactorWeights>, WeightsError> {
    let Some(map) = read_json::<BTreeMap<String, f64>>(path)? else {
        return Ok(None);
    };
    let weights = FactorWeights::from_map(&map);
    weights.validate()?;
    Ok(Some(weights))
}

fn read_players(path: &Path) -> Result<BTreeMap<String, PlayerEntry>, WeightsError> {
    let Some(raw) = read_json::<BTreeMap<String, BTreeMap<String, f64>>>(path)? else {
        return Ok(BTreeMap::new());
    };
    let mut players = BTreeMap::new();
    for (name, map) in raw {
        let weights = FactorWeights::from_map(&map);
        if let Err(e) = weights.validate() {
            warn!("skipping weights for '{}': {}", name, e);
            continue;
        }
        players.insert(
            normalize_name(&name),
            PlayerEntry {
                name: name.trim().to_string(),
                weights,
            },
        );
    }
    Ok(players)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), WeightsError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| WeightsError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_atomic(path, text.as_bytes()).map_err(|e| WeightsError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
