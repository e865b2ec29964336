use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ClassifierError;

/// Central configuration for training in the crate.
///
/// `seed` has no default: bootstrap sampling and per-tree feature selection are
/// reproducible only for a given seed, so every caller has to pick one.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub seed: u64,

    #[serde(default)]
    pub imputer: ImputerStrategy,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// How the imputer picks a per-column fallback.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImputerStrategy {
    #[default]
    MostFrequent,
    Constant { fill_value: f32 },
}

/// Number of feature columns each forest tree is fitted on.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    Log2,
    All,
    Fraction(f32),
}

impl MaxFeatures {
    /// Resolve against the number of available features; always at least one.
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = n_features as f64;
        let k = match self {
            MaxFeatures::Sqrt => n.sqrt().floor() as usize,
            MaxFeatures::Log2 => n.log2().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fraction(f) => (n * *f as f64).floor() as usize,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelType {
    RandomForest {
        n_trees: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
        max_features: MaxFeatures,
        bootstrap: bool,
    },
    DecisionTree {
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::RandomForest {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Fraction(0.7),
            bootstrap: true,
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::RandomForest { .. } => "random_forest",
            ModelType::DecisionTree { .. } => "decision_tree",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "random_forest" | "rf" => Ok(ModelType::default()),
            "decision_tree" | "tree" => Ok(ModelType::DecisionTree {
                max_depth: None,
                min_samples_split: 2,
                min_samples_leaf: 1,
            }),
            _ => Err(format!(
                "Unknown model type: {}. Expected 'random_forest' or 'decision_tree'",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(seed: u64, model_type: ModelType) -> Self {
        Self {
            seed,
            imputer: ImputerStrategy::default(),
            model_type,
        }
    }

    /// Default random forest with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, ModelType::default())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let config: ModelConfig = serde_json::from_str(json)
            .map_err(|e| ClassifierError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        let (min_split, min_leaf) = match &self.model_type {
            ModelType::RandomForest {
                n_trees,
                min_samples_split,
                min_samples_leaf,
                max_features,
                ..
            } => {
                if *n_trees == 0 {
                    return Err(ClassifierError::InvalidConfig(
                        "n_trees must be at least 1".to_string(),
                    ));
                }
                if let MaxFeatures::Fraction(f) = max_features {
                    if !(*f > 0.0 && *f <= 1.0) {
                        return Err(ClassifierError::InvalidConfig(format!(
                            "max_features fraction must be in (0, 1], got {}",
                            f
                        )));
                    }
                }
                (*min_samples_split, *min_samples_leaf)
            }
            ModelType::DecisionTree {
                min_samples_split,
                min_samples_leaf,
                ..
            } => (*min_samples_split, *min_samples_leaf),
        };

        if min_split < 2 {
            return Err(ClassifierError::InvalidConfig(format!(
                "min_samples_split must be at least 2, got {}",
                min_split
            )));
        }
        if min_leaf == 0 {
            return Err(ClassifierError::InvalidConfig(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
