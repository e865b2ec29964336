use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use mushroom_classifier::{Assignment, FeatureCatalog, ModelConfig, ModelType};

use crate::util::{parse_assignment_pair, validate_tsv_or_csv_file};

/// Settings for a train-then-predict run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    pub train_data: String,
    pub label_column: String,
    /// Full `ModelConfig` under the `model` key, which carries its own
    /// `"model"` type tag. `None` until a seed is supplied by the file or `--seed`.
    pub model: Option<ModelConfig>,
}

impl Default for PredictConfig {
    fn default() -> Self {
        PredictConfig {
            train_data: String::new(),
            label_column: String::from("CLASS"),
            model: None,
        }
    }
}

impl PredictConfig {
    pub fn load(path: &PathBuf) -> Result<Self> {
        let config_json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: PredictConfig = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Merge the optional config file with CLI overrides.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => PredictConfig::load(path)?,
            None => PredictConfig::default(),
        };

        if let Some(train_data) = matches.get_one::<String>("data") {
            config.train_data = train_data.clone();
        }
        validate_tsv_or_csv_file(&config.train_data)?;

        if let Some(label_column) = matches.get_one::<String>("label_column") {
            config.label_column = label_column.clone();
        }

        if let Some(seed) = matches.get_one::<u64>("seed") {
            match config.model.as_mut() {
                Some(model) => model.seed = *seed,
                None => config.model = Some(ModelConfig::with_seed(*seed)),
            }
        }

        let Some(model) = config.model.as_mut() else {
            anyhow::bail!("A random seed is required: pass --seed or set model.seed in the config file");
        };

        if let Some(model_type) = matches.get_one::<String>("model_type") {
            model.model_type = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
        }

        if let Some(trees) = matches.get_one::<usize>("trees") {
            match &mut model.model_type {
                ModelType::RandomForest { n_trees, .. } => *n_trees = *trees,
                ModelType::DecisionTree { .. } => {
                    log::warn!("--trees has no effect on a single decision tree")
                }
            }
        }

        model.validate()?;
        Ok(config)
    }

    pub fn model_config(&self) -> Result<&ModelConfig> {
        self.model
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No model configuration resolved"))
    }
}

/// Catalog defaults overridden by every `--set ATTRIBUTE=value`.
pub fn build_query<'a, I>(catalog: &FeatureCatalog, overrides: I) -> Result<Assignment>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut query = Assignment::catalog_defaults(catalog);
    for raw in overrides {
        let (attribute, value) = parse_assignment_pair(raw)?;
        query.set(attribute, value);
    }
    Ok(query)
}
