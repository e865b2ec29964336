use std::time::Instant;

use anyhow::{Context, Result};

use mushroom_classifier::io::{load_corpus, CorpusReaderConfig};
use mushroom_classifier::{fit, Assignment, FeatureCatalog, InferenceService, PredictionResult, Schema};

use crate::predict::input::PredictConfig;

fn reader_config(label_column: &str) -> CorpusReaderConfig {
    CorpusReaderConfig {
        label_column: label_column.to_string(),
        ..CorpusReaderConfig::default()
    }
}

/// Load the corpus named in `config`, train once and wrap the result for querying.
pub fn train_service(config: &PredictConfig) -> Result<InferenceService> {
    let start_time = Instant::now();
    let catalog = FeatureCatalog::mushroom();
    let corpus = load_corpus(&config.train_data, &catalog, &reader_config(&config.label_column))
        .with_context(|| format!("Failed to load training data: {}", config.train_data))?;

    let (schema, model) = fit(&catalog, &corpus, config.model_config()?).context("Training failed")?;
    log::info!("Classifier ready in {:?}", start_time.elapsed());

    Ok(InferenceService::new(catalog, schema, model)?)
}

pub fn run_prediction(config: &PredictConfig, query: &Assignment) -> Result<PredictionResult> {
    let service = train_service(config)?;
    Ok(service.predict(query)?)
}

/// Build the frozen schema for a corpus without training a model.
pub fn run_schema(train_data: &str, label_column: &str) -> Result<Schema> {
    let catalog = FeatureCatalog::mushroom();
    let corpus = load_corpus(train_data, &catalog, &reader_config(label_column))
        .with_context(|| format!("Failed to load training data: {}", train_data))?;
    Ok(Schema::build(&catalog, &corpus.rows)?)
}
