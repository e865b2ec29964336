//! Training pipeline: schema, encoding, imputation and ensemble fitting.
//!
//! `fit` is a one-shot, blocking operation. Its outputs, the frozen `Schema`
//! and the `FittedModel`, are never mutated afterwards and are handed to the
//! inference side as an explicit pair.
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use ndarray::ArrayView2;

use crate::catalog::{Assignment, Class, FeatureCatalog};
use crate::config::ModelConfig;
use crate::encoder::encode_corpus;
use crate::error::ClassifierError;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory::build_model;
use crate::preprocessing::{fit_imputer, SimpleImputer};
use crate::schema::Schema;

/// Labeled training rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCorpus {
    pub rows: Vec<Assignment>,
    pub labels: Vec<Class>,
}

impl TrainingCorpus {
    pub fn new(rows: Vec<Assignment>, labels: Vec<Class>) -> Result<Self, ClassifierError> {
        if rows.len() != labels.len() {
            return Err(ClassifierError::InvalidCorpus(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        Ok(TrainingCorpus { rows, labels })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn class_counts(&self) -> BTreeMap<Class, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(*label).or_insert(0) += 1;
        }
        counts
    }

    pub fn log_input_data_summary(&self) {
        let counts = self.class_counts();
        log::info!("----- Training Corpus Summary -----");
        log::info!(
            "{} specimens: {} edible and {} poisonous",
            self.len(),
            counts.get(&Class::Edible).copied().unwrap_or(0),
            counts.get(&Class::Poisonous).copied().unwrap_or(0)
        );
        log::info!("-----------------------------------");
    }

    /// Fail fast on corpora that cannot produce a meaningful model.
    fn check_trainable(&self) -> Result<(), ClassifierError> {
        if self.is_empty() {
            return Err(ClassifierError::EmptyTrainingCorpus);
        }
        let counts = self.class_counts();
        if counts.len() < Class::ALL.len() {
            let class = counts
                .keys()
                .next()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default();
            return Err(ClassifierError::DegenerateTrainingCorpus { class });
        }
        Ok(())
    }
}

/// Imputer statistics plus the trained ensemble.
pub struct FittedModel {
    imputer: SimpleImputer,
    classifier: Box<dyn ClassifierModel>,
    n_features: usize,
}

impl fmt::Debug for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FittedModel")
            .field("classifier", &self.classifier.name())
            .field("n_features", &self.n_features)
            .finish()
    }
}

impl FittedModel {
    /// Schema width the model was trained against.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn imputer(&self) -> &SimpleImputer {
        &self.imputer
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub(crate) fn check_schema(&self, schema: &Schema) -> Result<(), ClassifierError> {
        if schema.len() != self.n_features {
            return Err(ClassifierError::SchemaMismatch {
                expected: self.n_features,
                actual: schema.len(),
            });
        }
        Ok(())
    }

    /// Backfill ambiguous columns and score a single encoded row.
    pub(crate) fn score(&self, values: &[f32], ambiguous: &[bool]) -> Result<[f64; 2], ClassifierError> {
        let row = self.imputer.transform(values, ambiguous)?;
        let view = ArrayView2::from_shape((1, row.len()), row.as_slice()).map_err(|_| {
            ClassifierError::SchemaMismatch {
                expected: self.n_features,
                actual: row.len(),
            }
        })?;
        let proba = self.classifier.predict_proba(view)?;
        Ok([proba[(0, 0)], proba[(0, 1)]])
    }
}

/// Train on `corpus` and return the frozen schema with the fitted model.
pub fn fit(
    catalog: &FeatureCatalog,
    corpus: &TrainingCorpus,
    config: &ModelConfig,
) -> Result<(Schema, FittedModel), ClassifierError> {
    let start_time = Instant::now();
    config.validate()?;
    corpus.check_trainable()?;
    corpus.log_input_data_summary();
    log::info!(
        "Training {} with seed {}",
        config.model_type.name(),
        config.seed
    );

    let schema = Schema::build(catalog, &corpus.rows)?;
    let x = encode_corpus(&corpus.rows, &schema)?;
    if x.ncols() != schema.len() {
        return Err(ClassifierError::SchemaMismatch {
            expected: schema.len(),
            actual: x.ncols(),
        });
    }
    log::info!(
        "Encoded {} rows into {} indicator columns",
        x.nrows(),
        schema.len()
    );

    let imputer = fit_imputer(&x, &config.imputer)?;
    let x = imputer.transform_matrix(&x)?;

    let y: Vec<usize> = corpus.labels.iter().map(|c| c.index()).collect();
    let mut classifier = build_model(config, Class::ALL.len());
    classifier.fit(&x, &y)?;

    log::info!(
        "Trained {} (seed {}) in {:?}",
        classifier.name(),
        config.seed,
        start_time.elapsed()
    );

    let model = FittedModel {
        imputer,
        classifier,
        n_features: schema.len(),
    };
    Ok((schema, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Attribute;

    fn catalog() -> FeatureCatalog {
        FeatureCatalog::new(vec![
            Attribute::new("ODOR", vec!["none".to_string(), "foul".to_string()]),
            Attribute::new("BRUISES", vec!["no".to_string(), "yes".to_string()]),
        ])
        .unwrap()
    }

    fn row(odor: &str, bruises: &str) -> Assignment {
        Assignment::new().with("ODOR", odor).with("BRUISES", bruises)
    }

    #[test]
    fn empty_corpus_fails_fast() {
        let corpus = TrainingCorpus::new(vec![], vec![]).unwrap();
        let err = fit(&catalog(), &corpus, &ModelConfig::with_seed(1)).unwrap_err();
        assert!(matches!(err, ClassifierError::EmptyTrainingCorpus));
    }

    #[test]
    fn single_class_corpus_fails_fast() {
        let corpus = TrainingCorpus::new(
            vec![row("none", "no"), row("foul", "yes")],
            vec![Class::Edible, Class::Edible],
        )
        .unwrap();
        match fit(&catalog(), &corpus, &ModelConfig::with_seed(1)).unwrap_err() {
            ClassifierError::DegenerateTrainingCorpus { class } => assert_eq!(class, "edible"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn mismatched_labels_rejected() {
        assert!(TrainingCorpus::new(vec![row("none", "no")], vec![]).is_err());
    }

    #[test]
    fn fitted_model_remembers_schema_width() {
        let corpus = TrainingCorpus::new(
            vec![row("none", "no"), row("foul", "yes"), row("none", "yes")],
            vec![Class::Edible, Class::Poisonous, Class::Edible],
        )
        .unwrap();
        let (schema, model) = fit(&catalog(), &corpus, &ModelConfig::with_seed(3)).unwrap();
        assert_eq!(schema.len(), 4);
        assert_eq!(model.n_features(), 4);
        assert_eq!(model.imputer().n_columns(), 4);
        assert_eq!(model.classifier_name(), "random_forest");
    }
}
