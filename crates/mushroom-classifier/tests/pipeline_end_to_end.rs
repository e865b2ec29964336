//! Training and inference over the stock catalog.

mod common;

use std::sync::Arc;

use mushroom_classifier::{
    fit, predict, Assignment, Class, ClassifierError, FeatureCatalog, InferenceService,
    ModelConfig, ModelType, Schema,
};

use common::synthetic_corpus;

fn trained(seed: u64) -> InferenceService {
    let catalog = FeatureCatalog::mushroom();
    let corpus = synthetic_corpus(400, 21);
    let (schema, model) = fit(&catalog, &corpus, &ModelConfig::with_seed(seed)).unwrap();
    InferenceService::new(catalog, schema, model).unwrap()
}

fn assert_valid_probabilities(p: [f64; 2]) {
    for v in p {
        assert!((0.0..=1.0).contains(&v), "probability {} out of range", v);
    }
    assert!((p[0] + p[1] - 1.0).abs() < 1e-6, "probabilities {:?} do not sum to 1", p);
}

#[test]
fn foul_odor_is_poisonous() {
    let service = trained(7);
    let query = Assignment::catalog_defaults(service.catalog()).with("ODOR", "foul");
    let result = service.predict(&query).unwrap();
    assert_eq!(result.label, Class::Poisonous);
    assert!(result.probability(Class::Poisonous) > result.probability(Class::Edible));
    assert_valid_probabilities(result.probabilities);
}

#[test]
fn decision_tree_learns_odor_rule() {
    let catalog = FeatureCatalog::mushroom();
    let corpus = synthetic_corpus(400, 21);
    let config = ModelConfig::new(1, "decision_tree".parse::<ModelType>().unwrap());
    let (schema, model) = fit(&catalog, &corpus, &config).unwrap();

    for (row, label) in corpus.rows.iter().zip(&corpus.labels) {
        let result = predict(row, &model, &schema, &catalog).unwrap();
        assert_eq!(result.label, *label);
    }
}

#[test]
fn probabilities_are_valid_for_many_queries() {
    let service = trained(3);
    let catalog = FeatureCatalog::mushroom();
    for attribute in catalog.attributes() {
        for value in attribute.values() {
            let query = Assignment::catalog_defaults(&catalog).with(attribute.name(), value.as_str());
            let result = service.predict(&query).unwrap();
            assert_valid_probabilities(result.probabilities);
        }
    }
}

#[test]
fn unseen_value_degrades_gracefully() {
    let service = trained(3);
    let query = Assignment::catalog_defaults(service.catalog()).with("CAPSHAPE", "conical");
    let result = service.predict(&query).unwrap();
    assert_eq!(result.unresolved, vec!["CAPSHAPE".to_string()]);
    assert_valid_probabilities(result.probabilities);
}

#[test]
fn value_outside_catalog_is_treated_as_unknown() {
    let service = trained(3);
    let query = Assignment::catalog_defaults(service.catalog()).with("ODOR", "lavender");
    let result = service.predict(&query).unwrap();
    assert_eq!(result.unresolved, vec!["ODOR".to_string()]);
    assert_valid_probabilities(result.probabilities);
}

#[test]
fn partial_query_is_scored() {
    let service = trained(3);
    let result = service.predict(&Assignment::new().with("ODOR", "foul")).unwrap();
    assert_eq!(result.unresolved.len(), service.catalog().len() - 1);
    assert_valid_probabilities(result.probabilities);
}

#[test]
fn unknown_attribute_is_invalid_query() {
    let service = trained(3);
    let query = Assignment::catalog_defaults(service.catalog()).with("STEM-GLOW", "bright");
    match service.predict(&query) {
        Err(ClassifierError::InvalidQuery { attribute }) => assert_eq!(attribute, "STEM-GLOW"),
        other => panic!("expected InvalidQuery, got {:?}", other),
    }
}

#[test]
fn same_seed_reproduces_predictions() {
    let a = trained(99);
    let b = trained(99);
    let query = Assignment::catalog_defaults(a.catalog()).with("ODOR", "almond");
    assert_eq!(
        a.predict(&query).unwrap().probabilities,
        b.predict(&query).unwrap().probabilities
    );
}

#[test]
fn foreign_schema_is_rejected() {
    let catalog = FeatureCatalog::mushroom();
    let (_, model) = fit(&catalog, &synthetic_corpus(400, 21), &ModelConfig::with_seed(1)).unwrap();

    let narrow: Vec<Assignment> = synthetic_corpus(400, 21)
        .rows
        .into_iter()
        .map(|row| row.with("ODOR", "none"))
        .collect();
    let other_schema = Schema::build(&catalog, &narrow).unwrap();

    let query = Assignment::catalog_defaults(&catalog);
    assert!(matches!(
        predict(&query, &model, &other_schema, &catalog),
        Err(ClassifierError::SchemaMismatch { .. })
    ));
}

#[test]
fn service_is_shared_read_only_across_threads() {
    let service = Arc::new(trained(5));
    let query = Assignment::catalog_defaults(service.catalog()).with("ODOR", "foul");
    let expected = service.predict(&query).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let service = Arc::clone(&service);
            let query = query.clone();
            let expected = expected.clone();
            scope.spawn(move || {
                assert_eq!(service.predict(&query).unwrap(), expected);
            });
        }
    });
}
