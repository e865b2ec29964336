//! Single-query scoring against a frozen schema and fitted model.
use std::fmt;

use serde::Serialize;

use crate::catalog::{Assignment, Class, FeatureCatalog};
use crate::encoder::{encode, UnresolvedReason};
use crate::error::ClassifierError;
use crate::pipeline::FittedModel;
use crate::schema::Schema;

/// Predicted class plus the probability of each class in `Class::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: Class,
    pub probabilities: [f64; 2],
    /// Attributes that carried no signal (unset or unseen during training).
    pub unresolved: Vec<String>,
}

impl PredictionResult {
    fn from_probabilities(probabilities: [f64; 2], unresolved: Vec<String>) -> Self {
        // ties resolve to the first class, as an argmax over Class::ALL does
        let label = if probabilities[Class::Poisonous.index()] > probabilities[Class::Edible.index()] {
            Class::Poisonous
        } else {
            Class::Edible
        };
        PredictionResult {
            label,
            probabilities,
            unresolved,
        }
    }

    pub fn probability(&self, class: Class) -> f64 {
        self.probabilities[class.index()]
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "This mushroom is {} with probability [edible: {:.2}, poisonous: {:.2}]",
            self.label,
            self.probability(Class::Edible),
            self.probability(Class::Poisonous)
        )
    }
}

/// Score one query.
///
/// Fails with `InvalidQuery` when the query names an attribute outside the
/// catalog. Unset attributes and values never seen in training are not
/// errors: their columns fall back to the imputer's per-column values.
pub fn predict(
    query: &Assignment,
    model: &FittedModel,
    schema: &Schema,
    catalog: &FeatureCatalog,
) -> Result<PredictionResult, ClassifierError> {
    catalog.check_assignment(query)?;
    model.check_schema(schema)?;

    let encoded = encode(query, schema);
    encoded.check_len(schema.len())?;

    let mut unresolved = Vec::with_capacity(encoded.unresolved().len());
    for note in encoded.unresolved() {
        if let UnresolvedReason::UnseenValue(value) = &note.reason {
            let legal = catalog
                .attribute(&note.attribute)
                .map_or(false, |a| a.is_legal(value));
            if !legal {
                log::warn!(
                    "Value '{}' is not a legal choice for '{}'; treating it as unknown",
                    value,
                    note.attribute
                );
            }
        }
        unresolved.push(note.attribute.clone());
    }

    let probabilities = model.score(encoded.values(), encoded.ambiguous())?;
    Ok(PredictionResult::from_probabilities(probabilities, unresolved))
}

/// Read-only bundle of everything a query needs.
///
/// Holds no interior mutability, so a single service can be shared across
/// threads behind an `Arc`.
#[derive(Debug)]
pub struct InferenceService {
    catalog: FeatureCatalog,
    schema: Schema,
    model: FittedModel,
}

impl InferenceService {
    pub fn new(
        catalog: FeatureCatalog,
        schema: Schema,
        model: FittedModel,
    ) -> Result<Self, ClassifierError> {
        model.check_schema(&schema)?;
        Ok(InferenceService {
            catalog,
            schema,
            model,
        })
    }

    pub fn predict(&self, query: &Assignment) -> Result<PredictionResult, ClassifierError> {
        predict(query, &self.model, &self.schema, &self.catalog)
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn model(&self) -> &FittedModel {
        &self.model
    }
}
