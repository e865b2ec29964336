//! mushroom-classifier: categorical feature encoding and tree-ensemble
//! inference for mushroom edibility.
//!
//! The crate turns a catalog of categorical attributes into a frozen binary
//! indicator schema, encodes training rows and queries against that schema,
//! and fits a bagged decision-tree ensemble behind a small imputer. Training
//! yields a `Schema` and a `FittedModel`; both are passed explicitly to the
//! inference side so the column layout used at fit time is the one used to
//! score every query.
pub mod catalog;
pub mod config;
pub mod encoder;
pub mod error;
pub mod inference;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod schema;

pub use catalog::{Assignment, Attribute, Class, FeatureCatalog};
pub use config::{ImputerStrategy, MaxFeatures, ModelConfig, ModelType};
pub use error::ClassifierError;
pub use inference::{predict, InferenceService, PredictionResult};
pub use pipeline::{fit, FittedModel, TrainingCorpus};
pub use schema::Schema;
