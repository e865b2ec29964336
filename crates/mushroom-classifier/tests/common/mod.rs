//! Synthetic mushroom corpora shared by the integration tests.
#![allow(dead_code)]

use mushroom_classifier::{Assignment, Class, FeatureCatalog, TrainingCorpus};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub const POISONOUS_ODORS: &[&str] = &["pungent", "foul", "creosote", "fishy", "spicy", "musty"];

/// Values left out of every generated row, so they never get a schema column.
pub const HELD_OUT: &[(&str, &str)] = &[("CAPSHAPE", "conical"), ("HABITAT", "waste")];

/// Route library logs through the test harness; honours `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Random specimens over the stock catalog. The label depends on odor only.
pub fn synthetic_corpus(n: usize, seed: u64) -> TrainingCorpus {
    init_logging();
    let catalog = FeatureCatalog::mushroom();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);

    for _ in 0..n {
        let mut row = Assignment::new();
        for attribute in catalog.attributes() {
            let choices: Vec<&String> = attribute
                .values()
                .iter()
                .filter(|v| !HELD_OUT.contains(&(attribute.name(), v.as_str())))
                .collect();
            let value = choices.choose(&mut rng).expect("non-empty value list");
            row.set(attribute.name(), value.as_str());
        }
        let odor = row.get("ODOR").expect("odor set");
        labels.push(if POISONOUS_ODORS.contains(&odor) {
            Class::Poisonous
        } else {
            Class::Edible
        });
        rows.push(row);
    }

    // make sure the scenario the tests rely on is present
    rows[0].set("ODOR", "foul");
    labels[0] = Class::Poisonous;
    rows[1].set("ODOR", "none");
    labels[1] = Class::Edible;

    TrainingCorpus::new(rows, labels).expect("rows and labels line up")
}
