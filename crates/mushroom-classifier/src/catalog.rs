//! Static definition of the categorical attributes a specimen is described by.
//!
//! The catalog is the contract shared by training and inference: attribute
//! order drives schema column order, and attribute names are the only keys an
//! `Assignment` may use.
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// Attributes and legal values of the stock mushroom form, in display order.
const MUSHROOM_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("CAPSHAPE", &["convex", "bell", "sunken", "flat", "knobbed", "conical"]),
    ("SURFACE", &["smooth", "scaly", "fibrous", "grooves"]),
    (
        "COLOR",
        &[
            "brown", "yellow", "white", "gray", "red", "pink", "buff", "purple", "cinnamo",
            "green",
        ],
    ),
    ("BRUISES", &["no", "yes"]),
    (
        "ODOR",
        &[
            "pungent", "almond", "anise", "none", "foul", "creosote", "fishy", "spicy", "musty",
        ],
    ),
    ("GILL-ATTACHMENT", &["free", "attached"]),
    ("GILL-SPACING", &["close", "crowded"]),
    ("GILL-SIZE", &["narrow", "broad"]),
    (
        "GILL-COLOR",
        &[
            "black", "brown", "gray", "pink", "b'w'", "chocolate", "purple", "red", "buff",
            "green", "b'y'", "orange",
        ],
    ),
    ("STALK-SHAPE", &["enlarging", "tapering"]),
    ("STALK-ROOT", &["equal", "club", "bulbous", "rooted", "missing"]),
    ("STALK-SURFACE-ABOVE-RING", &["smooth", "fibrous", "silky", "scaly"]),
    ("STALK-SURFACE-BELOW-RING", &["smooth", "fibrous", "silky", "scaly"]),
    (
        "STALK-COLOR-ABOVE-RING",
        &["brown", "yellow", "white", "gray", "red", "pink", "buff", "orange", "cinnamo"],
    ),
    (
        "STALK-COLOR-BELOW-RING",
        &["brown", "yellow", "white", "gray", "red", "pink", "buff", "orange", "cinnamo"],
    ),
    ("VEIL-TYPE", &["partial"]),
    ("VEIL-COLOR", &["white", "brown", "orange", "yellow"]),
    ("RING-NUMBER", &["one", "two", "none"]),
    ("RING-TYPE", &["pendant", "evanescent", "large", "flaring", "none"]),
    (
        "SPORE-PRINT-COLOR",
        &[
            "black", "brown", "purple", "chocolate", "white", "green", "orange", "yellow", "buff",
        ],
    ),
    (
        "POPULATION",
        &["scattered", "numerous", "abundant", "several", "solitary", "clustered"],
    ),
    (
        "HABITAT",
        &["urban", "grasses", "meadows", "wood", "path", "waste", "leaves"],
    ),
];

/// A categorical characteristic and its legal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    values: Vec<String>,
}

impl Attribute {
    pub fn new<S: Into<String>>(name: S, values: Vec<String>) -> Self {
        Attribute {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_legal(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// The value a fresh form starts on.
    pub fn default_value(&self) -> &str {
        &self.values[0]
    }
}

/// Ordered, immutable set of attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCatalog {
    attributes: Vec<Attribute>,
}

impl FeatureCatalog {
    /// Build a catalog, rejecting duplicate or empty names and values.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, ClassifierError> {
        if attributes.is_empty() {
            return Err(ClassifierError::InvalidCatalog(
                "catalog must define at least one attribute".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for attribute in &attributes {
            if attribute.name.trim().is_empty() {
                return Err(ClassifierError::InvalidCatalog(
                    "attribute names must not be empty".to_string(),
                ));
            }
            if !names.insert(attribute.name.as_str()) {
                return Err(ClassifierError::InvalidCatalog(format!(
                    "duplicate attribute '{}'",
                    attribute.name
                )));
            }
            if attribute.values.is_empty() {
                return Err(ClassifierError::InvalidCatalog(format!(
                    "attribute '{}' has no legal values",
                    attribute.name
                )));
            }
            let mut seen = HashSet::new();
            for value in &attribute.values {
                if !seen.insert(value.as_str()) {
                    return Err(ClassifierError::InvalidCatalog(format!(
                        "attribute '{}' lists value '{}' twice",
                        attribute.name, value
                    )));
                }
            }
        }

        Ok(FeatureCatalog { attributes })
    }

    /// The 22-attribute catalog used by the mushroom form.
    pub fn mushroom() -> Self {
        let attributes = MUSHROOM_ATTRIBUTES
            .iter()
            .map(|(name, values)| {
                Attribute::new(*name, values.iter().map(|v| v.to_string()).collect())
            })
            .collect();
        FeatureCatalog { attributes }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Reject an assignment that names an attribute outside the catalog.
    pub fn check_assignment(&self, assignment: &Assignment) -> Result<(), ClassifierError> {
        match assignment.attributes().find(|name| !self.contains(name)) {
            Some(name) => Err(ClassifierError::InvalidQuery {
                attribute: name.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// One specimen's attribute -> value mapping. Attributes that are absent are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    values: BTreeMap<String, String>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every attribute set to its first legal value, as the form starts out.
    pub fn catalog_defaults(catalog: &FeatureCatalog) -> Self {
        let mut assignment = Assignment::new();
        for attribute in catalog.attributes() {
            assignment.set(attribute.name(), attribute.default_value());
        }
        assignment
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, attribute: K, value: V) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, attribute: K, value: V) {
        self.values.insert(attribute.into(), value.into());
    }

    pub fn unset(&mut self, attribute: &str) -> Option<String> {
        self.values.remove(attribute)
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.values.get(attribute).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The closed set of outcomes. `Class::ALL` fixes the probability order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Class {
    Edible,
    Poisonous,
}

impl Class {
    pub const ALL: [Class; 2] = [Class::Edible, Class::Poisonous];

    pub fn index(self) -> usize {
        match self {
            Class::Edible => 0,
            Class::Poisonous => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Class> {
        Class::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Class::Edible => "edible",
            Class::Poisonous => "poisonous",
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Class::Edible => write!(f, "Edible"),
            Class::Poisonous => write!(f, "Poisonous"),
        }
    }
}

impl FromStr for Class {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "edible" | "e" => Ok(Class::Edible),
            "poisonous" | "p" => Ok(Class::Poisonous),
            other => Err(format!("Unknown class label: '{}'", other)),
        }
    }
}
