//! CSV/TSV training corpus reader.
//!
//! One column holds the class label; every other column must be a catalog
//! attribute. Cells are trimmed but otherwise taken verbatim, so case and
//! spelling must already match the catalog.
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::catalog::{Assignment, Class, FeatureCatalog};
use crate::error::ClassifierError;
use crate::pipeline::TrainingCorpus;

/// Configuration for reading a training corpus.
#[derive(Debug, Clone)]
pub struct CorpusReaderConfig {
    /// Column name holding the class label.
    pub label_column: String,
    /// Field delimiter. When `None`, `.tsv` files use tabs and everything else commas.
    pub delimiter: Option<u8>,
}

impl Default for CorpusReaderConfig {
    fn default() -> Self {
        Self {
            label_column: "CLASS".to_string(),
            delimiter: None,
        }
    }
}

fn delimiter_for(path: &Path) -> u8 {
    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("tsv"))
        .unwrap_or(false);
    if is_tsv {
        b'\t'
    } else {
        b','
    }
}

/// Read a corpus file, picking the delimiter from its extension.
pub fn load_corpus<P: AsRef<Path>>(
    path: P,
    catalog: &FeatureCatalog,
    config: &CorpusReaderConfig,
) -> Result<TrainingCorpus, ClassifierError> {
    let path = path.as_ref();
    let delimiter = config.delimiter.unwrap_or_else(|| delimiter_for(path));
    let file = std::fs::File::open(path)?;
    let corpus = read_records(file, delimiter, catalog, &config.label_column)?;
    log::info!("Loaded {} training rows from {}", corpus.len(), path.display());
    Ok(corpus)
}

/// Read a corpus from any reader. Defaults to commas when no delimiter is set.
pub fn load_corpus_from_reader<R: Read>(
    reader: R,
    catalog: &FeatureCatalog,
    config: &CorpusReaderConfig,
) -> Result<TrainingCorpus, ClassifierError> {
    read_records(reader, config.delimiter.unwrap_or(b','), catalog, &config.label_column)
}

fn read_records<R: Read>(
    reader: R,
    delimiter: u8,
    catalog: &FeatureCatalog,
    label_column: &str,
) -> Result<TrainingCorpus, ClassifierError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let (label_idx, attribute_columns) = resolve_columns(&headers, catalog, label_column)?;

    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;
        // header is line 1
        let line = row_idx + 2;

        let label = field(&record, label_idx, label_column, line)?
            .parse::<Class>()
            .map_err(|e| ClassifierError::InvalidCorpus(format!("line {}: {}", line, e)))?;

        let mut assignment = Assignment::new();
        for (idx, name) in &attribute_columns {
            assignment.set(name.as_str(), field(&record, *idx, name, line)?);
        }

        rows.push(assignment);
        labels.push(label);
    }

    TrainingCorpus::new(rows, labels)
}

fn field<'r>(
    record: &'r StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> Result<&'r str, ClassifierError> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ClassifierError::InvalidCorpus(format!(
            "line {}: missing value for '{}'",
            line, column
        ))),
    }
}

/// Locate the label column and map every other header onto a catalog attribute.
fn resolve_columns(
    headers: &StringRecord,
    catalog: &FeatureCatalog,
    label_column: &str,
) -> Result<(usize, Vec<(usize, String)>), ClassifierError> {
    let label_idx = headers
        .iter()
        .position(|h| h == label_column)
        .ok_or_else(|| {
            ClassifierError::InvalidCorpus(format!("missing label column '{}'", label_column))
        })?;

    let mut attribute_columns = Vec::new();
    let mut seen = HashSet::new();
    for (idx, header) in headers.iter().enumerate() {
        if idx == label_idx {
            continue;
        }
        if !catalog.contains(header) {
            return Err(ClassifierError::InvalidCorpus(format!(
                "column '{}' is not a catalog attribute",
                header
            )));
        }
        if !seen.insert(header) {
            return Err(ClassifierError::InvalidCorpus(format!(
                "duplicate column '{}'",
                header
            )));
        }
        attribute_columns.push((idx, header.to_string()));
    }

    if let Some(missing) = catalog
        .attributes()
        .iter()
        .find(|a| !attribute_columns.iter().any(|(_, name)| name == a.name()))
    {
        return Err(ClassifierError::InvalidCorpus(format!(
            "missing column for attribute '{}'",
            missing.name()
        )));
    }

    Ok((label_idx, attribute_columns))
}
