use anyhow::Result;
use std::path::Path;

/// Reject corpus paths that are not an existing `.csv`/`.tsv` file.
pub fn validate_tsv_or_csv_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let is_table = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv"));
    if !is_table {
        anyhow::bail!("Training corpus must be a .tsv or .csv file: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Training corpus does not exist: {}", path.display());
    }
    Ok(())
}

/// Split an `ATTRIBUTE=value` pair as passed to `--set`.
pub fn parse_assignment_pair(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((attribute, value)) if !attribute.trim().is_empty() && !value.trim().is_empty() => {
            Ok((attribute.trim().to_string(), value.trim().to_string()))
        }
        _ => anyhow::bail!("Expected ATTRIBUTE=value, got '{}'", raw),
    }
}
