//! Directory scanning and seed-file parsing.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;
use ndarray::Array1;

use super::{IngestDiagnostic, IngestError, MissingQuantityPolicy};
use crate::dataset::{Dataset, Quantity};
use crate::types::Timeseries;

/// Filename pattern `<prefix><seed><suffix>` extracting the seed
/// identifier of each simulation output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPattern {
    prefix: String,
    suffix: String,
}

impl SeedPattern {
    /// Pattern matching `<prefix><seed><suffix>`, e.g.
    /// `SeedPattern::new("run.", ".dat")` for `run.17.dat`.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Extract the seed identifier from a file name, if it matches.
    pub fn seed_of<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let rest = file_name.strip_prefix(self.prefix.as_str())?;
        let seed = rest.strip_suffix(self.suffix.as_str())?;
        if seed.is_empty() {
            None
        } else {
            Some(seed)
        }
    }
}

/// Scan `dir` for files matching `pattern` and load the requested
/// quantities from each into a [`Dataset`].
///
/// Every matching file contributes one seed. Files that cannot be read or
/// parsed are skipped with an [`IngestDiagnostic::SkippedSeed`]; a
/// requested quantity missing from a file follows `policy`. Non-matching
/// files are ignored silently.
///
/// # Errors
///
/// [`IngestError::Io`] if the directory cannot be read;
/// [`IngestError::NoSeeds`] if nothing matched the pattern;
/// [`IngestError::MissingQuantity`] under [`MissingQuantityPolicy::Fail`].
pub fn load_directory(
    dir: &Path,
    pattern: &SeedPattern,
    quantities: &[&str],
    policy: MissingQuantityPolicy,
) -> Result<(Dataset, Vec<IngestDiagnostic>), IngestError> {
    let mut matched: Vec<(String, std::path::PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(seed) = pattern.seed_of(name) {
            matched.push((seed.to_string(), entry.path()));
        }
    }
    if matched.is_empty() {
        return Err(IngestError::NoSeeds {
            dir: dir.to_path_buf(),
        });
    }
    // Stable ordering regardless of directory enumeration order.
    matched.sort();

    let mut diagnostics = Vec::new();
    let mut per_quantity: BTreeMap<&str, Quantity> = BTreeMap::new();
    for (seed, path) in matched {
        let columns = match read_seed_file(&path) {
            Ok(columns) => columns,
            Err(e) => {
                warn!("skipping seed '{}': {}", seed, e);
                diagnostics.push(IngestDiagnostic::SkippedSeed {
                    seed,
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        for &quantity in quantities {
            match columns.get(quantity) {
                Some(series) => {
                    per_quantity
                        .entry(quantity)
                        .or_default()
                        .insert(seed.clone(), series.clone());
                }
                None => match policy {
                    MissingQuantityPolicy::Fail => {
                        return Err(IngestError::MissingQuantity {
                            seed,
                            quantity: quantity.to_string(),
                            available: columns.keys().cloned().collect(),
                        });
                    }
                    MissingQuantityPolicy::Skip => {
                        warn!("seed '{}' provides no quantity '{}'", seed, quantity);
                        diagnostics.push(IngestDiagnostic::MissingQuantity {
                            seed: seed.clone(),
                            quantity: quantity.to_string(),
                        });
                    }
                },
            }
        }
    }

    let mut dataset = Dataset::new();
    for (name, quantity) in per_quantity {
        dataset.insert(name, quantity);
    }
    Ok((dataset, diagnostics))
}

/// Parse one seed file into named timeseries columns.
///
/// Blank lines and `#` comments are ignored; the first remaining line
/// names the columns; the rest are samples, separated by whitespace or
/// commas.
///
/// # Errors
///
/// [`IngestError::Io`] on read failure; [`IngestError::Parse`] on a
/// missing header, a non-numeric value, or a row whose column count
/// disagrees with the header.
pub fn read_seed_file(path: &Path) -> Result<BTreeMap<String, Timeseries>, IngestError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut header: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if header.is_empty() {
            header = fields.iter().map(|f| f.to_string()).collect();
            columns = vec![Vec::new(); header.len()];
            continue;
        }
        if fields.len() != header.len() {
            return Err(IngestError::Parse {
                path: path.to_path_buf(),
                line: line_idx + 1,
                message: format!(
                    "expected {} columns, got {}",
                    header.len(),
                    fields.len()
                ),
            });
        }
        for (column, field) in columns.iter_mut().zip(&fields) {
            let value: f64 = field.parse().map_err(|_| IngestError::Parse {
                path: path.to_path_buf(),
                line: line_idx + 1,
                message: format!("invalid numeric value '{}'", field),
            })?;
            column.push(value);
        }
    }
    if header.is_empty() {
        return Err(IngestError::Parse {
            path: path.to_path_buf(),
            line: 1,
            message: "file has no header line".to_string(),
        });
    }
    if columns.iter().all(|c| c.is_empty()) {
        return Err(IngestError::Parse {
            path: path.to_path_buf(),
            line: 1,
            message: "file has a header but no samples".to_string(),
        });
    }

    Ok(header
        .into_iter()
        .zip(columns)
        .map(|(name, values)| (name, Array1::from(values).into_dyn()))
        .collect())
}
