use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use crate::classify::main_system;
use crate::error::GpadError;

const CODE_COLUMN: usize = 1;
const NAME_COLUMN: usize = 2;
const SYSTEMS_COLUMN: usize = 3;

/// Substrings expected in the header cells at the fixed column offsets.
const EXPECTED_HEADER: [(usize, &str); 3] = [
    (CODE_COLUMN, "code"),
    (NAME_COLUMN, "name"),
    (SYSTEMS_COLUMN, "system"),
];

/// One output row per GP practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierRow {
    pub code: String,
    pub name: String,
    pub appointment_systems: String,
    pub main_system: String,
}

/// First-seen-wins view of the source rows, keyed by GP code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    order: Vec<String>,
    systems: HashMap<String, (String, String)>,
    names: HashMap<String, String>,
}

impl Aggregation {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Raw label and main system for a code.
    pub fn systems(&self, code: &str) -> Option<(&str, &str)> {
        self.systems
            .get(code)
            .map(|(raw, main)| (raw.as_str(), main.as_str()))
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Codes in the order they were first seen.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Record a row unless its code is already known. Returns whether the
    /// row was kept.
    pub fn insert(&mut self, code: &str, name: &str, appointment_systems: &str) -> bool {
        if self.systems.contains_key(code) {
            return false;
        }
        let main = main_system(appointment_systems).to_string();
        self.order.push(code.to_string());
        self.systems.insert(
            code.to_string(),
            (appointment_systems.to_string(), main),
        );
        self.names
            .entry(code.to_string())
            .or_insert_with(|| name.to_string());
        true
    }

    /// Join the system and name mappings into output rows.
    pub fn rows(&self) -> Result<Vec<SupplierRow>, GpadError> {
        self.order
            .iter()
            .map(|code| {
                let (raw, main) = self
                    .systems
                    .get(code)
                    .ok_or_else(|| GpadError::MissingSystems(code.clone()))?;
                let name = self
                    .names
                    .get(code)
                    .ok_or_else(|| GpadError::MissingName(code.clone()))?;
                Ok(SupplierRow {
                    code: code.clone(),
                    name: name.clone(),
                    appointment_systems: raw.clone(),
                    main_system: main.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    aggregation: Aggregation,
    check_header: bool,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn when the header names do not look like GP code, name and
    /// systems at the fixed offsets. Column access stays positional.
    pub fn with_header_check(mut self, check_header: bool) -> Self {
        self.check_header = check_header;
        self
    }

    /// Fold a CSV source into the aggregation. Record 0 is the header.
    pub fn ingest_reader<R: Read>(&mut self, reader: R) -> Result<(), GpadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut kept = 0usize;
        let mut duplicates = 0usize;
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|err| GpadError::Csv(err.to_string()))?;
            if index == 0 {
                if self.check_header {
                    check_header(&record);
                }
                continue;
            }
            if record.len() <= SYSTEMS_COLUMN {
                return Err(GpadError::ShortRow {
                    line: record
                        .position()
                        .map(|pos| pos.line())
                        .unwrap_or(index as u64 + 1),
                    columns: record.len(),
                });
            }
            if self.aggregation.insert(
                &record[CODE_COLUMN],
                &record[NAME_COLUMN],
                &record[SYSTEMS_COLUMN],
            ) {
                kept += 1;
            } else {
                duplicates += 1;
            }
        }
        debug!(kept, duplicates, "ingested rows");
        Ok(())
    }

    pub fn ingest_path(&mut self, path: &Utf8Path) -> Result<(), GpadError> {
        info!(file = %path, "processing data file");
        let file = File::open(path.as_std_path())
            .map_err(|err| GpadError::Filesystem(format!("open {path}: {err}")))?;
        self.ingest_reader(file)
    }

    pub fn finish(self) -> Aggregation {
        self.aggregation
    }
}

/// Aggregate several files in order; a code seen in an earlier file keeps
/// its values.
pub fn aggregate_files(
    paths: &[Utf8PathBuf],
    check_header: bool,
) -> Result<Aggregation, GpadError> {
    let mut aggregator = Aggregator::new().with_header_check(check_header);
    for path in paths {
        aggregator.ingest_path(path)?;
    }
    Ok(aggregator.finish())
}

fn check_header(record: &csv::StringRecord) {
    for (column, expected) in EXPECTED_HEADER {
        let actual = record.get(column).unwrap_or_default();
        if !actual.to_ascii_lowercase().contains(expected) {
            warn!(column, actual, expected, "unexpected header name");
        }
    }
}
