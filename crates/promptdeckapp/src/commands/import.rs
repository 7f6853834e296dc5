//! JSON import.
//!
//! The payload must be a JSON array of template-shaped objects. Each element
//! goes through [`ImportRecord`], which backfills missing fields. Elements are
//! dropped when they:
//!
//! - fail to parse as an object of the expected shape (counted as skipped)
//! - lack a `subject` (counted as skipped)
//! - carry a signature already present in the store, or earlier in the same
//!   payload (counted as duplicates; nothing is merged)
//!
//! A malformed payload never errors: the summary reports `success = false`.
//! Accepted records are stored in one bulk write and the index is rebuilt on
//! next use.

use crate::error::Result;
use crate::model::ImportRecord;
use crate::store::{DataStore, Durability};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub success: bool,
    pub message: String,
    pub imported_count: usize,
    pub skipped_count: usize,
    pub duplicate_count: usize,
    pub persisted: bool,
}

impl ImportSummary {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            imported_count: 0,
            skipped_count: 0,
            duplicate_count: 0,
            persisted: true,
        }
    }
}

pub fn run<S: DataStore>(store: &mut S, json: &str) -> Result<ImportSummary> {
    let payload: serde_json::Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "import payload is not valid JSON");
            return Ok(ImportSummary::failed(format!("Invalid JSON: {}", e)));
        }
    };
    let serde_json::Value::Array(items) = payload else {
        return Ok(ImportSummary::failed("Import payload must be a JSON array"));
    };

    let mut seen: HashSet<String> = store
        .templates()?
        .iter()
        .map(|t| t.signature.clone())
        .collect();
    let mut accepted = Vec::new();
    let mut skipped = 0;
    let mut duplicates = 0;

    for (position, item) in items.into_iter().enumerate() {
        let record: ImportRecord = match serde_json::from_value(item) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(position, error = %e, "skipping unparseable import record");
                skipped += 1;
                continue;
            }
        };
        let Some(template) = record.into_template()? else {
            tracing::warn!(position, "skipping import record without subject");
            skipped += 1;
            continue;
        };
        if !seen.insert(template.signature.clone()) {
            duplicates += 1;
            continue;
        }
        accepted.push(template);
    }

    let imported = accepted.len();
    let durability = store.import_templates(accepted)?;
    tracing::info!(imported, skipped, duplicates, "import finished");

    let mut message = format!(
        "Imported {} template(s); skipped {} invalid, {} duplicate",
        imported, skipped, duplicates
    );
    if let Durability::Unsaved(reason) = &durability {
        message.push_str(&format!(" (not saved: {})", reason));
    }

    Ok(ImportSummary {
        success: true,
        message,
        imported_count: imported,
        skipped_count: skipped,
        duplicate_count: duplicates,
        persisted: durability.is_persisted(),
    })
}
