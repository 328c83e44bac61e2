//! # Seed Loader
//!
//! Imports `<collection>.json` files (JSON arrays of documents) from a
//! directory. Missing files are skipped. Password material in user documents
//! is never imported.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use super::errors::{StoreError, StoreResult};
use super::{collections, DocumentStore};

/// Fields stripped from user documents on import
const USER_SECRET_FIELDS: [&str; 3] = ["password", "resetPasswordToken", "resetPasswordExpire"];

/// Documents imported per collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: BTreeMap<String, usize>,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.inserted.values().sum()
    }
}

/// Import every known collection found in `dir`
pub async fn load_seed_dir(store: &dyn DocumentStore, dir: &Path) -> StoreResult<SeedReport> {
    if !dir.is_dir() {
        return Err(StoreError::Seed(format!(
            "seed directory not found: {}",
            dir.display()
        )));
    }

    let mut report = SeedReport::default();

    for collection in collections::ALL {
        let path = dir.join(format!("{collection}.json"));
        if !path.is_file() {
            debug!(collection, path = %path.display(), "no seed file");
            continue;
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::Seed(format!("failed to read {}: {e}", path.display())))?;
        let docs: Vec<Value> = serde_json::from_str(&content)
            .map_err(|e| StoreError::Seed(format!("invalid JSON in {}: {e}", path.display())))?;

        let mut count = 0;
        for mut doc in docs {
            if collection == collections::USERS {
                if let Some(obj) = doc.as_object_mut() {
                    for field in USER_SECRET_FIELDS {
                        obj.remove(field);
                    }
                }
            }
            store.insert(collection, doc).await?;
            count += 1;
        }

        info!(collection, count, "seeded collection");
        report.inserted.insert(collection.to_string(), count);
    }

    Ok(report)
}
