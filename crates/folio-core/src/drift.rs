// Keeps the embedded fallback honest against the live catalog
use crate::models::{Catalog, ProjectRecord};

/// A fallback record that no longer matches its live counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDrift {
    pub id: String,
    pub fields: Vec<&'static str>,
}

/// Differences between the live catalog and the fallback dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogDrift {
    /// In the fallback, gone from the live catalog
    pub missing_from_live: Vec<String>,
    /// Present in both with differing content
    pub changed: Vec<RecordDrift>,
}

impl CatalogDrift {
    pub fn is_clean(&self) -> bool {
        self.missing_from_live.is_empty() && self.changed.is_empty()
    }
}

/// Compare every fallback record with the live record of the same id
///
/// The fallback is a subset of the live catalog, so live-only records are fine.
pub fn compare_catalogs(live: &Catalog, fallback: &Catalog) -> CatalogDrift {
    let mut drift = CatalogDrift::default();

    for record in fallback {
        match live.get(&record.id) {
            None => drift.missing_from_live.push(record.id.clone()),
            Some(current) => {
                let fields = changed_fields(record, current);
                if !fields.is_empty() {
                    drift.changed.push(RecordDrift {
                        id: record.id.clone(),
                        fields,
                    });
                }
            }
        }
    }

    drift
}

fn changed_fields(a: &ProjectRecord, b: &ProjectRecord) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if a.title != b.title {
        fields.push("title");
    }
    if a.description != b.description {
        fields.push("description");
    }
    if a.image != b.image {
        fields.push("image");
    }
    if a.source() != b.source() {
        fields.push("github");
    }
    if a.demo() != b.demo() {
        fields.push("demo");
    }
    if a.technologies != b.technologies {
        fields.push("technologies");
    }
    if a.status != b.status {
        fields.push("status");
    }
    fields
}
