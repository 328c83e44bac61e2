//! # In-Memory Document Store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::query::sort::compare_documents;
use crate::query::{ExpansionDirective, FilterSet, QueryDescriptor};

use super::errors::{StoreError, StoreResult};
use super::{DocumentStore, CREATED_AT_FIELD, ID_FIELD};

/// Legacy identifier field accepted on insert
const LEGACY_ID_FIELD: &str = "_id";

/// Collections held in memory: collection -> documents in insertion order
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections
    pub async fn len(&self) -> usize {
        self.data.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn document_id(doc: &Value) -> Option<&str> {
        doc.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Assign identifier and timestamp to a new document
    fn prepare(doc: Value) -> StoreResult<Map<String, Value>> {
        let Value::Object(mut obj) = doc else {
            return Err(StoreError::InvalidDocument(
                "document must be a JSON object".to_string(),
            ));
        };

        if let Some(legacy) = obj.remove(LEGACY_ID_FIELD) {
            obj.entry(ID_FIELD).or_insert(legacy);
        }

        match obj.get(ID_FIELD) {
            None => {
                obj.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
            }
            Some(Value::String(id)) if !id.is_empty() => {}
            Some(other) => {
                return Err(StoreError::InvalidDocument(format!(
                    "'{ID_FIELD}' must be a non-empty string, got {other}"
                )));
            }
        }

        obj.entry(CREATED_AT_FIELD).or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        });

        Ok(obj)
    }

    /// Replace the reference at `directive.path` with the referenced document
    fn expand(
        data: &HashMap<String, Vec<Value>>,
        mut doc: Value,
        directive: &ExpansionDirective,
    ) -> Value {
        let targets = data.get(&directive.collection);
        let projection = directive.projection();

        let resolve = |reference: &Value| -> Value {
            let Some(id) = reference.as_str() else {
                return reference.clone();
            };
            targets
                .and_then(|docs| docs.iter().find(|d| Self::document_id(d) == Some(id)))
                .map(|target| match &projection {
                    Some(projection) => projection.apply(target.clone()),
                    None => target.clone(),
                })
                .unwrap_or(Value::Null)
        };

        if let Some(slot) = doc.get_mut(&directive.path) {
            let expanded = match &*slot {
                Value::Array(references) => Value::Array(references.iter().map(resolve).collect()),
                reference => resolve(reference),
            };
            *slot = expanded;
        }

        doc
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(&self, collection: &str, query: &QueryDescriptor) -> StoreResult<Vec<Value>> {
        let data = self.data.read().await;

        let mut records: Vec<Value> = data
            .get(collection)
            .map(|docs| docs.iter().filter(|d| query.filter.matches(d)).cloned().collect())
            .unwrap_or_default();

        records.sort_by(|a, b| compare_documents(a, b, &query.sort));

        let records = records
            .into_iter()
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|doc| match &query.projection {
                Some(projection) => projection.apply(doc),
                None => doc,
            })
            .map(|doc| match &query.expand {
                Some(directive) => Self::expand(&data, doc, directive),
                None => doc,
            })
            .collect();

        Ok(records)
    }

    async fn count(&self, collection: &str, filter: &FilterSet) -> StoreResult<usize> {
        let data = self.data.read().await;
        Ok(data
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count())
            .unwrap_or(0))
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let data = self.data.read().await;
        Ok(data
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| Self::document_id(d) == Some(id)))
            .cloned())
    }

    async fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value> {
        let obj = Self::prepare(doc)?;
        let doc = Value::Object(obj);

        let mut data = self.data.write().await;
        let docs = data.entry(collection.to_string()).or_default();

        if docs.iter().any(|d| Self::document_id(d) == Self::document_id(&doc)) {
            return Err(StoreError::InvalidDocument(format!(
                "duplicate id in '{collection}': {}",
                Self::document_id(&doc).unwrap_or_default()
            )));
        }

        docs.push(doc.clone());
        Ok(doc)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        let Some(docs) = data.get_mut(collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|d| Self::document_id(d) != Some(id));
        Ok(docs.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterExpr, PageRequest, Projection, SortKey};
    use serde_json::json;

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert("bootcamps", json!({"id": "b1", "name": "Devworks", "description": "Full stack", "createdAt": "2024-01-01T00:00:00.000Z"}))
            .await
            .unwrap();
        store
            .insert("bootcamps", json!({"id": "b2", "name": "ModernTech", "description": "Mobile", "createdAt": "2024-02-01T00:00:00.000Z"}))
            .await
            .unwrap();
        for (id, bootcamp, tuition, created) in [
            ("c1", "b1", 8000, "2024-03-01T00:00:00.000Z"),
            ("c2", "b1", 12000, "2024-03-02T00:00:00.000Z"),
            ("c3", "b2", 10000, "2024-03-03T00:00:00.000Z"),
            ("c4", "missing", 6000, "2024-03-04T00:00:00.000Z"),
        ] {
            store
                .insert("courses", json!({"id": id, "bootcamp": bootcamp, "tuition": tuition, "createdAt": created}))
                .await
                .unwrap();
        }
        store
    }

    fn ids(docs: &[Value]) -> Vec<&str> {
        docs.iter().map(|d| d["id"].as_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = InMemoryStore::new();
        let doc = store.insert("users", json!({"name": "Ada"})).await.unwrap();

        assert!(!doc["id"].as_str().unwrap().is_empty());
        assert!(doc["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_insert_maps_legacy_id() {
        let store = InMemoryStore::new();
        let doc = store
            .insert("users", json!({"_id": "5d7a514b5d2c12c7449be042", "name": "Ada"}))
            .await
            .unwrap();

        assert_eq!(doc["id"], "5d7a514b5d2c12c7449be042");
        assert!(doc.get("_id").is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_non_objects_and_duplicates() {
        let store = InMemoryStore::new();

        assert!(matches!(
            store.insert("users", json!([1, 2])).await,
            Err(StoreError::InvalidDocument(_))
        ));
        assert!(matches!(
            store.insert("users", json!({"id": 7})).await,
            Err(StoreError::InvalidDocument(_))
        ));

        store.insert("users", json!({"id": "u1"})).await.unwrap();
        assert!(matches!(
            store.insert("users", json!({"id": "u1"})).await,
            Err(StoreError::InvalidDocument(_))
        ));
    }

    #[tokio::test]
    async fn test_find_default_order_is_newest_first() {
        let store = seeded().await;
        let docs = store.find("courses", &QueryDescriptor::default()).await.unwrap();

        assert_eq!(ids(&docs), vec!["c4", "c3", "c2", "c1"]);
    }

    #[tokio::test]
    async fn test_find_filter_sort_and_page() {
        let store = seeded().await;
        let query = QueryDescriptor {
            filter: FilterSet::new().and(FilterExpr::eq("bootcamp", json!("b1"))),
            sort: vec![SortKey::desc("tuition")],
            ..Default::default()
        };
        let docs = store.find("courses", &query).await.unwrap();
        assert_eq!(ids(&docs), vec!["c2", "c1"]);

        let page = QueryDescriptor::default().paginate(PageRequest::new(2, 3));
        let docs = store.find("courses", &page).await.unwrap();
        assert_eq!(ids(&docs), vec!["c1"]);
    }

    #[tokio::test]
    async fn test_find_expands_reference() {
        let store = seeded().await;
        let query = QueryDescriptor {
            sort: vec![SortKey::asc("id")],
            expand: Some(ExpansionDirective::new("bootcamp", "bootcamps").select(["name"])),
            ..Default::default()
        };
        let docs = store.find("courses", &query).await.unwrap();

        assert_eq!(docs[0]["bootcamp"], json!({"id": "b1", "name": "Devworks"}));
        assert_eq!(docs[2]["bootcamp"], json!({"id": "b2", "name": "ModernTech"}));
        assert_eq!(docs[3]["bootcamp"], Value::Null);
    }

    #[tokio::test]
    async fn test_projection_before_expansion() {
        let store = seeded().await;
        let query = QueryDescriptor {
            projection: Some(Projection::include(["tuition"])),
            expand: Some(ExpansionDirective::new("bootcamp", "bootcamps")),
            ..Default::default()
        };
        let docs = store.find("courses", &query).await.unwrap();

        assert!(docs.iter().all(|d| d.get("bootcamp").is_none()));
        assert!(docs.iter().all(|d| d.get("createdAt").is_none()));
    }

    #[tokio::test]
    async fn test_count_with_and_without_filter() {
        let store = seeded().await;

        assert_eq!(store.count("courses", &FilterSet::new()).await.unwrap(), 4);
        let expensive = FilterSet::new().and(FilterExpr::new(
            "tuition",
            crate::query::ComparisonOp::GreaterOrEqual,
            json!(10000),
        ));
        assert_eq!(store.count("courses", &expensive).await.unwrap(), 2);
        assert_eq!(store.count("nothing", &FilterSet::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_by_id_and_delete() {
        let store = seeded().await;

        assert!(store.find_by_id("bootcamps", "b1").await.unwrap().is_some());
        assert!(store.delete("bootcamps", "b1").await.unwrap());
        assert!(store.find_by_id("bootcamps", "b1").await.unwrap().is_none());
        assert!(!store.delete("bootcamps", "b1").await.unwrap());
        assert!(!store.delete("nothing", "b1").await.unwrap());
        assert_eq!(store.len().await, 5);
    }
}
