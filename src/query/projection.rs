//! # Field Projection
//!
//! `select=name,description` keeps only the listed fields (plus the document
//! identifier); `select=-photo,-user` drops the listed fields instead.
//! Dotted names such as `location.state` address nested fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::ID_FIELD;

use super::errors::{QueryError, QueryResult};
use super::filter::lookup_path;

/// Field projection applied to each returned document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Keep exactly these fields and the identifier
    Include(Vec<String>),

    /// Drop these fields
    Exclude(Vec<String>),
}

impl Projection {
    /// Parse a comma-separated `select` value.
    ///
    /// Returns `None` when the list holds no field names.
    pub fn parse(value: &str) -> QueryResult<Option<Self>> {
        let fields: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if fields.is_empty() {
            return Ok(None);
        }

        let excluded = fields.iter().filter(|f| f.starts_with('-')).count();
        if excluded == 0 {
            return Ok(Some(Projection::Include(
                fields.into_iter().map(str::to_string).collect(),
            )));
        }
        if excluded != fields.len() {
            return Err(QueryError::InvalidQueryParam(
                "select cannot mix included and excluded fields".to_string(),
            ));
        }

        let names: Vec<String> = fields
            .iter()
            .map(|f| f.trim_start_matches('-').to_string())
            .filter(|f| !f.is_empty())
            .collect();
        if names.is_empty() {
            return Ok(None);
        }
        Ok(Some(Projection::Exclude(names)))
    }

    /// Include-projection over the given fields
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Include(fields.into_iter().map(Into::into).collect())
    }

    /// Apply the projection to a document; non-object values pass through
    pub fn apply(&self, doc: Value) -> Value {
        match (self, doc) {
            (Projection::Include(fields), doc @ Value::Object(_)) => {
                let mut projected = Map::new();
                if let Some(id) = doc.get(ID_FIELD) {
                    projected.insert(ID_FIELD.to_string(), id.clone());
                }
                for field in fields {
                    if let Some(value) = lookup_path(&doc, field) {
                        insert_path(&mut projected, field, value.clone());
                    }
                }
                Value::Object(projected)
            }
            (Projection::Exclude(fields), Value::Object(mut obj)) => {
                for field in fields {
                    remove_path(&mut obj, field);
                }
                Value::Object(obj)
            }
            (_, other) => other,
        }
    }
}

/// Place `value` at a dotted path, creating parent objects as needed
fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let parent = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = parent {
                insert_path(child, rest, value);
            }
        }
    }
}

fn remove_path(target: &mut Map<String, Value>, path: &str) {
    match path.split_once('.') {
        None => {
            target.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(child)) = target.get_mut(head) {
                remove_path(child, rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_include() {
        let projection = Projection::parse("name, description").unwrap().unwrap();
        assert_eq!(projection, Projection::include(["name", "description"]));
    }

    #[test]
    fn test_parse_exclude() {
        let projection = Projection::parse("-photo,-user").unwrap().unwrap();
        assert_eq!(
            projection,
            Projection::Exclude(vec!["photo".to_string(), "user".to_string()])
        );
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert!(Projection::parse("").unwrap().is_none());
        assert!(Projection::parse(" , ").unwrap().is_none());
    }

    #[test]
    fn test_parse_mixed_rejected() {
        assert!(matches!(
            Projection::parse("name,-photo"),
            Err(QueryError::InvalidQueryParam(_))
        ));
    }

    #[test]
    fn test_include_keeps_identifier() {
        let doc = json!({"id": "b1", "name": "Devworks", "description": "x", "housing": true});
        let projected = Projection::include(["name"]).apply(doc);

        assert_eq!(projected, json!({"id": "b1", "name": "Devworks"}));
    }

    #[test]
    fn test_exclude_drops_fields() {
        let doc = json!({"id": "b1", "name": "Devworks", "photo": "no-photo.jpg"});
        let projected = Projection::Exclude(vec!["photo".to_string()]).apply(doc);

        assert_eq!(projected, json!({"id": "b1", "name": "Devworks"}));
    }

    #[test]
    fn test_include_nested_field() {
        let doc = json!({"id": "b1", "name": "Devworks", "location": {"state": "MA", "city": "Boston"}});

        assert_eq!(
            Projection::include(["location.state"]).apply(doc.clone()),
            json!({"id": "b1", "location": {"state": "MA"}})
        );
        assert_eq!(
            Projection::include(["location.state", "location.city", "name"]).apply(doc.clone()),
            doc
        );
        assert_eq!(
            Projection::include(["location.zipcode"]).apply(doc),
            json!({"id": "b1"})
        );
    }

    #[test]
    fn test_exclude_nested_field() {
        let doc = json!({"id": "b1", "location": {"state": "MA", "city": "Boston"}, "name": "Devworks"});
        let projected = Projection::parse("-location.city").unwrap().unwrap().apply(doc);

        assert_eq!(
            projected,
            json!({"id": "b1", "location": {"state": "MA"}, "name": "Devworks"})
        );
    }
}
