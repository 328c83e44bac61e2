//! # Result Envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::pagination::{PaginationLinks, PaginationState};

/// Uniform listing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope<T = Value> {
    pub success: bool,
    pub count: usize,
    pub pagination: PaginationLinks,
    pub results: Vec<T>,
}

impl<T> ResultEnvelope<T> {
    /// Wrap executed results with the page's links
    pub fn build(results: Vec<T>, state: &PaginationState) -> Self {
        Self {
            success: true,
            count: results.len(),
            pagination: state.links(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PageRequest;
    use serde_json::json;

    #[test]
    fn test_envelope_serialization() {
        let state = PaginationState::new(PageRequest::new(2, 1), 3);
        let envelope = ResultEnvelope::build(vec![json!({"id": "b2"})], &state);

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            json!({
                "success": true,
                "count": 1,
                "pagination": {
                    "next": {"page": 3, "limit": 1},
                    "prev": {"page": 1, "limit": 1}
                },
                "results": [{"id": "b2"}]
            })
        );
    }

    #[test]
    fn test_empty_envelope() {
        let state = PaginationState::new(PageRequest::new(1, 25), 0);
        let envelope: ResultEnvelope = ResultEnvelope::build(Vec::new(), &state);

        assert_eq!(envelope.count, 0);
        assert_eq!(envelope.pagination, PaginationLinks::default());
    }
}
