//! # Advanced Results
//!
//! The listing pipeline: translate the filter request, resolve the page,
//! count, execute, and wrap the results.

use std::sync::Arc;

use tracing::debug;

use crate::store::DocumentStore;

use super::errors::QueryResult;
use super::filter::FilterSet;
use super::pagination::{PageRequest, PaginationConfig, PaginationState, TotalScope};
use super::parser::{ExpansionDirective, FilterRequest, QueryDescriptor};
use super::response::ResultEnvelope;

/// Listing pipeline bound to a store and pagination settings
#[derive(Clone)]
pub struct AdvancedResults {
    store: Arc<dyn DocumentStore>,
    config: PaginationConfig,
}

impl AdvancedResults {
    pub fn new(store: Arc<dyn DocumentStore>, config: PaginationConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// List `collection` according to `request`.
    ///
    /// `expand` comes from the route, never from the client.
    pub async fn run(
        &self,
        collection: &str,
        expand: Option<ExpansionDirective>,
        request: &FilterRequest,
    ) -> QueryResult<ResultEnvelope> {
        let query = QueryDescriptor::translate(request, expand)?;
        let page = PageRequest::resolve(request.get("page"), request.get("limit"), &self.config);

        let total = match self.config.total_scope {
            TotalScope::Filtered => self.store.count(collection, &query.filter).await?,
            TotalScope::Collection => self.store.count(collection, &FilterSet::new()).await?,
        };
        let state = PaginationState::new(page, total);

        debug!(
            collection,
            filters = query.filter.len(),
            start_index = state.start_index,
            end_index = state.end_index,
            total,
            "listing"
        );

        let results = self.store.find(collection, &query.paginate(page)).await?;
        Ok(ResultEnvelope::build(results, &state))
    }
}
