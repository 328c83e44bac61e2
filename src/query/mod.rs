//! # Query Pipeline
//!
//! Filtering, sorting, projection, pagination and expansion for listing
//! routes, independent of the backing store.

pub mod advanced;
pub mod errors;
pub mod filter;
pub mod pagination;
pub mod parser;
pub mod projection;
pub mod response;
pub mod sort;

pub use advanced::AdvancedResults;
pub use errors::{QueryError, QueryResult};
pub use filter::{ComparisonOp, FilterExpr, FilterSet};
pub use pagination::{
    PageLink, PageRequest, PaginationConfig, PaginationLinks, PaginationState, TotalScope,
};
pub use parser::{ExpansionDirective, FilterRequest, QueryDescriptor, RESERVED_KEYS};
pub use projection::Projection;
pub use response::ResultEnvelope;
pub use sort::SortKey;
