//! Search request-body construction and result shape.

use serde_json::{json, Value};

use crate::document::Document;

/// The outcome of a [`query`](crate::ElasticDao::query): the matching
/// documents (decoded), the total match count, and aggregation results when
/// aggregations were requested.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Matching documents with the decoder applied to each.
    pub documents: Vec<Document>,
    /// Total number of matching documents (`hits.total.value`).
    pub total: u64,
    /// Aggregation results, absent when none were requested.
    pub aggregations: Option<Value>,
}

/// Pagination, aggregation, and sort options for [`query`](crate::ElasticDao::query).
///
/// Offset precedence: an explicit [`position`](Self::with_position) always wins
/// over a [`page`](Self::with_page)-derived offset. A page given without a size
/// yields offset 0 — pages are only meaningful alongside a size.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Maximum number of documents to return.
    pub size: Option<u64>,
    /// 1-based page number; offset is `(page - 1) * size`.
    pub page: Option<u64>,
    /// Explicit result offset, overriding any page-derived offset.
    pub position: Option<u64>,
    /// Aggregations, passed verbatim under `aggs`.
    pub aggregations: Option<Value>,
    /// Sort clauses, passed verbatim under `sort`.
    pub sort: Option<Value>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_aggregations(mut self, aggregations: Value) -> Self {
        self.aggregations = Some(aggregations);
        self
    }

    pub fn with_sort(mut self, sort: Value) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Builds the search request body for a query and its options.
pub(crate) fn build_search_body(query: &Value, opts: &QueryOptions) -> Value {
    let mut body = json!({ "query": query });

    if let Some(size) = opts.size {
        body["size"] = json!(size);
    }
    if let Some(page) = opts.page {
        body["from"] = json!(page.saturating_sub(1) * opts.size.unwrap_or(0));
    }
    if let Some(position) = opts.position {
        body["from"] = json!(position);
    }
    if let Some(ref aggs) = opts.aggregations {
        body["aggs"] = aggs.clone();
    }
    if let Some(ref sort) = opts.sort {
        body["sort"] = sort.clone();
    }

    body
}

/// Builds the count request body: same shape as a search body but with
/// `size` forced to 0 so no documents come back.
pub(crate) fn build_count_body(query: &Value, aggregations: Option<&Value>) -> Value {
    let mut body = json!({ "query": query });
    if let Some(aggs) = aggregations {
        body["aggs"] = aggs.clone();
    }
    body["size"] = json!(0);
    body
}
