//! Index schema definition and request-body construction.

use serde_json::{json, Value};

/// Settings and mappings for an index to be created.
///
/// Only `mappings` is required. Shard and replica counts carry fixed defaults;
/// every other knob is emitted in the request body only when set, never
/// defaulted on the wire.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    /// Field mappings, passed verbatim under `mappings`.
    pub mappings: Value,
    /// Number of primary shards (default: 1).
    pub shards: u32,
    /// Number of replica shards (default: 0).
    pub replicas: u32,
    /// Limit for `index.mapping.total_fields`.
    pub total_fields_limit: Option<u32>,
    /// Limit for `index.mapping.nested_fields`.
    pub nested_fields_limit: Option<u32>,
    /// Limit for `index.mapping.depth`.
    pub depth_limit: Option<u32>,
    /// Custom analyzer definitions under `settings.analysis.analyzer`.
    pub analyzer: Option<Value>,
    /// Custom tokenizer definitions under `settings.analysis.tokenizer`.
    pub tokenizer: Option<Value>,
    /// Custom normalizer definitions under `settings.analysis.normalizer`.
    pub normalizer: Option<Value>,
    /// Custom token filter definitions under `settings.analysis.filter`.
    pub filter: Option<Value>,
    /// Custom character filter definitions under `settings.analysis.char_filter`.
    pub char_filter: Option<Value>,
}

impl IndexSpec {
    /// Creates a spec with the given mappings, 1 shard and 0 replicas.
    pub fn new(mappings: Value) -> Self {
        Self {
            mappings,
            shards: 1,
            replicas: 0,
            total_fields_limit: None,
            nested_fields_limit: None,
            depth_limit: None,
            analyzer: None,
            tokenizer: None,
            normalizer: None,
            filter: None,
            char_filter: None,
        }
    }

    pub fn with_shards(mut self, shards: u32) -> Self {
        self.shards = shards;
        self
    }

    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_total_fields_limit(mut self, limit: u32) -> Self {
        self.total_fields_limit = Some(limit);
        self
    }

    pub fn with_nested_fields_limit(mut self, limit: u32) -> Self {
        self.nested_fields_limit = Some(limit);
        self
    }

    pub fn with_depth_limit(mut self, limit: u32) -> Self {
        self.depth_limit = Some(limit);
        self
    }

    pub fn with_analyzer(mut self, analyzer: Value) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Value) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Value) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_char_filter(mut self, char_filter: Value) -> Self {
        self.char_filter = Some(char_filter);
        self
    }

    /// Builds the settings+mappings request body for index creation.
    pub(crate) fn build_create_body(&self) -> Value {
        let mut body = json!({
            "settings": {
                "index": {
                    "number_of_shards": self.shards,
                    "number_of_replicas": self.replicas,
                    "mapping": {},
                },
                "analysis": {}
            },
            "mappings": self.mappings
        });

        let mapping = &mut body["settings"]["index"]["mapping"];
        if let Some(limit) = self.total_fields_limit {
            mapping["total_fields"] = json!({ "limit": limit });
        }
        if let Some(limit) = self.nested_fields_limit {
            mapping["nested_fields"] = json!({ "limit": limit });
        }
        if let Some(limit) = self.depth_limit {
            mapping["depth"] = json!({ "limit": limit });
        }

        let analysis = &mut body["settings"]["analysis"];
        if let Some(ref analyzer) = self.analyzer {
            analysis["analyzer"] = analyzer.clone();
        }
        if let Some(ref tokenizer) = self.tokenizer {
            analysis["tokenizer"] = tokenizer.clone();
        }
        if let Some(ref normalizer) = self.normalizer {
            analysis["normalizer"] = normalizer.clone();
        }
        if let Some(ref filter) = self.filter {
            analysis["filter"] = filter.clone();
        }
        if let Some(ref char_filter) = self.char_filter {
            analysis["char_filter"] = char_filter.clone();
        }

        body
    }
}
