//! The Data Access Object facade.

use std::fmt::{self, Debug, Display};
use std::future::Future;
use std::time::Duration;

use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::{IndicesCreateParts, IndicesDeleteParts};
use elasticsearch::{CountParts, Elasticsearch, ExistsParts, GetParts, IndexParts, SearchParts};
use serde_json::Value;

use crate::codec;
use crate::config::DaoConfig;
use crate::document::Document;
use crate::error::{DaoError, DaoResult};
use crate::id::DocumentId;
use crate::query::{build_count_body, build_search_body, QueryOptions, QueryResult};
use crate::schema::IndexSpec;

/// Data Access Object for an Elasticsearch-compatible backend.
///
/// Holds at most one client handle, created by [`connect`](Self::connect) and
/// released by [`close`](Self::close). Every operation requires a connected
/// handle and fails with [`DaoError::NotConnected`] otherwise. Dropping a
/// connected instance tears the transport down with it.
///
/// Document payloads pass through the codec pair on every write and read:
/// date and datetime leaves are serialized to ISO-8601 strings before
/// transmission and revived into typed values after retrieval, so callers
/// never handle backend date formats.
///
/// # Example
///
/// ```no_run
/// use elastic_dao::{DaoConfig, ElasticDao, IndexSpec, QueryOptions};
/// use serde_json::json;
///
/// # async fn run() -> Result<(), elastic_dao::DaoError> {
/// let mut dao = ElasticDao::new(DaoConfig::new("localhost", 9200));
/// dao.connect()?;
///
/// dao.create(
///     "sample",
///     &IndexSpec::new(json!({
///         "properties": {
///             "name": { "type": "text" },
///             "dateOfEntry": { "type": "date" }
///         }
///     })),
/// )
/// .await?;
///
/// let result = dao
///     .query(
///         "sample",
///         &json!({ "query_string": { "fields": ["name"], "query": "서울" } }),
///         &QueryOptions::new().with_size(10),
///     )
///     .await?;
/// println!("{} matches", result.total);
/// # Ok(())
/// # }
/// ```
pub struct ElasticDao {
    config: DaoConfig,
    client: Option<Elasticsearch>,
}

impl Debug for ElasticDao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticDao")
            .field("config", &self.config)
            .field("connected", &self.client.is_some())
            .finish_non_exhaustive()
    }
}

impl ElasticDao {
    /// Creates a new, unconnected instance for the given configuration.
    pub fn new(config: DaoConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DaoConfig {
        &self.config
    }

    /// Returns whether a client handle is currently held.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Builds and stores the client handle from the configuration.
    ///
    /// The underlying transport pools connections internally and opens them
    /// lazily; a bad host or port therefore surfaces on the first operation,
    /// not here. Only malformed configuration fails `connect` itself.
    pub fn connect(&mut self) -> DaoResult<()> {
        let url: elasticsearch::http::Url = self.config.url().parse().map_err(|e| {
            DaoError::Connection {
                message: format!("invalid node url {}: {}", self.config.url(), e),
                source: None,
            }
        })?;

        let pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(pool)
            .timeout(Duration::from_secs(self.config.timeout_secs));

        if self.config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some((username, password)) = self.config.credentials() {
            builder = builder.auth(Credentials::Basic(username.to_string(), password.to_string()));
        }

        let transport = builder.build().map_err(|e| DaoError::Connection {
            message: format!("failed to build transport: {}", e),
            source: Some(Box::new(e)),
        })?;

        self.client = Some(Elasticsearch::new(transport));
        tracing::debug!(url = %self.config.url(), "connected");
        Ok(())
    }

    /// Releases the client handle. A no-op when not connected.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!("closed");
        }
    }

    fn client(&self) -> DaoResult<&Elasticsearch> {
        self.client.as_ref().ok_or(DaoError::NotConnected)
    }

    /// Sends a request, retrying timed-out attempts per the configured policy.
    ///
    /// Only timeouts are ever retried, and only when `retry_on_timeout` is
    /// set, at most `max_retries` times. Transport and backend failures are
    /// translated and surfaced immediately.
    async fn send_with_retry<F, Fut>(&self, mut request: F) -> DaoResult<Response>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Response, elasticsearch::Error>>,
    {
        let mut attempts = 0u32;
        loop {
            match request().await {
                Ok(response) => return Ok(response),
                Err(err)
                    if err.is_timeout()
                        && self.config.retry_on_timeout
                        && attempts < self.config.max_retries =>
                {
                    attempts += 1;
                    tracing::debug!(attempt = attempts, "retrying timed-out request");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Turns an error-status response into a backend error carrying the
    /// backend's reported reason when one is present.
    async fn error_from_response(response: Response) -> DaoError {
        let status = response.status_code().as_u16();
        match response.json::<Value>().await {
            Ok(body) => {
                let message = body["error"]["reason"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| body.to_string());
                DaoError::Backend {
                    message,
                    status: Some(status),
                    source: None,
                }
            }
            Err(_) => DaoError::Backend {
                message: format!("status {}", status),
                status: Some(status),
                source: None,
            },
        }
    }

    /// Creates an index with the given settings and mappings.
    ///
    /// An already-existing index (status 400) is accepted as success, so
    /// repeated creation of the same index is idempotent by policy.
    pub async fn create(&self, index: &str, spec: &IndexSpec) -> DaoResult<()> {
        let client = self.client()?;
        let body = spec.build_create_body();
        let indices = client.indices();

        let response = self
            .send_with_retry(|| {
                indices
                    .create(IndicesCreateParts::Index(index))
                    .body(body.clone())
                    .send()
            })
            .await?;

        let status = response.status_code();
        if status.as_u16() == 400 {
            tracing::debug!(index, "index already exists, accepting");
            return Ok(());
        }
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        tracing::debug!(index, "created index");
        Ok(())
    }

    /// Deletes an index.
    ///
    /// Bad-request (400) and not-found (404) responses are accepted as
    /// success, so deleting a nonexistent index is not an error.
    pub async fn delete(&self, index: &str) -> DaoResult<()> {
        let client = self.client()?;
        let indices = client.indices();
        let index_names = [index];

        let response = self
            .send_with_retry(|| {
                indices
                    .delete(IndicesDeleteParts::Index(&index_names))
                    .send()
            })
            .await?;

        let status = response.status_code();
        if matches!(status.as_u16(), 400 | 404) {
            tracing::debug!(index, status = status.as_u16(), "delete suppressed");
            return Ok(());
        }
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        tracing::debug!(index, "deleted index");
        Ok(())
    }

    /// Returns the total document count for an index, with no filtering.
    ///
    /// A missing index is an error: the backend's `index_not_found_exception`
    /// surfaces as [`DaoError::Backend`].
    pub async fn total(&self, index: &str) -> DaoResult<u64> {
        let client = self.client()?;
        let index_names = [index];

        let response = self
            .send_with_retry(|| client.count(CountParts::Index(&index_names)).send())
            .await?;

        if !response.status_code().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: Value = response.json().await.map_err(|e| DaoError::Response {
            message: e.to_string(),
        })?;

        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| DaoError::Response {
                message: "count response missing count field".to_string(),
            })
    }

    /// Writes a document under the backend id derived from `id`, replacing
    /// any existing document with the same derived id.
    pub async fn set(&self, index: &str, doc: &Document, id: impl Display) -> DaoResult<()> {
        let client = self.client()?;
        let doc_id = DocumentId::derive(id).to_string();
        let body = codec::encode_document(doc);

        let response = self
            .send_with_retry(|| {
                client
                    .index(IndexParts::IndexId(index, &doc_id))
                    .body(body.clone())
                    .send()
            })
            .await?;

        if !response.status_code().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    /// Fetches the document stored under the backend id derived from `id`.
    ///
    /// Returns `None` when no such document exists; that is not an error.
    pub async fn get(&self, index: &str, id: impl Display) -> DaoResult<Option<Document>> {
        let client = self.client()?;
        let doc_id = DocumentId::derive(id).to_string();

        let response = self
            .send_with_retry(|| client.get(GetParts::IndexId(index, &doc_id)).send())
            .await?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: Value = response.json().await.map_err(|e| DaoError::Response {
            message: e.to_string(),
        })?;

        let source = body.get("_source").ok_or_else(|| DaoError::Response {
            message: "get response missing _source".to_string(),
        })?;

        codec::decode_document(source)
            .map(Some)
            .ok_or_else(|| DaoError::Response {
                message: "_source is not an object".to_string(),
            })
    }

    /// Returns whether a document exists under the backend id derived from `id`.
    pub async fn exists(&self, index: &str, id: impl Display) -> DaoResult<bool> {
        let client = self.client()?;
        let doc_id = DocumentId::derive(id).to_string();

        let response = self
            .send_with_retry(|| client.exists(ExistsParts::IndexId(index, &doc_id)).send())
            .await?;

        let status = response.status_code();
        if status.is_success() {
            return Ok(true);
        }
        if status.as_u16() == 404 {
            return Ok(false);
        }
        Err(Self::error_from_response(response).await)
    }

    /// Runs a search and returns the decoded documents, the total match
    /// count, and aggregation results when any were requested.
    pub async fn query(
        &self,
        index: &str,
        query: &Value,
        opts: &QueryOptions,
    ) -> DaoResult<QueryResult> {
        let client = self.client()?;
        let body = build_search_body(query, opts);
        let index_names = [index];

        let response = self
            .send_with_retry(|| {
                client
                    .search(SearchParts::Index(&index_names))
                    .body(body.clone())
                    .send()
            })
            .await?;

        if !response.status_code().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: Value = response.json().await.map_err(|e| DaoError::Response {
            message: e.to_string(),
        })?;

        let documents = body["hits"]["hits"]
            .as_array()
            .map(|hits| {
                hits.iter()
                    .filter_map(|hit| hit.get("_source"))
                    .filter_map(codec::decode_document)
                    .collect()
            })
            .unwrap_or_default();

        let total = body["hits"]["total"]["value"]
            .as_u64()
            .ok_or_else(|| DaoError::Response {
                message: "search response missing hits.total.value".to_string(),
            })?;

        let aggregations = body.get("aggregations").cloned();

        Ok(QueryResult {
            documents,
            total,
            aggregations,
        })
    }

    /// Returns only the total match count for a query, fetching no documents.
    pub async fn count(
        &self,
        index: &str,
        query: &Value,
        aggregations: Option<&Value>,
    ) -> DaoResult<u64> {
        let client = self.client()?;
        let body = build_count_body(query, aggregations);
        let index_names = [index];

        let response = self
            .send_with_retry(|| {
                client
                    .search(SearchParts::Index(&index_names))
                    .body(body.clone())
                    .send()
            })
            .await?;

        if !response.status_code().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: Value = response.json().await.map_err(|e| DaoError::Response {
            message: e.to_string(),
        })?;

        body["hits"]["total"]["value"]
            .as_u64()
            .ok_or_else(|| DaoError::Response {
                message: "count response missing hits.total.value".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lifecycle() {
        let mut dao = ElasticDao::new(DaoConfig::default());
        assert!(!dao.is_connected());

        // close from the uninitialized state is a no-op
        dao.close();
        assert!(!dao.is_connected());

        dao.connect().unwrap();
        assert!(dao.is_connected());

        dao.close();
        assert!(!dao.is_connected());
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let dao = ElasticDao::new(DaoConfig::default());

        let err = dao.total("sample").await.unwrap_err();
        assert!(matches!(err, DaoError::NotConnected));

        let err = dao.get("sample", "1").await.unwrap_err();
        assert!(matches!(err, DaoError::NotConnected));

        let err = dao
            .query("sample", &json!({ "match_all": {} }), &QueryOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DaoError::NotConnected));
    }

    #[test]
    fn test_reconnect_after_close() {
        let mut dao = ElasticDao::new(DaoConfig::default());
        dao.connect().unwrap();
        dao.close();
        dao.connect().unwrap();
        assert!(dao.is_connected());
    }

    #[test]
    fn test_connect_with_auth_and_tls() {
        let config = DaoConfig::new("localhost", 9200)
            .with_auth("elastic", "changeme")
            .with_tls();
        let mut dao = ElasticDao::new(config);
        dao.connect().unwrap();
        assert!(dao.is_connected());
    }

    #[test]
    fn test_debug_does_not_require_connection() {
        let dao = ElasticDao::new(DaoConfig::default());
        let repr = format!("{:?}", dao);
        assert!(repr.contains("connected: false"));
    }
}
