//! AQL search.

use tracing::{debug, error, instrument};

use crate::error::ArtifactoryError;
use crate::http::HttpClient;
use crate::models::aql::{Aql, AqlResponse};

/// Runs AQL queries.
#[derive(Debug, Clone)]
pub struct ArtifactoryAql {
    http: HttpClient,
}

impl ArtifactoryAql {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Runs `aql` and returns the raw result objects.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::Aql`] with the server message when the
    /// query is refused (400).
    #[instrument(skip(self, aql), fields(domain = %aql.domain))]
    pub async fn query(&self, aql: &Aql) -> Result<Vec<serde_json::Value>, ArtifactoryError> {
        let query = aql.to_query_string();
        debug!(query = %query, "running AQL query");
        let response: AqlResponse = self
            .http
            .post("api/search/aql")?
            .text(query)
            .fetch_json()
            .await
            .map_err(|e| match e {
                ArtifactoryError::Http {
                    status: 400, body, ..
                } => {
                    error!(message = %body, "AQL query refused");
                    ArtifactoryError::Aql { message: body }
                }
                other => other,
            })?;
        debug!(results = response.results.len(), "AQL query done");
        Ok(response.results)
    }
}
