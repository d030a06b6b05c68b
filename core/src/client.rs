//! Stateless HTTP request builder and response parser for the Gradient API.
//!
//! # Design
//! `GradientClient` holds the endpoint configuration and the header set to
//! send, and nothing else. Each operation is split into a `build_*` method
//! that produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the HTTP round-trip in between.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, Operation};
use crate::headers::HeaderSet;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Payload};
use crate::types::{
    decode_page, decode_single, Cluster, CreateHyperparameter, Created, Hyperparameter, ListFilter,
    Page,
};

/// Synchronous, stateless client for the clusters and hyperparameter APIs.
#[derive(Debug, Clone)]
pub struct GradientClient {
    config: ApiConfig,
    headers: HeaderSet,
}

impl GradientClient {
    pub fn new(config: ApiConfig, api_key: &str) -> Self {
        Self {
            config,
            headers: HeaderSet::new(api_key),
        }
    }

    /// A client sending `api_key` instead of the configured key. `None`
    /// returns an identical client. `self` is left unchanged either way.
    pub fn with_api_key(&self, api_key: Option<&str>) -> Self {
        let headers = match api_key {
            Some(key) => self.headers.with_api_key(key),
            None => self.headers.clone(),
        };
        Self {
            config: self.config.clone(),
            headers,
        }
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    // -----------------------------------------------------------------------
    // Clusters
    // -----------------------------------------------------------------------

    pub fn build_get_cluster(&self, id: &str) -> HttpRequest {
        self.get(
            format!("{}/clusters/getCluster", self.config.api_host),
            vec![("id".to_string(), id.to_string())],
        )
    }

    pub fn build_list_clusters(&self, filter: &ListFilter) -> Result<HttpRequest, ApiError> {
        let encoded =
            serde_json::to_string(filter).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.get(
            format!("{}/clusters/getClusters", self.config.api_host),
            vec![("filter".to_string(), encoded)],
        ))
    }

    pub fn parse_get_cluster(&self, response: HttpResponse) -> Result<Cluster, ApiError> {
        parse_single(Operation::GetCluster, response)
    }

    pub fn parse_list_clusters(&self, response: HttpResponse) -> Result<Page<Cluster>, ApiError> {
        parse_list(Operation::ListClusters, response)
    }

    // -----------------------------------------------------------------------
    // Hyperparameter tuning jobs
    // -----------------------------------------------------------------------

    pub fn build_create_hyperparameter(
        &self,
        input: &CreateHyperparameter,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.hyperopt_url(None),
            headers: self.headers.clone(),
            payload: Payload::Json(body),
        })
    }

    pub fn build_list_hyperparameters(&self) -> HttpRequest {
        self.get(
            self.hyperopt_url(None),
            vec![("limit".to_string(), "-1".to_string())],
        )
    }

    pub fn build_get_hyperparameter(&self, id: &str) -> HttpRequest {
        self.get(self.hyperopt_url(Some(id)), Vec::new())
    }

    pub fn build_start_hyperparameter(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Put,
            url: format!("{}start/", self.hyperopt_url(Some(id))),
            headers: self.headers.clone(),
            payload: Payload::Empty,
        }
    }

    pub fn parse_create_hyperparameter(&self, response: HttpResponse) -> Result<Created, ApiError> {
        parse_single(Operation::CreateHyperparameter, response)
    }

    pub fn parse_list_hyperparameters(
        &self,
        response: HttpResponse,
    ) -> Result<Page<Hyperparameter>, ApiError> {
        parse_list(Operation::ListHyperparameters, response)
    }

    pub fn parse_get_hyperparameter(
        &self,
        response: HttpResponse,
    ) -> Result<Hyperparameter, ApiError> {
        parse_single(Operation::GetHyperparameter, response)
    }

    pub fn parse_start_hyperparameter(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::StartHyperparameter, &response)
    }

    fn get(&self, url: String, params: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: self.headers.clone(),
            payload: Payload::Query(params),
        }
    }

    fn hyperopt_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/hyperopt/{id}/", self.config.experiments_host),
            None => format!("{}/hyperopt/", self.config.experiments_host),
        }
    }
}

/// Map a non-success status to the normalized `ApiError`.
fn check_status(operation: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    debug!(status = response.status, %operation, "response received");
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_response(
        operation,
        response.status,
        &response.body,
    ))
}

fn parse_single<T: DeserializeOwned>(
    operation: Operation,
    response: HttpResponse,
) -> Result<T, ApiError> {
    check_status(operation, &response)?;
    decode_single(&response.body).map_err(|e| malformed(operation, e))
}

fn parse_list<T: DeserializeOwned>(
    operation: Operation,
    response: HttpResponse,
) -> Result<Page<T>, ApiError> {
    check_status(operation, &response)?;
    decode_page(&response.body).map_err(|e| malformed(operation, e))
}

fn malformed(operation: Operation, err: serde_json::Error) -> ApiError {
    debug!(%operation, error = %err, "response body does not match schema");
    ApiError::MalformedResponse(format!("unexpected response while {operation}: {err}"))
}
