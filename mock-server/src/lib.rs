//! In-memory stand-in for the Paperspace API and experiments services.
//!
//! Both resource families are served from one listener: clusters under
//! `/clusters/*`, tuning jobs under `/experiments/v1/hyperopt/*`. Error bodies
//! mimic the shapes the real services send, which differ per host.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "mock-api-key";

const STATE_CREATED: i64 = 1;
const STATE_RUNNING: i64 = 2;

const REQUIRED_JOB_FIELDS: [&str; 7] = [
    "name",
    "projectHandle",
    "tuningCommand",
    "workerContainer",
    "workerMachineType",
    "workerCommand",
    "workerCount",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cluster_type: String,
    pub is_private: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub handle: String,
    pub name: String,
    pub project_handle: String,
    pub tuning_command: String,
    pub worker_container: String,
    pub worker_machine_type: String,
    pub worker_command: String,
    pub worker_count: u64,
    pub state: i64,
}

#[derive(Deserialize)]
struct ClusterFilter {
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: Option<usize>,
    #[serde(rename = "where", default)]
    predicate: Option<ClusterPredicate>,
}

#[derive(Deserialize)]
struct ClusterPredicate {
    #[serde(rename = "isPrivate")]
    is_private: Option<bool>,
}

pub struct AppState {
    api_key: String,
    clusters: Vec<Cluster>,
    jobs: RwLock<Vec<Job>>,
}

pub type Db = Arc<AppState>;

/// Clusters every fresh server starts with. The last one is public and is
/// hidden from `getClusters` when filtering on `isPrivate`.
pub fn seed_clusters() -> Vec<Cluster> {
    vec![
        Cluster {
            id: "clmtkpnm2".to_string(),
            name: "prod-east".to_string(),
            cluster_type: "Job Cluster".to_string(),
            is_private: true,
        },
        Cluster {
            id: "cl2ve1lyz".to_string(),
            name: "gpu-pool".to_string(),
            cluster_type: "Kubernetes Processing Site".to_string(),
            is_private: true,
        },
        Cluster {
            id: "clpublic1".to_string(),
            name: "shared".to_string(),
            cluster_type: "Job Cluster".to_string(),
            is_private: false,
        },
    ]
}

pub fn app() -> Router {
    app_with_key(DEFAULT_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let db: Db = Arc::new(AppState {
        api_key: api_key.to_string(),
        clusters: seed_clusters(),
        jobs: RwLock::new(Vec::new()),
    });
    Router::new()
        .route("/clusters/getCluster", get(get_cluster))
        .route("/clusters/getClusters", get(list_clusters))
        .route(
            "/experiments/v1/hyperopt/",
            get(list_jobs).post(create_job),
        )
        .route("/experiments/v1/hyperopt/{id}/", get(get_job))
        .route("/experiments/v1/hyperopt/{id}/start/", put(start_job))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_key(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

fn authorized(db: &AppState, headers: &HeaderMap) -> bool {
    headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == db.api_key)
}

/// The API host answers bad keys with `{status, message}`.
fn api_unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status": 401, "message": "No such API token"})),
    )
        .into_response()
}

/// The experiments host answers bad keys with `{error, details}`.
fn experiments_forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"details": "Incorrect API Key provided", "error": "Forbidden"})),
    )
        .into_response()
}

async fn get_cluster(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&db, &headers) {
        return api_unauthorized();
    }
    let id = params.get("id").map(String::as_str).unwrap_or_default();
    match db.clusters.iter().find(|cluster| cluster.id == id) {
        Some(cluster) => Json(cluster.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": 404, "message": "Cluster not found"})),
        )
            .into_response(),
    }
}

async fn list_clusters(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&db, &headers) {
        return api_unauthorized();
    }
    let filter: ClusterFilter = match params.get("filter") {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(filter) => filter,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Invalid filter", "details": e.to_string()})),
                )
                    .into_response()
            }
        },
        None => ClusterFilter {
            limit: None,
            offset: None,
            predicate: None,
        },
    };

    let is_private = filter.predicate.and_then(|p| p.is_private);
    let clusters: Vec<Cluster> = db
        .clusters
        .iter()
        .filter(|cluster| is_private.map_or(true, |wanted| cluster.is_private == wanted))
        .skip(filter.offset.unwrap_or(0))
        .take(filter.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(clusters).into_response()
}

async fn list_jobs(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&db, &headers) {
        return api_unauthorized();
    }
    let limit = params
        .get("limit")
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(11);
    let jobs = db.jobs.read().await;
    let data: Vec<&Job> = match usize::try_from(limit) {
        Ok(limit) => jobs.iter().take(limit).collect(),
        Err(_) => jobs.iter().collect(),
    };
    Json(json!({
        "data": data,
        "message": "success",
        "meta": {
            "filter": [],
            "limit": limit,
            "offset": 0,
            "totalItems": jobs.len(),
        },
    }))
    .into_response()
}

async fn create_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Map<String, Value>>,
) -> Response {
    if !authorized(&db, &headers) {
        return experiments_forbidden();
    }

    let mut details = Map::new();
    for field in REQUIRED_JOB_FIELDS {
        match input.get(field) {
            None | Some(Value::Null) => {
                details.insert(
                    field.to_string(),
                    json!(["Missing data for required field."]),
                );
            }
            Some(value) if field == "workerCount" && value.as_u64().is_none() => {
                details.insert(field.to_string(), json!(["Not a valid integer."]));
            }
            Some(_) => {}
        }
    }
    if !details.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"details": details, "error": "Experiment data error"})),
        )
            .into_response();
    }

    let text = |field: &str| {
        input
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let handle = format!("es{}", &Uuid::new_v4().simple().to_string()[..12]);
    let job = Job {
        handle: handle.clone(),
        name: text("name"),
        project_handle: text("projectHandle"),
        tuning_command: text("tuningCommand"),
        worker_container: text("workerContainer"),
        worker_machine_type: text("workerMachineType"),
        worker_command: text("workerCommand"),
        worker_count: input
            .get("workerCount")
            .and_then(Value::as_u64)
            .unwrap_or_default(),
        state: STATE_CREATED,
    };
    db.jobs.write().await.push(job);
    (
        StatusCode::CREATED,
        Json(json!({"handle": handle, "message": "success"})),
    )
        .into_response()
}

fn job_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"details": "Hyperparameter tuning job not found", "error": "Not found"})),
    )
        .into_response()
}

async fn get_job(State(db): State<Db>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&db, &headers) {
        return experiments_forbidden();
    }
    let jobs = db.jobs.read().await;
    match jobs.iter().find(|job| job.handle == id) {
        Some(job) => Json(json!({"data": job, "message": "success"})).into_response(),
        None => job_not_found(),
    }
}

async fn start_job(State(db): State<Db>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&db, &headers) {
        return experiments_forbidden();
    }
    let mut jobs = db.jobs.write().await;
    match jobs.iter_mut().find(|job| job.handle == id) {
        Some(job) => {
            job.state = STATE_RUNNING;
            Json(json!({"message": "success"})).into_response()
        }
        None => job_not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_serializes_type_field() {
        let json = serde_json::to_value(&seed_clusters()[0]).unwrap();
        assert_eq!(json["id"], "clmtkpnm2");
        assert_eq!(json["type"], "Job Cluster");
        assert_eq!(json["isPrivate"], true);
    }

    #[test]
    fn job_serializes_camel_case() {
        let job = Job {
            handle: "es1".to_string(),
            name: "n".to_string(),
            project_handle: "pr1".to_string(),
            tuning_command: "t".to_string(),
            worker_container: "c".to_string(),
            worker_machine_type: "k80".to_string(),
            worker_command: "w".to_string(),
            worker_count: 2,
            state: STATE_CREATED,
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["projectHandle"], "pr1");
        assert_eq!(json["workerMachineType"], "k80");
        assert_eq!(json["workerCount"], 2);
    }

    #[test]
    fn cluster_filter_parses_wire_format() {
        let filter: ClusterFilter =
            serde_json::from_str(r#"{"limit":20,"offset":0,"where":{"isPrivate":true}}"#).unwrap();
        assert_eq!(filter.limit, Some(20));
        assert_eq!(filter.predicate.and_then(|p| p.is_private), Some(true));
    }

    #[test]
    fn seed_has_one_public_cluster() {
        let public = seed_clusters().iter().filter(|c| !c.is_private).count();
        assert_eq!(public, 1);
    }
}
