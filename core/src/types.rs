//! Wire DTOs for the clusters and hyperparameter tuning APIs.
//!
//! # Design
//! Typed structs with serde derives stand in for schema objects. Wire names
//! live in `rename` attributes, so the CLI-option to wire-field mapping is a
//! static table the compiler checks. Unknown response fields are ignored;
//! missing required fields fail deserialization, which the parser reports as
//! a malformed response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A compute cluster as returned by `/clusters/getCluster(s)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cluster_type: String,
}

/// A hyperparameter tuning job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hyperparameter {
    pub handle: String,
    pub name: String,
    pub project_handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_machine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<i64>,
}

/// Request payload for creating a tuning job.
///
/// Field names follow the CLI; the serialized names are what the
/// experiments service expects (`project_id` goes out as `projectHandle`,
/// the server options gain a `hyperparameter` prefix).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateHyperparameter {
    pub name: String,
    #[serde(rename = "projectHandle")]
    pub project_id: String,
    #[serde(rename = "tuningCommand")]
    pub tuning_command: String,
    #[serde(rename = "workerContainer")]
    pub worker_container: String,
    #[serde(rename = "workerMachineType")]
    pub worker_machine_type: String,
    #[serde(rename = "workerCommand")]
    pub worker_command: String,
    #[serde(rename = "workerCount")]
    pub worker_count: u32,
    #[serde(
        rename = "workerContainerUser",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub worker_container_user: Option<String>,
    #[serde(
        rename = "workerRegistryUsername",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub worker_registry_username: Option<String>,
    #[serde(
        rename = "workerRegistryPassword",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub worker_registry_password: Option<String>,
    #[serde(
        rename = "hyperparameterServerRegistryUsername",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub server_registry_username: Option<String>,
    #[serde(
        rename = "hyperparameterServerRegistryPassword",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub server_registry_password: Option<String>,
    #[serde(
        rename = "hyperparameterServerContainerUser",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub server_container_user: Option<String>,
    #[serde(
        rename = "isPreemptible",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_preemptible: Option<bool>,
}

/// Successful create response: `{"handle": "...", "message": "success"}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub handle: String,
}

/// Filter for `/clusters/getClusters`, sent JSON-encoded inside the
/// `filter` query parameter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListFilter {
    pub limit: u32,
    pub offset: u32,
    #[serde(rename = "where")]
    pub predicate: ClusterPredicate,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClusterPredicate {
    #[serde(rename = "isPrivate")]
    pub is_private: bool,
}

impl ListFilter {
    /// Private clusters only, which is all the CLI ever asks for.
    pub fn private(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            predicate: ClusterPredicate { is_private: true },
        }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub total_items: Option<u64>,
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<ListMeta>,
}

impl<T> Page<T> {
    /// True when there is nothing to show: the server reports zero items,
    /// or the page itself is empty.
    pub fn is_empty(&self) -> bool {
        let reported_zero = self
            .meta
            .as_ref()
            .and_then(|meta| meta.total_items)
            .is_some_and(|total| total == 0);
        reported_zero || self.items.is_empty()
    }
}

/// Decode a list body: `{"data": [...], "meta": {...}}` or a bare array.
///
/// The shape is resolved before the items are decoded, so a bad item
/// reports the offending field rather than a generic shape mismatch.
pub(crate) fn decode_page<T: DeserializeOwned>(body: &str) -> serde_json::Result<Page<T>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(mut envelope) if envelope.contains_key("data") => {
            let items = serde_json::from_value(envelope.remove("data").unwrap_or(Value::Null))?;
            let meta = match envelope.remove("meta") {
                None | Some(Value::Null) => None,
                Some(meta) => Some(serde_json::from_value(meta)?),
            };
            Ok(Page { items, meta })
        }
        items @ Value::Array(_) => Ok(Page {
            items: serde_json::from_value(items)?,
            meta: None,
        }),
        _ => Err(serde::de::Error::custom(
            "expected an array or an object with a `data` array",
        )),
    }
}

/// Decode a single-object body, unwrapping `{"data": {...}}` when present.
pub(crate) fn decode_single<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    let inner = match serde_json::from_str::<Value>(body)? {
        Value::Object(mut wrapper) if wrapper.contains_key("data") => {
            wrapper.remove("data").unwrap_or(Value::Null)
        }
        bare => bare,
    };
    serde_json::from_value(inner)
}
