//! End-to-end test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP using ureq. Validates that request building,
//! response parsing and rendering agree with the server's wire format.

use gradient_core::{
    present, ApiConfig, ApiError, CreateHyperparameter, GradientClient, HttpMethod, HttpRequest,
    HttpResponse, ListFilter,
};

const API_KEY: &str = "integration-key";

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => {
            let mut builder = agent.get(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            for (key, value) in req.query() {
                builder = builder.query(key, value);
            }
            builder.call()
        }
        HttpMethod::Post | HttpMethod::Put => {
            let mut builder = if req.method == HttpMethod::Post {
                agent.post(&req.url)
            } else {
                agent.put(&req.url)
            };
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            match req.body() {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    HttpResponse::new(status, body)
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_key(listener, API_KEY).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn sample_job() -> CreateHyperparameter {
    CreateHyperparameter {
        name: "some_name".to_string(),
        project_id: "pr4yxj956".to_string(),
        tuning_command: "some command".to_string(),
        worker_container: "some_container".to_string(),
        worker_machine_type: "k80".to_string(),
        worker_command: "some worker command".to_string(),
        worker_count: 1,
        ..Default::default()
    }
}

#[test]
fn hyperparameter_lifecycle() {
    let base = start_server();
    let client = GradientClient::new(
        ApiConfig::new(&base, &format!("{base}/experiments/v1")),
        API_KEY,
    );

    // Step 1: list, nothing there yet.
    let page = client
        .parse_list_hyperparameters(execute(client.build_list_hyperparameters()))
        .unwrap();
    assert_eq!(present::hyperparameter_list(&page), "No data found\n");

    // Step 2: create.
    let req = client.build_create_hyperparameter(&sample_job()).unwrap();
    let created = client.parse_create_hyperparameter(execute(req)).unwrap();
    assert!(created.handle.starts_with("es"));
    assert_eq!(
        present::created_hyperparameter(&created),
        format!("Hyperparameter created with ID: {}\n", created.handle)
    );

    // Step 3: list shows the new job.
    let page = client
        .parse_list_hyperparameters(execute(client.build_list_hyperparameters()))
        .unwrap();
    assert_eq!(page.items.len(), 1);
    let table = present::hyperparameter_list(&page);
    assert!(table.contains("| Name      | ID             | Project ID |"));
    assert!(table.contains(&created.handle));

    // Step 4: start, then details reflect the running state.
    let req = client.build_start_hyperparameter(&created.handle);
    client.parse_start_hyperparameter(execute(req)).unwrap();

    let req = client.build_get_hyperparameter(&created.handle);
    let job = client.parse_get_hyperparameter(execute(req)).unwrap();
    assert_eq!(job.handle, created.handle);
    assert_eq!(job.worker_count, Some(1));
    assert_eq!(job.state, Some(2));

    // Step 5: details for an unknown job.
    let req = client.build_get_hyperparameter("esmissing");
    let err = client.parse_get_hyperparameter(execute(req)).unwrap_err();
    assert_eq!(
        present::error(&err),
        "Not found\nHyperparameter tuning job not found\n"
    );
}

#[test]
fn wrong_api_key_override() {
    let base = start_server();
    let client = GradientClient::new(
        ApiConfig::new(&base, &format!("{base}/experiments/v1")),
        API_KEY,
    );
    let wrong = client.with_api_key(Some("some_key"));

    let req = wrong.build_create_hyperparameter(&sample_job()).unwrap();
    let err = wrong.parse_create_hyperparameter(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 403, .. }));
    assert_eq!(present::error(&err), "Forbidden\nIncorrect API Key provided\n");

    let err = wrong
        .parse_list_hyperparameters(execute(wrong.build_list_hyperparameters()))
        .unwrap_err();
    assert_eq!(present::error(&err), "No such API token\n");

    // The base client still authenticates.
    assert!(client
        .parse_list_hyperparameters(execute(client.build_list_hyperparameters()))
        .is_ok());
}

#[test]
fn clusters_round_trip() {
    let base = start_server();
    let client = GradientClient::new(
        ApiConfig::new(&base, &format!("{base}/experiments/v1")),
        API_KEY,
    );

    let req = client.build_list_clusters(&ListFilter::private(20, 0)).unwrap();
    let page = client.parse_list_clusters(execute(req)).unwrap();
    let ids: Vec<&str> = page.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["clmtkpnm2", "cl2ve1lyz"]);

    let req = client.build_list_clusters(&ListFilter::private(20, 10)).unwrap();
    let page = client.parse_list_clusters(execute(req)).unwrap();
    assert_eq!(present::cluster_list(&page), "No data found\n");

    let cluster = client
        .parse_get_cluster(execute(client.build_get_cluster("cl2ve1lyz")))
        .unwrap();
    assert_eq!(cluster.name, "gpu-pool");

    let err = client
        .parse_get_cluster(execute(client.build_get_cluster("missing")))
        .unwrap_err();
    assert_eq!(present::error(&err), "Cluster not found\n");
}
