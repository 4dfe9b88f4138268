#![allow(clippy::unwrap_used)]
// Controller/camera behavior against a mock hub and a wiremock NVR.

use std::collections::{HashMap, HashSet};

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use protect_api::TransportConfig;
use protect_core::address::stable_address;
use protect_core::controller::CONTROLLER_ADDRESS;
use protect_core::{ControllerNode, CoreError, HubEvent, HubLink, NodeCommand, NodeDef, NodeKind};

// ── Mock hub ────────────────────────────────────────────────────────

/// In-memory hub: records registrations, driver reports, and command
/// pulses for assertions.
#[derive(Debug, Default)]
struct MockHub {
    addresses: HashSet<String>,
    nodes: Vec<NodeDef>,
    drivers: Vec<(String, String, i64)>,
    commands: Vec<(String, String)>,
}

impl MockHub {
    fn driver_values(&self, address: &str, driver: &str) -> Vec<i64> {
        self.drivers
            .iter()
            .filter(|(a, d, _)| a == address && d == driver)
            .map(|(_, _, v)| *v)
            .collect()
    }
}

impl HubLink for MockHub {
    fn has_node(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    fn add_node(&mut self, node: NodeDef) {
        if self.addresses.insert(node.address.clone()) {
            self.nodes.push(node);
        }
    }

    fn set_driver(&mut self, address: &str, driver: &str, value: i64) {
        self.drivers.push((address.to_owned(), driver.to_owned(), value));
    }

    fn report_command(&mut self, address: &str, command: &str) {
        self.commands.push((address.to_owned(), command.to_owned()));
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn hub_params(server: &MockServer) -> HashMap<String, String> {
    let uri: url::Url = server.uri().parse().unwrap();
    HashMap::from([
        ("unifi_host".to_owned(), format!("http://{}", uri.host_str().unwrap())),
        ("unifi_port".to_owned(), uri.port().unwrap().to_string()),
        ("unifi_userid".to_owned(), "admin".to_owned()),
        ("unifi_password".to_owned(), "secret".to_owned()),
    ])
}

/// Root probe (CloudKey flavor) and login endpoint.
async fn mount_auth(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).insert_header("authorization", "token-123"))
        .mount(server)
        .await;
}

async fn mount_bootstrap(server: &MockServer, cameras: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/bootstrap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cameras": cameras })))
        .mount(server)
        .await;
}

fn controller() -> ControllerNode {
    ControllerNode::new(TransportConfig::default())
}

// ── Configuration gating ────────────────────────────────────────────

#[tokio::test]
async fn missing_credentials_make_no_nvr_calls() {
    let server = MockServer::start().await;
    let mut hub = MockHub::default();
    let mut ctrl = controller();

    let mut params = hub_params(&server);
    params.remove("unifi_password");

    let result = ctrl.configure(&params, &mut hub).await;

    assert!(matches!(result, Err(CoreError::Config { .. })));
    assert!(ctrl.cameras().is_empty());
    assert!(
        server.received_requests().await.unwrap().is_empty(),
        "configuration failure must not touch the NVR"
    );
}

#[tokio::test]
async fn valid_configuration_triggers_discovery() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_bootstrap(
        &server,
        json!([{ "id": "cam-1", "name": "Front_Door",
                 "recordingSettings": { "mode": "always" } }]),
    )
    .await;

    let mut hub = MockHub::default();
    let mut ctrl = controller();
    ctrl.start(&mut hub);

    ctrl.configure(&hub_params(&server), &mut hub).await.unwrap();

    let bootstrap_fetches = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/bootstrap")
        .count();
    assert_eq!(bootstrap_fetches, 1, "configuration runs discovery exactly once");

    assert_eq!(ctrl.cameras().len(), 1);
    assert_eq!(ctrl.cameras()[0].camera_id(), "cam-1");
    assert_eq!(ctrl.cameras()[0].name(), "FrontDoor");
    assert_eq!(ctrl.cameras()[0].address(), stable_address("Front_Door"));

    let camera_node = hub
        .nodes
        .iter()
        .find(|n| n.kind == NodeKind::Camera)
        .expect("camera node registered");
    assert_eq!(camera_node.name, "FrontDoor");
}

// ── Discovery ───────────────────────────────────────────────────────

#[tokio::test]
async fn discovery_is_idempotent() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_bootstrap(
        &server,
        json!([{ "id": "cam-1", "name": "Front_Door",
                 "recordingSettings": { "mode": "motion" } }]),
    )
    .await;

    let mut hub = MockHub::default();
    let mut ctrl = controller();
    ctrl.configure(&hub_params(&server), &mut hub).await.unwrap();
    ctrl.discover(&mut hub).await.unwrap();

    assert_eq!(ctrl.cameras().len(), 1, "re-discovery must not duplicate units");
    let camera_nodes = hub.nodes.iter().filter(|n| n.kind == NodeKind::Camera).count();
    assert_eq!(camera_nodes, 1);
}

#[tokio::test]
async fn empty_camera_set_is_not_an_error() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_bootstrap(&server, json!([])).await;

    let mut hub = MockHub::default();
    let mut ctrl = controller();

    ctrl.configure(&hub_params(&server), &mut hub).await.unwrap();

    assert!(ctrl.cameras().is_empty());
}

#[tokio::test]
async fn discover_without_configuration_is_rejected() {
    let mut hub = MockHub::default();
    let mut ctrl = controller();

    let result = ctrl.discover(&mut hub).await;

    assert!(matches!(result, Err(CoreError::NotConfigured)));
}

// ── Query ───────────────────────────────────────────────────────────

#[tokio::test]
async fn query_reports_recording_ordinal() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_bootstrap(
        &server,
        json!([{ "id": "cam-1", "name": "Front_Door",
                 "recordingSettings": { "mode": "always" } }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/cameras/cam-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cam-1",
            "name": "Front_Door",
            "recordingSettings": { "mode": "always" }
        })))
        .mount(&server)
        .await;

    let mut hub = MockHub::default();
    let mut ctrl = controller();
    ctrl.configure(&hub_params(&server), &mut hub).await.unwrap();

    ctrl.query(&mut hub).await;

    let address = stable_address("Front_Door");
    assert_eq!(hub.driver_values(&address, "GV2"), vec![3]);
    assert_eq!(ctrl.cameras()[0].reported_mode(), Some(3));
}

#[tokio::test]
async fn failed_query_leaves_reported_value_unchanged() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_bootstrap(
        &server,
        json!([{ "id": "cam-1", "name": "Garage",
                 "recordingSettings": { "mode": "motion" } }]),
    )
    .await;
    // First fetch succeeds; after that the camera disappears from the NVR.
    Mock::given(method("GET"))
        .and(path("/api/cameras/cam-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cam-1",
            "name": "Garage",
            "recordingSettings": { "mode": "motion" }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let mut hub = MockHub::default();
    let mut ctrl = controller();
    ctrl.configure(&hub_params(&server), &mut hub).await.unwrap();

    ctrl.query(&mut hub).await;
    assert_eq!(ctrl.cameras()[0].reported_mode(), Some(2));

    // Second query hits a 404; the stale value must survive.
    ctrl.query(&mut hub).await;
    assert_eq!(ctrl.cameras()[0].reported_mode(), Some(2));

    let address = stable_address("Garage");
    assert_eq!(hub.driver_values(&address, "GV2"), vec![2]);
}

// ── Polling ─────────────────────────────────────────────────────────

#[tokio::test]
async fn short_poll_reports_liveness() {
    let mut hub = MockHub::default();
    let mut ctrl = controller();
    ctrl.start(&mut hub);

    ctrl.short_poll(&mut hub).await;

    assert_eq!(hub.driver_values(CONTROLLER_ADDRESS, "ST"), vec![0, 1]);
}

#[tokio::test]
async fn long_poll_alternates_heartbeat() {
    let mut hub = MockHub::default();
    let mut ctrl = controller();

    ctrl.long_poll(&mut hub);
    ctrl.long_poll(&mut hub);
    ctrl.long_poll(&mut hub);

    let pulses: Vec<&str> = hub.commands.iter().map(|(_, c)| c.as_str()).collect();
    assert_eq!(pulses, vec!["DON", "DOF", "DON"]);
    assert!(hub.commands.iter().all(|(a, _)| a == CONTROLLER_ADDRESS));
}

// ── Command dispatch ────────────────────────────────────────────────

#[tokio::test]
async fn set_recording_issues_mode_and_light_calls() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_bootstrap(
        &server,
        json!([{ "id": "cam-1", "name": "Front_Door",
                 "recordingSettings": { "mode": "always" } }]),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/api/cameras/cam-1"))
        .and(body_json(json!({ "recordingSettings": { "mode": "never" } })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/cameras/cam-1"))
        .and(body_json(json!({ "ledSettings": { "isEnabled": false, "blinkRate": 0 } })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut hub = MockHub::default();
    let mut ctrl = controller();
    ctrl.configure(&hub_params(&server), &mut hub).await.unwrap();

    let event = HubEvent::Command {
        address: stable_address("Front_Door"),
        command: NodeCommand::SetRecording { value: "1".into() },
    };
    ctrl.handle(event, &mut hub).await.unwrap();

    server.verify().await;
}

#[tokio::test]
async fn unmapped_selector_is_a_validation_error() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_bootstrap(
        &server,
        json!([{ "id": "cam-1", "name": "Front_Door",
                 "recordingSettings": { "mode": "always" } }]),
    )
    .await;

    let mut hub = MockHub::default();
    let mut ctrl = controller();
    ctrl.configure(&hub_params(&server), &mut hub).await.unwrap();
    let before = server.received_requests().await.unwrap().len();

    let event = HubEvent::Command {
        address: stable_address("Front_Door"),
        command: NodeCommand::SetRecording { value: "7".into() },
    };
    let result = ctrl.handle(event, &mut hub).await;

    assert!(matches!(result, Err(CoreError::UnknownSelector { .. })));
    assert_eq!(
        server.received_requests().await.unwrap().len(),
        before,
        "rejected selector must not reach the NVR"
    );
}

#[tokio::test]
async fn command_to_unknown_address_is_rejected() {
    let mut hub = MockHub::default();
    let mut ctrl = controller();

    let event = HubEvent::Command {
        address: "12345678".into(),
        command: NodeCommand::Query,
    };
    let result = ctrl.handle(event, &mut hub).await;

    assert!(matches!(result, Err(CoreError::NodeNotFound { .. })));
}

// ── End-to-end scenario ─────────────────────────────────────────────

#[tokio::test]
async fn end_to_end_discover_then_query() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_bootstrap(
        &server,
        json!([{ "id": "cam-1", "name": "Front_Door",
                 "recordingSettings": { "mode": "always" } }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/cameras/cam-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cam-1",
            "name": "Front_Door",
            "recordingSettings": { "mode": "always" }
        })))
        .mount(&server)
        .await;

    let mut hub = MockHub::default();
    let mut ctrl = controller();
    ctrl.start(&mut hub);

    ctrl.handle(HubEvent::Config { params: hub_params(&server) }, &mut hub)
        .await
        .unwrap();
    ctrl.handle(
        HubEvent::Command {
            address: CONTROLLER_ADDRESS.into(),
            command: NodeCommand::Query,
        },
        &mut hub,
    )
    .await
    .unwrap();

    assert_eq!(ctrl.cameras().len(), 1);
    assert_eq!(ctrl.cameras()[0].reported_mode(), Some(3));
}
