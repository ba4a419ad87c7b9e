//! Behaviour tests for the recipient lifecycle against a stub API.
//!
//! Each scenario starts a wiremock server, points a key-pair configuration
//! at it, and drives the recipients gateway synchronously through a Tokio
//! runtime held in the world.
#![expect(clippy::expect_used, reason = "tests assert on fixture setup")]

use std::sync::Arc;

use paymentrails::{
    Config, ConfigurationError, Environment, FailureCategory, Gateway, GatewayError, Recipient,
    RecipientAttributes, RecipientGateway, RecipientId, ReqwestTransport,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::json;
use tokio::runtime::Runtime;
use url::Url;
use wiremock::matchers::{header_exists, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Clone)]
struct ServerHandle(Arc<MockServer>);

#[derive(Default, ScenarioState)]
struct RecipientLifecycleWorld {
    runtime: Slot<RuntimeHandle>,
    server: Slot<ServerHandle>,
    config: Slot<Config>,
    recipient_result: Slot<Result<Recipient, GatewayError>>,
    delete_result: Slot<Result<bool, GatewayError>>,
    construction_error: Slot<GatewayError>,
}

impl RecipientLifecycleWorld {
    fn start_server(&self) {
        let runtime = Runtime::new().expect("create runtime");
        let server = runtime.block_on(MockServer::start());
        self.runtime.set(RuntimeHandle(Arc::new(runtime)));
        self.server.set(ServerHandle(Arc::new(server)));
    }

    fn mount(&self, mock: Mock) {
        let server = self.server.get().expect("server");
        self.block_on(mock.mount(&server.0));
    }

    fn base_url(&self) -> Url {
        let server = self.server.get().expect("server");
        Url::parse(&server.0.uri()).expect("server uri")
    }

    fn use_key_pair(&self) {
        self.config.set(
            Config::new(Environment::Development)
                .with_key_pair("pk_test", "sk_test_secret")
                .with_api_base(self.base_url()),
        );
    }

    fn gateway(&self) -> Result<RecipientGateway<ReqwestTransport>, GatewayError> {
        let config = self.config.get().expect("config");
        Gateway::new(config).recipient()
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        let runtime = self.runtime.get().expect("runtime");
        runtime.0.block_on(future)
    }

    fn received_request_count(&self) -> usize {
        let server = self.server.get().expect("server");
        self.block_on(server.0.received_requests())
            .map_or(0, |requests| requests.len())
    }
}

fn recipient_id(raw: &str) -> RecipientId {
    RecipientId::new(raw).expect("valid id")
}

#[fixture]
fn world() -> RecipientLifecycleWorld {
    RecipientLifecycleWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("a Payment Rails API that stores new recipients as {id}")]
fn an_api_that_stores_new_recipients(world: &RecipientLifecycleWorld, id: String) {
    world.start_server();
    world.mount(
        Mock::given(method("POST"))
            .and(path("/v1/recipients"))
            .and(header_exists("x-pr-timestamp"))
            .and(header_regex("authorization", "^prsign pk_test:[0-9a-f]{64}$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "recipient": {"id": id, "email": "tom.jones@example.com", "status": "incomplete"}
            }))),
    );
    world.use_key_pair();
}

#[given("a Payment Rails API that has no recipient {id}")]
fn an_api_without_the_recipient(world: &RecipientLifecycleWorld, id: String) {
    world.start_server();
    world.mount(
        Mock::given(method("GET"))
            .and(path(format!("/v1/recipients/{id}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "ok": false,
                "errors": [{"code": "not_found", "message": "Object not found"}]
            }))),
    );
    world.use_key_pair();
}

#[given("a Payment Rails API that deletes recipient {id}")]
fn an_api_that_deletes_the_recipient(world: &RecipientLifecycleWorld, id: String) {
    world.start_server();
    world.mount(
        Mock::given(method("DELETE"))
            .and(path(format!("/v1/recipients/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true}))),
    );
    world.use_key_pair();
}

#[given("a client configuration without credentials")]
fn a_configuration_without_credentials(world: &RecipientLifecycleWorld) {
    world.start_server();
    world
        .config
        .set(Config::new(Environment::Development).with_api_base(world.base_url()));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("a recipient is created with email {email}")]
fn a_recipient_is_created(world: &RecipientLifecycleWorld, email: String) {
    let attributes = RecipientAttributes::new().with_email(email);
    let gateway = world.gateway().expect("gateway builds");
    let result = world.block_on(gateway.create(&attributes));
    world.recipient_result.set(result);
}

#[when("recipient {id} is fetched")]
fn a_recipient_is_fetched(world: &RecipientLifecycleWorld, id: String) {
    let id = recipient_id(&id);
    let gateway = world.gateway().expect("gateway builds");
    let result = world.block_on(gateway.find(&id));
    world.recipient_result.set(result);
}

#[when("recipient {id} is deleted")]
fn a_recipient_is_deleted(world: &RecipientLifecycleWorld, id: String) {
    let id = recipient_id(&id);
    let gateway = world.gateway().expect("gateway builds");
    let result = world.block_on(gateway.delete(&id));
    world.delete_result.set(result);
}

#[when("the recipient gateway is built")]
fn the_recipient_gateway_is_built(world: &RecipientLifecycleWorld) {
    if let Err(error) = world.gateway() {
        world.construction_error.set(error);
    }
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the returned recipient has id {id}")]
fn the_returned_recipient_has_id(world: &RecipientLifecycleWorld, id: String) {
    let recipient = world
        .recipient_result
        .get()
        .expect("recipient result should be set")
        .expect("recipient call should succeed");
    assert_eq!(recipient.id().map(RecipientId::as_str), Some(id.as_str()));
    assert_eq!(recipient.email(), Some("tom.jones@example.com"));
}

#[then("the request was signed with the public key {public_key}")]
fn the_request_was_signed(world: &RecipientLifecycleWorld, public_key: String) {
    let server = world.server.get().expect("server");
    let requests = world
        .block_on(server.0.received_requests())
        .expect("request recording enabled");
    let authorization = requests
        .first()
        .and_then(|request| request.headers.get("authorization"))
        .and_then(|value| value.to_str().ok())
        .expect("authorization header");
    assert!(authorization.starts_with(&format!("prsign {public_key}:")));
}

#[then("the call fails as a service failure categorised {category}")]
fn the_call_fails_as_service_failure(world: &RecipientLifecycleWorld, category: String) {
    let error = world
        .recipient_result
        .get()
        .expect("recipient result should be set")
        .expect_err("recipient call should fail");
    assert!(error.is_service_unavailable());
    assert_eq!(
        error.category().map(FailureCategory::as_str),
        Some(category.as_str())
    );
}

#[then("the deletion is confirmed")]
fn the_deletion_is_confirmed(world: &RecipientLifecycleWorld) {
    let deleted = world
        .delete_result
        .get()
        .expect("delete result should be set")
        .expect("delete should succeed");
    assert!(deleted);
}

#[then("construction fails with missing credentials")]
fn construction_fails_with_missing_credentials(world: &RecipientLifecycleWorld) {
    let error = world
        .construction_error
        .get()
        .expect("construction should fail");
    assert_eq!(
        error,
        GatewayError::Configuration(ConfigurationError::MissingCredentials)
    );
}

#[then("no request reached the API")]
fn no_request_reached_the_api(world: &RecipientLifecycleWorld) {
    assert_eq!(world.received_request_count(), 0);
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/recipient_lifecycle.feature",
    name = "Creating a recipient returns the stored record"
)]
fn creating_a_recipient(world: RecipientLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recipient_lifecycle.feature",
    name = "Finding an unknown recipient reports a service failure"
)]
fn finding_an_unknown_recipient(world: RecipientLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recipient_lifecycle.feature",
    name = "Deleting a recipient confirms removal"
)]
fn deleting_a_recipient(world: RecipientLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recipient_lifecycle.feature",
    name = "Missing credentials stop the gateway before any request"
)]
fn missing_credentials_stop_the_gateway(world: RecipientLifecycleWorld) {
    let _ = world;
}
