// std
use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use httpmock::prelude::*;
// self
use miniapp_broker::{
	call::CallOptions,
	client::Client,
	config::Config,
	error::{Error, StaleCredential},
	store::{CredentialStore, MemoryStore},
	time::Duration,
	url::Url,
};

fn build_client(server: &MockServer) -> (Client, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn CredentialStore> = store_backend.clone();
	let config = Config::new("test-app-id", "test-app-secret").with_endpoint(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse."),
	);
	let client =
		Client::new(config, store).expect("Client should build over the mock endpoint.");

	(client, store_backend)
}

async fn seed_token(store: &MemoryStore, value: &str) {
	store
		.put("AccessToken", value, Duration::minutes(5))
		.await
		.expect("Seeding the memory store should succeed.");
}

async fn mock_issuer<'s>(server: &'s MockServer, token: &str) -> httpmock::Mock<'s> {
	let body = format!("{{\"access_token\":\"{token}\",\"expires_in\":7200}}");

	server
		.mock_async(move |when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn stale_failure_retries_once_with_a_fresh_credential() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let issuer = mock_issuer(&server, "TOK_NEW").await;

	seed_token(&store, "TOK_OLD").await;

	let attempts = AtomicUsize::new(0);
	let seen_tokens = Mutex::new(Vec::new());
	let result = client
		.with_access_token(CallOptions::new(), |token| {
			let attempt = attempts.fetch_add(1, Ordering::SeqCst);

			seen_tokens.lock().expect("Token log mutex should not be poisoned.").push(token);

			async move {
				if attempt == 0 {
					Err(Error::Stale(StaleCredential::Expired))
				} else {
					Ok("payload")
				}
			}
		})
		.await;

	assert_eq!(result, Ok("payload"));
	assert_eq!(attempts.load(Ordering::SeqCst), 2);
	assert_eq!(
		*seen_tokens.lock().expect("Token log mutex should not be poisoned."),
		vec!["TOK_OLD".to_owned(), "TOK_NEW".to_owned()],
	);

	// Exactly one forced reload hit the issuer.
	issuer.assert_calls_async(1).await;
}

#[tokio::test]
async fn stale_failures_never_retry_twice() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let issuer = mock_issuer(&server, "TOK_NEW").await;

	seed_token(&store, "TOK_OLD").await;

	let attempts = AtomicUsize::new(0);
	let result: Result<(), Error> = client
		.with_access_token(CallOptions::new(), |_token| {
			attempts.fetch_add(1, Ordering::SeqCst);

			async { Err(Error::Stale(StaleCredential::Expired)) }
		})
		.await;

	assert_eq!(result, Err(Error::Stale(StaleCredential::Expired)));
	assert_eq!(attempts.load(Ordering::SeqCst), 2);

	issuer.assert_calls_async(1).await;
}

#[tokio::test]
async fn generic_remote_errors_propagate_without_retry() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let issuer = mock_issuer(&server, "TOK_NEW").await;

	seed_token(&store, "TOK_OLD").await;

	let attempts = AtomicUsize::new(0);
	let result: Result<(), Error> = client
		.with_access_token(CallOptions::new(), |_token| {
			attempts.fetch_add(1, Ordering::SeqCst);

			async { Err(Error::Remote { code: 48001, message: "api unauthorized".into() }) }
		})
		.await;

	assert_eq!(result, Err(Error::Remote { code: 48001, message: "api unauthorized".into() }));
	assert_eq!(attempts.load(Ordering::SeqCst), 1);

	issuer.assert_calls_async(0).await;
}

#[tokio::test]
async fn non_retryable_calls_surface_stale_failures_immediately() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let issuer = mock_issuer(&server, "TOK_NEW").await;

	seed_token(&store, "TOK_OLD").await;

	let attempts = AtomicUsize::new(0);
	let result: Result<(), Error> = client
		.with_access_token(CallOptions::new().with_retryable(false), |_token| {
			attempts.fetch_add(1, Ordering::SeqCst);

			async { Err(Error::Stale(StaleCredential::Malformed)) }
		})
		.await;

	assert_eq!(result, Err(Error::Stale(StaleCredential::Malformed)));
	assert_eq!(attempts.load(Ordering::SeqCst), 1);

	issuer.assert_calls_async(0).await;
}

#[tokio::test]
async fn reload_option_forces_a_fresh_credential_upfront() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let issuer = mock_issuer(&server, "TOK_NEW").await;

	seed_token(&store, "TOK_OLD").await;

	let result = client
		.with_access_token(CallOptions::new().with_reload(true), |token| async move { Ok(token) })
		.await;

	assert_eq!(result, Ok("TOK_NEW".to_owned()));

	issuer.assert_calls_async(1).await;
}

#[tokio::test]
async fn credential_fetch_failures_skip_the_task() {
	let server = MockServer::start_async().await;
	let (client, _store) = build_client(&server);
	let issuer = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":40125,\"errmsg\":\"invalid appsecret\"}");
		})
		.await;
	let attempts = AtomicUsize::new(0);
	let result: Result<(), Error> = client
		.with_access_token(CallOptions::new(), |_token| {
			attempts.fetch_add(1, Ordering::SeqCst);

			async { Ok(()) }
		})
		.await;

	assert_eq!(result, Err(Error::Remote { code: 40125, message: "invalid appsecret".into() }));
	assert_eq!(attempts.load(Ordering::SeqCst), 0);

	issuer.assert_calls_async(1).await;
}

#[tokio::test]
async fn end_to_end_stale_response_rebinds_the_call() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let issuer = mock_issuer(&server, "TOK_NEW").await;

	seed_token(&store, "TOK_OLD").await;

	let stale_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/wxa/business/getuserphonenumber")
				.query_param("access_token", "TOK_OLD");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":42001,\"errmsg\":\"access_token expired\"}");
		})
		.await;
	let fresh_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/wxa/business/getuserphonenumber")
				.query_param("access_token", "TOK_NEW");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"phone_info\":{\"phoneNumber\":\"+8613800000000\",\
				 \"purePhoneNumber\":\"13800000000\",\"countryCode\":\"86\",\
				 \"watermark\":{\"timestamp\":1754500000,\"appid\":\"test-app-id\"}}}",
			);
		})
		.await;
	let payload = client
		.user_phone_number("auth-code", CallOptions::new())
		.await
		.expect("The rebound call should succeed with the fresh credential.");

	assert_eq!(payload.phone_info.phone_number, "+8613800000000");

	stale_mock.assert_calls_async(1).await;
	fresh_mock.assert_calls_async(1).await;
	issuer.assert_calls_async(1).await;
}
