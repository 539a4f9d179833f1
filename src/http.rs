//! Transport primitives for platform calls.
//!
//! A thin reqwest wrapper that owns the base endpoint, the fixed network
//! timeout, and optional proxying, plus the response envelope pairing every
//! typed payload with the platform's in-band error status. The platform
//! reports most failures inside a successful HTTP exchange, so decoding and
//! classification are separate steps applied uniformly to every response.

// std
use std::time::Duration as StdDuration;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::Config,
	error::{ConfigError, TransportError, check_remote_code},
};

/// Fixed upper bound applied to every outbound platform call.
pub const NETWORK_TIMEOUT: StdDuration = StdDuration::from_secs(30);

const DEFAULT_ENDPOINT: &str = "https://api.weixin.qq.com";

/// Platform response status embedded alongside every payload.
///
/// Absent fields default to the success values so payload-only responses
/// classify cleanly.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RemoteStatus {
	/// Numeric platform error code; zero means success.
	#[serde(default)]
	pub errcode: i64,
	/// Platform error message accompanying a non-zero code.
	#[serde(default)]
	pub errmsg: String,
}
impl RemoteStatus {
	/// Runs the error classification table over this status.
	pub fn check(&self) -> Result<()> {
		check_remote_code(self.errcode, &self.errmsg)
	}
}

/// Response wrapper pairing a typed payload with the platform status fields.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
	#[serde(flatten)]
	status: RemoteStatus,
	#[serde(flatten)]
	payload: T,
}
impl<T> Envelope<T> {
	/// Classifies the status and releases the payload on success.
	pub(crate) fn into_payload(self) -> Result<T> {
		self.status.check()?;

		Ok(self.payload)
	}
}

/// HTTP client wrapper owning the base endpoint and shared transport policy.
#[derive(Clone, Debug)]
pub struct HttpClient {
	client: ReqwestClient,
	base: Url,
}
impl HttpClient {
	/// Builds the transport from the provided configuration.
	pub fn new(config: &Config) -> Result<Self, ConfigError> {
		let base = match &config.endpoint {
			Some(endpoint) => endpoint.clone(),
			None => Url::parse(DEFAULT_ENDPOINT)
				.map_err(|_| ConfigError::InvalidEndpoint { path: DEFAULT_ENDPOINT.into() })?,
		};
		let mut builder = ReqwestClient::builder().timeout(NETWORK_TIMEOUT);

		if let Some(proxy) = &config.proxy {
			let proxy = reqwest::Proxy::all(proxy.clone())
				.map_err(|e| ConfigError::InvalidProxy { message: e.without_url().to_string() })?;

			builder = builder.proxy(proxy);
		}

		let client = builder
			.build()
			.map_err(|e| ConfigError::HttpClientBuild { message: e.without_url().to_string() })?;

		Ok(Self { client, base })
	}

	/// Issues a GET request and decodes the enveloped payload.
	pub(crate) async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let (status, body) = self.send(self.client.get(self.join(path)?).query(query)).await?;

		decode_envelope(status, &body)
	}

	/// Issues a POST request with a JSON body and decodes the enveloped payload.
	pub(crate) async fn post<T, B>(&self, path: &str, query: &[(&str, &str)], body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: Serialize + ?Sized,
	{
		let (status, bytes) =
			self.send(self.client.post(self.join(path)?).query(query).json(body)).await?;

		decode_envelope(status, &bytes)
	}

	/// Issues a POST request whose response carries only the platform status.
	pub(crate) async fn post_unit<B>(
		&self,
		path: &str,
		query: &[(&str, &str)],
		body: &B,
	) -> Result<()>
	where
		B: Serialize + ?Sized,
	{
		let (status, bytes) =
			self.send(self.client.post(self.join(path)?).query(query).json(body)).await?;

		guard_status(status, &bytes)?;

		decode_json::<RemoteStatus>(status, &bytes)?.check()
	}

	/// Issues a POST request and returns the raw success body.
	///
	/// Used by endpoints that answer with binary content; non-success statuses
	/// are still classified through the platform status shape.
	pub(crate) async fn post_raw<B>(
		&self,
		path: &str,
		query: &[(&str, &str)],
		body: &B,
	) -> Result<Vec<u8>>
	where
		B: Serialize + ?Sized,
	{
		let (status, bytes) =
			self.send(self.client.post(self.join(path)?).query(query).json(body)).await?;

		if status == 200 {
			return Ok(bytes);
		}

		decode_json::<RemoteStatus>(status, &bytes)?.check()?;

		Err(TransportError::UnexpectedStatus { status }.into())
	}

	fn join(&self, path: &str) -> Result<Url, ConfigError> {
		self.base.join(path).map_err(|_| ConfigError::InvalidEndpoint { path: path.into() })
	}

	async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, Vec<u8>)> {
		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let bytes = response.bytes().await.map_err(TransportError::from)?;

		Ok((status, bytes.to_vec()))
	}
}

fn guard_status(status: u16, body: &[u8]) -> Result<()> {
	if (400..600).contains(&status) {
		decode_json::<RemoteStatus>(status, body)?.check()?;

		return Err(TransportError::UnexpectedStatus { status }.into());
	}
	if !(200..300).contains(&status) {
		return Err(TransportError::UnexpectedStatus { status }.into());
	}

	Ok(())
}

fn decode_envelope<T>(status: u16, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	guard_status(status, body)?;

	decode_json::<Envelope<T>>(status, body)?.into_payload()
}

fn decode_json<T>(status: u16, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| TransportError::Decode { message: e.to_string(), status }.into())
}
