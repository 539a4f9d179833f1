//! Subscribe-message push and the positional template helper.

// crates.io
use serde_json::{Value, json};
// self
use crate::{_prelude::*, call::CallOptions, client::Client};

/// Subscribe-message payload pushed to a single user.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SubscribeMessage {
	/// Template identifier registered on the platform.
	pub template_id: String,
	/// In-program page opened from the message card; no jump when empty.
	pub page: String,
	/// Recipient user identifier.
	#[serde(rename = "touser")]
	pub to_user: String,
	/// Template content keyed by placeholder, each value wrapped as `{"value": ...}`.
	pub data: BTreeMap<String, Value>,
	/// Program version receiving the message; derived from the configured
	/// environment when left empty.
	pub miniprogram_state: String,
	/// Message language tag.
	pub lang: String,
}

/// Registered template described by its placeholder keys in display order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PushTemplate {
	/// Template identifier registered on the platform.
	pub template_id: String,
	/// Ordinal of the template within the application's own bookkeeping.
	#[serde(default)]
	pub template_no: i32,
	/// Placeholder keys in the order values are supplied.
	pub template_keys: Vec<String>,
	/// In-program page opened from the message card.
	#[serde(default)]
	pub page: String,
}

impl Client {
	/// Pushes a subscribe message to its recipient.
	///
	/// When the payload leaves `miniprogram_state` empty, the configured
	/// environment decides which program version receives the message.
	pub async fn send_message(
		&self,
		message: &SubscribeMessage,
		options: CallOptions,
	) -> Result<()> {
		let mut message = message.clone();

		if message.miniprogram_state.is_empty() {
			message.miniprogram_state = self.config.env.miniprogram_state().into();
		}

		let message = &message;

		self.with_access_token(options, |token| async move {
			self.http
				.post_unit(
					"/cgi-bin/message/subscribe/send",
					&[("access_token", token.as_str())],
					message,
				)
				.await
		})
		.await
	}

	/// Pushes a subscribe message by mapping positional values onto the
	/// template's placeholder keys.
	///
	/// Surplus values are ignored and missing values leave their placeholders
	/// out of the payload; the program state is derived from the configured
	/// environment.
	pub async fn send_template_message(
		&self,
		template: &PushTemplate,
		values: &[Value],
		to_user: &str,
	) -> Result<()> {
		let data = template
			.template_keys
			.iter()
			.zip(values)
			.map(|(key, value)| (key.clone(), json!({ "value": value })))
			.collect();
		let message = SubscribeMessage {
			template_id: template.template_id.clone(),
			page: template.page.clone(),
			to_user: to_user.into(),
			data,
			miniprogram_state: String::new(),
			lang: "zh_CN".into(),
		};

		self.send_message(&message, CallOptions::new()).await
	}
}
