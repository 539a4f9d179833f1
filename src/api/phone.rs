//! User phone number retrieval.

// crates.io
use serde_json::json;
// self
use crate::{_prelude::*, call::CallOptions, client::Client};

/// Response payload carrying the resolved phone information.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserPhoneNumber {
	/// Phone information block.
	pub phone_info: PhoneInfo,
}

/// Phone numbers attached to a user account.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhoneInfo {
	/// Phone number including the country code.
	pub phone_number: String,
	/// Phone number without the country code.
	pub pure_phone_number: String,
	/// Country code of the number.
	pub country_code: String,
	/// Origin watermark stamped by the platform.
	pub watermark: Watermark,
}

/// Origin watermark stamped on user-data payloads.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Watermark {
	/// Unix timestamp the payload was produced at.
	pub timestamp: i64,
	/// Application the payload belongs to.
	pub appid: String,
}

impl Client {
	/// Resolves a phone-number authorization code into the user's numbers.
	pub async fn user_phone_number(
		&self,
		code: &str,
		options: CallOptions,
	) -> Result<UserPhoneNumber> {
		let body = json!({ "code": code });
		let body = &body;

		self.with_access_token(options, |token| async move {
			self.http
				.post(
					"/wxa/business/getuserphonenumber",
					&[("access_token", token.as_str())],
					body,
				)
				.await
		})
		.await
	}
}
