//! Unlimited-scene QR code generation.

// self
use crate::{_prelude::*, call::CallOptions, client::Client};

/// Parameters for an unlimited-scene QR code.
///
/// Optional fields are omitted from the payload so the platform applies its
/// documented defaults.
#[derive(Clone, Debug, Default, Serialize)]
pub struct QrCodeRequest {
	/// Scene payload delivered to the opened page; at most 32 visible characters.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scene: Option<String>,
	/// Target page path; the platform opens the home page when omitted.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<String>,
	/// Verifies that `page` exists in the released program.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub check_path: Option<bool>,
	/// Program version the code opens: release, trial, or develop.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub env_version: Option<String>,
	/// Width of the generated image in pixels (280-1280).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub width: Option<u32>,
	/// Lets the platform pick the line color automatically.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub auto_color: Option<bool>,
	/// Explicit RGB line color, effective when `auto_color` is off.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub line_color: Option<String>,
	/// Renders the code on a transparent background.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_hyaline: Option<bool>,
}

impl Client {
	/// Generates an unlimited-scene QR code and returns the raw image bytes.
	pub async fn qr_code(&self, request: &QrCodeRequest, options: CallOptions) -> Result<Vec<u8>> {
		self.with_access_token(options, |token| async move {
			self.http
				.post_raw("/wxa/getwxacodeunlimit", &[("access_token", token.as_str())], request)
				.await
		})
		.await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn optional_fields_stay_out_of_the_payload() {
		let request = QrCodeRequest { scene: Some("id=42".into()), ..Default::default() };
		let payload = serde_json::to_string(&request)
			.expect("QR code requests should serialize to JSON.");

		assert_eq!(payload, "{\"scene\":\"id=42\"}");
	}

	#[test]
	fn populated_fields_serialize_with_wire_names() {
		let request = QrCodeRequest {
			page: Some("pages/index/index".into()),
			check_path: Some(false),
			width: Some(430),
			..Default::default()
		};
		let payload = serde_json::to_value(&request)
			.expect("QR code requests should serialize to JSON values.");

		assert_eq!(payload["page"], "pages/index/index");
		assert_eq!(payload["check_path"], false);
		assert_eq!(payload["width"], 430);
	}
}
