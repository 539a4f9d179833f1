//! Protected-endpoint collaborators built on the credential lifecycle core.
//!
//! Each endpoint supplies its own payload shapes and borrows a credential
//! through [`Client::with_access_token`](crate::client::Client::with_access_token)
//! when the platform requires one; the executor stays agnostic to the payloads.

pub mod jsconfig;
pub mod message;
pub mod phone;
pub mod qrcode;
pub mod session;

pub use jsconfig::*;
pub use message::*;
pub use phone::*;
pub use qrcode::*;
pub use session::*;
