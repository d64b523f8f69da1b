//! Typed Rust client for the CallFire REST text API.
//!
//! The crate is split into a domain layer of strong types, a transport layer for the
//! wire format (form fields, query strings, XML replies), and a small client layer
//! orchestrating requests. [`CallFireClient::send_and_lookup`] posts a text broadcast,
//! reads the broadcast id from the reply and fetches one status snapshot for it.
//!
//! ```rust,no_run
//! use callfire_text::{CallFireClient, Config, MessageText, RawPhoneNumber, SendOptions, SendText};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), callfire_text::CallFireError> {
//!     let client = CallFireClient::from_config(&Config::from_env()?)?;
//!     let request = SendText::to_many(
//!         vec![RawPhoneNumber::new("12132212227")?, RawPhoneNumber::new("12132212228")?],
//!         MessageText::new("This is a test message")?,
//!         SendOptions::default(),
//!     )?;
//!     let broadcast = client.send_and_lookup(request).await?;
//!     println!("{}", broadcast.status);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
mod transport;
pub mod xml;

pub use client::{Auth, CallFireClient, CallFireClientBuilder, CallFireError};
pub use config::{Config, ConfigError};
pub use domain::{
    Broadcast, BroadcastId, MessageText, Password, PhoneNumber, RawPhoneNumber, SendOptions,
    SendText, SenderId, StatusResult, TextStatus, Username, ValidationError,
};
