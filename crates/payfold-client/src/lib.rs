//! Typed Stripe API client for payfold.
//!
//! A deliberately small surface: customer management and event retrieval.
//! Re-fetching a delivered event by ID is the companion to handler-side
//! idempotency; a handler that is unsure whether a delivery was already
//! processed can confirm the event against the API before acting.
//!
//! # Example
//!
//! ```no_run
//! use payfold_client::{CustomerParams, StripeClient};
//! use payfold_core::Config;
//!
//! # async fn example() -> Result<(), payfold_client::ClientError> {
//! let config = Config::new("sk_test_xxx");
//! let client = StripeClient::new(&config)?;
//!
//! let customer = client
//!     .create_customer(CustomerParams {
//!         email: Some("jo@example.com".into()),
//!         name: Some("Jo".into()),
//!         ..CustomerParams::default()
//!     })
//!     .await?;
//!
//! println!("created {}", customer.id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::StripeClient;
pub use error::ClientError;
pub use types::{ApiList, Customer, CustomerParams};
