//! Core types for payfold.
//!
//! This crate provides the foundational types shared by the payfold crates:
//!
//! - **Events**: [`Event`], the provider-issued record delivered to webhooks
//! - **Configuration**: [`Config`], explicit per-instance provider settings
//!
//! Payfold is a typed convenience layer over the Stripe API. Nothing in this
//! crate performs I/O; the webhook dispatcher lives in `payfold-webhook` and
//! the API client in `payfold-client`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod event;

pub use config::Config;
pub use error::ConfigError;
pub use event::{Event, EventData};
