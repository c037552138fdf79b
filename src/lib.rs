//! Lead Notification API Library
//!
//! This library provides the core functionality for the loan-lead
//! notification service: validating lead-capture form submissions, rendering
//! the notification message, and delivering it to the configured Telegram
//! recipients with a direct-address transport fallback.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `dispatcher`: The probe / warm-up / fan-out delivery pipeline.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `message`: Notification text rendering and HTML escaping.
//! - `models`: Lead submission payload types and validation.
//! - `telegram`: Telegram Bot API client.
//! - `transport`: Retrying HTTP transport with pluggable resolution.

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod handlers;
pub mod message;
pub mod models;
pub mod telegram;
pub mod transport;
