//! Core reconciliation and classification engine for the Lomarosa
//! reporting suite.
//!
//! This crate is deliberately free of HTTP, spreadsheet, and mail
//! dependencies. Both subsystems (the payment-reminder mailer and the
//! inventory dashboard) are built on top of it; it depends on nothing but
//! chrono, serde, and tracing.
//!
//! The pipeline shape shared by both subsystems is:
//! Loader → Normalizer → Joiner → Deriver → Classifier → Sink. The loader
//! side lives in `lomarosa-ingest`; everything from the normalizer onward
//! lives here.

pub mod classify;
pub mod columns;
pub mod config;
pub mod derive;
pub mod error;
pub mod join;
pub mod key;
pub mod record;

pub use config::PipelineConfig;
pub use error::{Error, Result};
