//! Reminder email rendering and delivery.
//!
//! [`transport::MailTransport`] abstracts the SMTP backend so the HTTP
//! layer and tests can inject their own; [`dispatch`] fans a batch of
//! reminders out over it with bounded concurrency.

pub mod dispatch;
pub mod error;
pub mod message;
pub mod transport;

pub use dispatch::{DispatchResult, DispatchSummary, dispatch_all};
pub use error::SendFailure;
pub use transport::{MailConfig, MailTransport, OutgoingMail, SmtpMailer};
