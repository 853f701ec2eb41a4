//! Tabular-source loading for the Lomarosa reporting suite.
//!
//! Turns heterogeneous spreadsheet exports (XLSX via calamine, CSV via the
//! csv crate) into the canonical record collections `lomarosa-core`
//! reconciles: a contacts map, invoice rows, inventory rows, and
//! weekly-average sales derived from a history sheet.
//!
//! Header rows are located by a *configured* offset, never auto-detected;
//! which of two uploaded files plays which role, however, *is*
//! auto-detected from characteristic column-name tokens (see [`detect`]).

pub mod contacts;
pub mod detect;
pub mod error;
pub mod history;
pub mod inventory;
pub mod invoices;
pub mod table;

pub use error::{IngestError, Result};
pub use table::{Cell, SheetSelector, Table};
