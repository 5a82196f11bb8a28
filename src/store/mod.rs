//! Store module - data-access layer
//!
//! Sole owner of the conversation with MySQL. The HTTP services never build
//! SQL themselves; they call through [`MysqlStore`].

pub mod error;
pub mod mysql;
pub mod row;
pub mod tables;

pub use error::StoreError;
pub use mysql::{InsertBody, MysqlStore, WriteOutcome};
pub use row::JsonRow;
pub use tables::{Table, id_field_for};
