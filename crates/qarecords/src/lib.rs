//! `qarecords` - A personal question/answer record manager
//!
//! This library provides the record collection, its local persistence, and
//! the CSV import/export used to move records in and out.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod csv;
pub mod error;
pub mod logging;
pub mod record;
pub mod storage;

pub use config::Config;
pub use controller::{Confirm, EntryOutcome, ImportSummary, View, ViewController};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::Record;
pub use storage::{FileStore, KeyValueStore, MemoryStore, RecordStore};
