//! Client library for the ITHS alumni committee election.
//!
//! The backend owns vote persistence, duplicate-vote prevention, and all
//! authorization; this crate is the consuming side: session holding,
//! envelope-tolerant candidate fetching, ballot orchestration, and the
//! committee's dashboard view.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod model;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};
