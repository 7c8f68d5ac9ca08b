//! Domain and wire types.
//!
//! Everything here serialises exactly as the backend expects it, e.g.:
//!
//! - Candidate ids travel as `_id`.
//! - Positions travel as their display names ("Vice-Chairman").
//! - Vote submissions use camelCase field names.

pub mod auth;
pub mod ballot;
pub mod candidate;
pub mod position;
