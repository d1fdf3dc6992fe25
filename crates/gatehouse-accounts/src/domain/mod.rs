//! Domain Models
//!
//! Core domain entities. All entities use opaque string IDs for
//! JavaScript client compatibility.

pub mod account;
pub mod role;

pub use account::*;
pub use role::*;
