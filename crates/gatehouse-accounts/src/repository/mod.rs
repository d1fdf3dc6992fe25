//! Repository Layer
//!
//! MongoDB repositories for the account domain.

pub mod account;
pub mod indexes;

pub use account::AccountRepository;
pub use indexes::ensure_indexes;
