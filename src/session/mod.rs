//! Session-scoped navigation state

pub mod mode;
pub mod store;

pub use mode::{decode_selection, encode_selection, FilterMode};
pub use store::{ResolveError, SessionContext, SessionStore};
