//! Persisted panel state: manual orderings, collapse flags, and the
//! on-disk blob that holds them.

pub mod collapse;
pub mod order;
pub mod persist;
