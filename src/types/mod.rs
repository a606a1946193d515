//! Assorted types, in particular [error types](err).

pub mod err;
