//! Infrastructure layer
//!
//! Concrete collaborators that touch the outside world: the rustup probe,
//! the cargo backend and the file-backed active target.

pub mod cargo;
pub mod environment;
pub mod rustup;
