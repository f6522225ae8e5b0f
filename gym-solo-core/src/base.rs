//! Core abstractions of the environment interface.
mod env;
mod step;
pub use env::Env;
pub use step::{Info, Step};
