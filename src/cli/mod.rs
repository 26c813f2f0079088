//! Command-line front end over the note store.
mod app;
mod args;

pub use app::*;
pub use args::*;
