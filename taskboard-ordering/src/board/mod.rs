//! Board commands

mod get;

pub use get::{BoardView, GetBoard};
