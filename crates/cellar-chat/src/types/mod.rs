//! Core types for the chat pipeline

pub mod model;
pub mod turn;

pub use model::ModelId;
pub use turn::{Role, Turn};
