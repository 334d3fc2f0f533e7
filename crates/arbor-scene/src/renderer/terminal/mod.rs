//! Terminal backend for the scene

mod backend;
mod projection;

pub use backend::{CellBuffer, TerminalBackend};
pub use projection::Projection;
