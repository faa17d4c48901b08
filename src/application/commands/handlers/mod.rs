//! Command Handlers 实现

mod tour_handlers;

pub use tour_handlers::*;
