//! Query Handlers 实现

mod tour_handlers;
mod user_handlers;

pub use tour_handlers::*;
pub use user_handlers::*;
