//! HTTP Handlers

mod ping;
mod tour;
mod user;

pub use ping::*;
pub use tour::*;
pub use user::*;
