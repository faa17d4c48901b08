//! HTTP Layer - RESTful API
//!
//! 所有接口返回 `{code, message, data}` 统一信封

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use extract::PagingDefaults;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
