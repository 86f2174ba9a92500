//! Lexlink Web - Linked-data resources over HTTP
//!
//! Turns a request path into a subject, resolves the subject through the
//! storage crate and renders the result in the negotiated representation.

pub mod error;
pub mod negotiate;
pub mod render;
pub mod resource;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ServerError;
pub use negotiate::{negotiate, ContentType};
pub use render::{RenderContext, RenderError};
pub use resource::{respond, ResourceResponse};
pub use routes::{PathError, RouteKind, RouteResolver, RouteSpec};
pub use server::{build_router, run_server};
pub use state::{AppState, Assets, Settings, StoreView};
