//! HTTP front end for a WebJars dependency graph.
//!
//! Serves `GET /webjars/...`: script and stylesheet paths known to the graph
//! come back as one body holding the library and everything it depends on.

pub mod handler;
pub mod server;

pub use handler::{lookup, Lookup, ServerState};
pub use server::{build_router, run, start, ServerConfig, ServerHandle};
