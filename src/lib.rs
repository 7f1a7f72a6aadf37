//! Container stream viewer (ctail)
//!
//! Follows a container's logs, or attaches to its shell, over a websocket
//! that reconnects by itself.
//!
//! Pure Core / Impure Shell: `connection` and `state` are synchronous state
//! machines that return actions; `transport` and `view` execute them.

pub mod config;
pub mod connection;
pub mod logging;
pub mod model;
pub mod sink;
pub mod state;
pub mod transport;
pub mod view;
