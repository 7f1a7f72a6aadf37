//! Domain model types (pure).
//!
//! Identifiers, stream targets, key actions and the error taxonomy.

pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod target;

pub use error::{AppError, TransportError};
pub use identifiers::{ContainerId, InvalidContainerId};
pub use key_action::KeyAction;
pub use target::{Endpoint, EndpointError, StreamMode, StreamTarget, UnknownStreamMode};
