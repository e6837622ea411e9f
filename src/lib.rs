//! Command-line front-end for nearby dinner recommendations.

pub mod messages;
pub mod render;
pub mod session;

pub use session::{FinderSession, FinderState, SessionError};
