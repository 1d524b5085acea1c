//! # Secure Share Model viewer
//!
//! Plays back an archive produced by the generator. A [`ViewerSession`] holds
//! the current rotation and zoom and turns each [`Command`] into the
//! [`Frame`] for the matching snapshot. [`ViewerApp`] binds a session to a
//! [`Display`] and maps raw [`InputEvent`]s to commands.
//!
//! ```text
//! InputEvent -> map_input -> Command -> ViewerSession -> Frame -> Display
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod display;
pub mod frame;
pub mod input;
pub mod session;
pub mod store;

pub use app::*;
pub use command::*;
pub use config::*;
pub use display::*;
pub use frame::*;
pub use input::*;
pub use session::*;
pub use store::*;
