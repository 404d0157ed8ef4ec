//! # Editor Core
//!
//! The seam between the mode controller and a rich-text editing widget.
//!
//! ## Philosophy
//!
//! - **Opaque widget**: The editor is a trait object; its internals are its own
//! - **Raw in, raw out**: Content handed to and received from the widget is
//!   never transformed
//! - **Contract at the boundary**: Anything a bridged widget emits is checked
//!   once, here, before it reaches canonical state
//! - **Synchronous callbacks**: Every user mutation is reported immediately
//!
//! ## Design
//!
//! The core provides:
//! - EditSurface: The widget contract (initialize with content, serialize)
//! - ChangeSink: The `onChange` callback seam
//! - ContentChange: A validated serialized-HTML payload
//! - ScriptedSurface: An in-memory reference widget for hosts and tests

pub mod change;
pub mod scripted;
pub mod surface;

pub use change::{ContentChange, SurfaceError};
pub use scripted::ScriptedSurface;
pub use surface::{ChangeSink, EditSurface};
