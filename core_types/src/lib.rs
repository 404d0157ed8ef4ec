//! # Core Types
//!
//! This crate defines the document record shared by every surface.
//!
//! ## Philosophy
//!
//! - **Borrowed, not owned**: Documents belong to the persistence layer; the
//!   mode boundary only borrows them for the duration of a render
//! - **Opaque pass-through**: Fields this core does not interpret survive
//!   a load/save cycle untouched
//! - **Absent is empty**: A missing `content` field is the empty document
//!
//! ## Key Types
//!
//! - [`DocumentId`]: Stable identifier for a document
//! - [`Document`]: Identifier, HTML body, and opaque metadata

pub mod document;
pub mod ids;

pub use document::Document;
pub use ids::DocumentId;
