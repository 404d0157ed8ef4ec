//! # HTML Sanitizer
//!
//! The sanitization gate between editor-produced markup and the display surface.
//!
//! ## Philosophy
//!
//! - **Strip, never show**: Disallowed wrappers and attributes disappear; their
//!   safe children stay
//! - **Fixed policy**: The allow-list is a static table, not configuration
//! - **Degrade toward safety**: Malformed input loses content, never gains
//!   privileges
//! - **Idempotent**: `sanitize(sanitize(x)) == sanitize(x)`
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A full HTML5 tree builder
//! - A CSS sanitizer (`style` attributes are always removed)
//! - A markdown renderer
//!
//! ## Design
//!
//! - [`tokenizer`] lexes arbitrary input into tokens and never fails
//! - [`policy`] answers per-element and per-attribute questions from static tables
//! - [`gate`] walks tokens, balances open elements and serializes canonical markup
//! - [`SanitizedHtml`] can only be produced by the gate, so holding one proves
//!   the string went through it

pub mod entities;
pub mod gate;
pub mod policy;
pub mod tokenizer;

pub use gate::{
    sanitize, sanitize_to_string, sanitize_with_report, SanitizeReport, Sanitized, SanitizedHtml,
};
