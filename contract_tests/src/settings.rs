//! Settings file contract
//!
//! Field names and the version number are part of the on-disk format.
