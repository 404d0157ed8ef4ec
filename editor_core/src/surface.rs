//! Widget contract

use crate::change::{ContentChange, SurfaceError};

/// A rich-text editing widget
///
/// Any widget satisfying this contract can be mounted. Placeholder text and
/// flushing pending input on unmount are the widget's responsibility.
pub trait EditSurface {
    /// Loads content as the widget's controlled value
    ///
    /// Initialization is not a user mutation and must not emit a change.
    fn initialize(&mut self, content: &str);

    /// Returns the widget's current serialized HTML
    fn serialize(&self) -> String;
}

/// Receiver for change events
///
/// Widgets call this synchronously on every user-driven mutation.
pub trait ChangeSink {
    fn on_change(&mut self, change: ContentChange) -> Result<(), SurfaceError>;
}

impl ChangeSink for Vec<ContentChange> {
    fn on_change(&mut self, change: ContentChange) -> Result<(), SurfaceError> {
        self.push(change);
        Ok(())
    }
}
