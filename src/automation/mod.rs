//! Narrow automation surface of the drawing application.
//!
//! The batch converter only talks to the application through these traits.
//! A backend bridges them to whatever mechanism actually drives the program.

mod command;

pub use command::{CommandApp, CommandLauncher};

use crate::error::AutomationError;
use std::path::Path;

/// Result of a call into the application.
pub type AutomationResult<T> = std::result::Result<T, AutomationError>;

/// Handle to a drawing opened in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// Starts application instances.
pub trait AppLauncher {
    /// Start a new instance registered under `prog_id`.
    fn launch(&mut self, prog_id: &str) -> AutomationResult<Box<dyn DrawingApp>>;
}

/// A running application instance, exclusively owned by the caller.
pub trait DrawingApp {
    /// Show or hide the main window.
    fn set_visible(&mut self, visible: bool) -> AutomationResult<()>;

    /// Close the document that is active right after start-up.
    fn close_active_document(&mut self, save_changes: bool) -> AutomationResult<()>;

    /// Open a drawing.
    fn open_document(&mut self, path: &Path, read_only: bool) -> AutomationResult<DocumentId>;

    /// Plot an open drawing to `output` with the named plot configuration.
    fn plot_to_file(
        &mut self,
        doc: DocumentId,
        output: &Path,
        profile: &str,
    ) -> AutomationResult<()>;

    /// Close an open drawing.
    fn close_document(&mut self, doc: DocumentId, save_changes: bool) -> AutomationResult<()>;

    /// Terminate the instance.
    fn quit(self: Box<Self>) -> AutomationResult<()>;
}
