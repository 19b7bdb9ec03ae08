pub mod catalog;
pub mod engine;
pub mod error;
pub mod mirror;
pub mod picker;
pub mod walker;

pub use catalog::{HubCatalog, HubListing, PendingCatalog, ProjectListing};
pub use engine::{ExportEngine, ExportReport, ExportSettings, ProgressReporter};
pub use error::{ExportError, SelectError};
pub use mirror::{materialize_output_path, sanitize};
pub use picker::{choose, Answer, Choice, Chooser, TernaryChooser, TernaryPrompt};
pub use walker::collect_files;
