//! Pixeora editing core: a fixed-resolution pixel canvas with undo/redo
//! history, flood fill, a bounded store of saved projects, and raster
//! export/thumbnail rendering.
//!
//! The core is UI- and storage-agnostic. Hosts drive [`EditorState`] from
//! their input events, render from [`EditorState::grid`], and plug a
//! [`KeyValueStore`] in for persistence.

pub mod color;
pub mod editor;
pub mod export;
pub mod fill;
pub mod history;
pub mod model;
pub mod project;
pub mod store;

pub use editor::{EditorState, DEFAULT_CANVAS_SIZE, MAX_SAVED_COLORS};
pub use export::{ExportFormat, ExportScale, THUMBNAIL_SIZE};
pub use fill::flood_fill;
pub use history::{HistoryLog, COALESCE_WINDOW_MS};
pub use model::{Pixel, PixelGrid, SavedProject, SortOrder, Tool};
pub use project::{ProjectStore, MAX_PROJECTS};
pub use store::{KeyValueStore, Locale, MemoryStore, Settings};
