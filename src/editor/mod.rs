mod buffer;
mod cursor;
mod editor;
mod event;
mod selection;

pub use buffer::Buffer;
pub use cursor::{Cursor, Position};
pub use editor::Editor;
pub use event::EditorEvent;
pub use selection::{Selection, SelectionSpan};
