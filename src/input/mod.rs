mod handler;
mod key;
mod keymap;

pub use handler::apply_default;
pub use key::{KeyParseError, KeySpec, NamedKey};
pub use keymap::{Binding, BindingScope, KeyRegistry, ResolvedBinding};
