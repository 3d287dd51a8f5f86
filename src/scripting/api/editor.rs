//! fm::editor_* - the open text buffer
//!
//! Lines and columns are 1-indexed; the end column of a range is exclusive.
//! Calls made with no buffer open return `false` or `()`.
//!
//! ```rhai
//! let line = fm::editor_get_line(1);
//! fm::editor_replace_text(1, 1, 1, line.len() + 1, line.to_upper());
//! ```

use rhai::{Array, Dynamic, Map, Module};

use super::{FmApi, FnResult, to_int};
use crate::editor::{Editor, Position, Selection};
use crate::plugins::shared;

impl FmApi {
    fn with_editor<R>(&self, f: impl FnOnce(&Editor) -> R) -> R {
        f(&shared::read(&self.shared.editor))
    }

    fn with_editor_mut<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> R {
        f(&mut shared::write(&self.shared.editor))
    }

    pub fn editor_active(&self) -> bool {
        self.with_editor(Editor::is_open)
    }

    pub fn editor_get_line(&self, n: i64) -> Option<String> {
        self.with_editor(|e| e.get_line(n))
    }

    pub fn editor_get_lines(&self, from: i64, to: i64) -> Option<Vec<String>> {
        self.with_editor(|e| e.get_lines(from, to))
    }

    pub fn editor_get_content(&self) -> Option<String> {
        self.with_editor(Editor::get_content)
    }

    pub fn editor_line_count(&self) -> usize {
        self.with_editor(Editor::line_count)
    }

    pub fn editor_get_cursor(&self) -> Option<Position> {
        self.with_editor(Editor::cursor)
    }

    pub fn editor_set_cursor(&self, line: i64, col: i64) -> bool {
        self.with_editor_mut(|e| e.set_cursor(line, col))
    }

    pub fn editor_get_selection(&self) -> Option<Selection> {
        self.with_editor(Editor::selection)
    }

    pub fn editor_set_selection(&self, sl: i64, sc: i64, el: i64, ec: i64) -> bool {
        self.with_editor_mut(|e| e.set_selection(sl, sc, el, ec))
    }

    pub fn editor_clear_selection(&self) -> bool {
        self.with_editor_mut(Editor::clear_selection)
    }

    pub fn editor_insert_text(&self, text: &str) -> bool {
        self.with_editor_mut(|e| e.insert_text(text))
    }

    pub fn editor_delete_range(&self, sl: i64, sc: i64, el: i64, ec: i64) -> bool {
        self.with_editor_mut(|e| e.delete_range(sl, sc, el, ec))
    }

    pub fn editor_replace_text(&self, sl: i64, sc: i64, el: i64, ec: i64, text: &str) -> bool {
        self.with_editor_mut(|e| e.replace_text(sl, sc, el, ec, text))
    }

    pub fn editor_uppercase_selection(&self) -> bool {
        self.with_editor_mut(Editor::uppercase_selection)
    }

    pub fn editor_save(&self) -> bool {
        self.with_editor_mut(Editor::save)
    }

    pub fn editor_save_as(&self, path: &str) -> bool {
        self.with_editor_mut(|e| e.save_as(path))
    }

    pub fn editor_reload(&self) -> bool {
        self.with_editor_mut(Editor::reload)
    }

    pub fn editor_close(&self) -> bool {
        self.with_editor_mut(Editor::close)
    }

    pub fn editor_open(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        self.with_editor_mut(|e| e.open(path))
    }

    pub fn editor_set_readonly(&self, readonly: bool) -> bool {
        self.with_editor_mut(|e| e.set_readonly(readonly))
    }

    pub fn editor_is_readonly(&self) -> bool {
        self.with_editor(Editor::is_readonly)
    }

    pub fn editor_is_dirty(&self) -> bool {
        self.with_editor(Editor::is_dirty)
    }

    pub fn editor_get_path(&self) -> Option<String> {
        self.with_editor(|e| e.path().map(|p| p.to_string_lossy().into_owned()))
    }
}

fn string_or_unit(s: Option<String>) -> Dynamic {
    s.map_or(Dynamic::UNIT, Dynamic::from)
}

fn position_map(pos: Position) -> Map {
    let mut map = Map::new();
    map.insert("line".into(), Dynamic::from_int(to_int(pos.line)));
    map.insert("col".into(), Dynamic::from_int(to_int(pos.col)));
    map
}

fn selection_map(sel: Selection) -> Map {
    let mut map = Map::new();
    map.insert("start_line".into(), Dynamic::from_int(to_int(sel.start_line)));
    map.insert("start_col".into(), Dynamic::from_int(to_int(sel.start_col)));
    map.insert("end_line".into(), Dynamic::from_int(to_int(sel.end_line)));
    map.insert("end_col".into(), Dynamic::from_int(to_int(sel.end_col)));
    map
}

pub(super) fn register(module: &mut Module, api: &FmApi) {
    // Reads

    {
        let api = api.clone();
        module.set_native_fn("editor_active", move || -> FnResult<bool> { Ok(api.editor_active()) });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_get_line", move |n: i64| -> FnResult<Dynamic> {
            Ok(string_or_unit(api.editor_get_line(n)))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_get_lines", move |from: i64, to: i64| -> FnResult<Dynamic> {
            Ok(match api.editor_get_lines(from, to) {
                Some(lines) => Dynamic::from_array(lines.into_iter().map(Dynamic::from).collect::<Array>()),
                None => Dynamic::UNIT,
            })
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_get_content", move || -> FnResult<Dynamic> {
            Ok(string_or_unit(api.editor_get_content()))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_line_count", move || -> FnResult<i64> {
            Ok(to_int(api.editor_line_count()))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_get_path", move || -> FnResult<Dynamic> {
            Ok(string_or_unit(api.editor_get_path()))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_is_readonly", move || -> FnResult<bool> {
            Ok(api.editor_is_readonly())
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_is_dirty", move || -> FnResult<bool> { Ok(api.editor_is_dirty()) });
    }

    // Cursor and selection

    {
        let api = api.clone();
        module.set_native_fn("editor_get_cursor", move || -> FnResult<Dynamic> {
            Ok(api
                .editor_get_cursor()
                .map_or(Dynamic::UNIT, |pos| Dynamic::from_map(position_map(pos))))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_set_cursor", move |line: i64, col: i64| -> FnResult<bool> {
            Ok(api.editor_set_cursor(line, col))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_get_selection", move || -> FnResult<Dynamic> {
            Ok(api
                .editor_get_selection()
                .map_or(Dynamic::UNIT, |sel| Dynamic::from_map(selection_map(sel))))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn(
            "editor_set_selection",
            move |sl: i64, sc: i64, el: i64, ec: i64| -> FnResult<bool> {
                Ok(api.editor_set_selection(sl, sc, el, ec))
            },
        );
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_clear_selection", move || -> FnResult<bool> {
            Ok(api.editor_clear_selection())
        });
    }

    // Mutations

    {
        let api = api.clone();
        module.set_native_fn("editor_insert_text", move |text: &str| -> FnResult<bool> {
            Ok(api.editor_insert_text(text))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn(
            "editor_delete_range",
            move |sl: i64, sc: i64, el: i64, ec: i64| -> FnResult<bool> {
                Ok(api.editor_delete_range(sl, sc, el, ec))
            },
        );
    }

    {
        let api = api.clone();
        module.set_native_fn(
            "editor_replace_text",
            move |sl: i64, sc: i64, el: i64, ec: i64, text: &str| -> FnResult<bool> {
                Ok(api.editor_replace_text(sl, sc, el, ec, text))
            },
        );
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_uppercase_selection", move || -> FnResult<bool> {
            Ok(api.editor_uppercase_selection())
        });
    }

    // Lifecycle

    {
        let api = api.clone();
        module.set_native_fn("editor_save", move || -> FnResult<bool> { Ok(api.editor_save()) });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_save_as", move |path: &str| -> FnResult<bool> {
            Ok(api.editor_save_as(path))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_reload", move || -> FnResult<bool> { Ok(api.editor_reload()) });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_close", move || -> FnResult<bool> { Ok(api.editor_close()) });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_open", move |path: &str| -> FnResult<bool> {
            Ok(api.editor_open(path))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("editor_set_readonly", move |readonly: bool| -> FnResult<bool> {
            Ok(api.editor_set_readonly(readonly))
        });
    }
}
