//! Interactive calibration of a form's field positions.
//!
//! A `CalibrationSession` owns the layout being edited, the selected keys and
//! the active drag. Persistence only happens through the methods that take a
//! `LayoutStore`.

use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::fields::is_profile_field;
use crate::form_type::FormType;
use crate::images::decode_image;
use crate::layout::{to_page_units, Layout, PageSize, Point, StoredLayout};
use crate::store::{KeyValueStore, LayoutStore};

/// Arrow-key step, in percent of the page
pub const NUDGE_STEP: f64 = 1.0;
pub const FINE_NUDGE_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for Direction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(AppError::ScriptError(format!("unknown direction '{}'", other))),
        }
    }
}

/// Size of the editing surface, in pointer units. Drags only use pointer
/// deltas, so where the surface sits does not matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Surface { width, height }
    }

    pub fn size(&self) -> PageSize {
        PageSize::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    key: String,
    pointer_start: (f64, f64),
    origin: Point,
    surface: Surface,
}

/// Which markers the editor shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    All,
    Profile,
    Form,
}

/// What to do with unsaved edits when switching form types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnSwitch {
    Refuse,
    Save,
    Discard,
}

/// A field marker as drawn over the editing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub key: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct CalibrationSession {
    layout: Layout,
    selection: Vec<String>,
    drag: Option<DragSession>,
    dirty: bool,
    show_labels: bool,
}

impl CalibrationSession {
    /// Starts editing `form_type` from whatever the store holds.
    pub fn open<S: KeyValueStore>(store: &LayoutStore<S>, form_type: FormType) -> Self {
        Self::with_layout(store.resolve(form_type))
    }

    pub fn with_layout(layout: Layout) -> Self {
        CalibrationSession {
            layout,
            selection: Vec::new(),
            drag: None,
            dirty: false,
            show_labels: false,
        }
    }

    pub fn form_type(&self) -> FormType {
        self.layout.form_type()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Selected keys in the order they were picked.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn set_show_labels(&mut self, show: bool) {
        self.show_labels = show;
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Additive selection toggles `key`; otherwise `key` becomes the only selection.
    pub fn select_field(&mut self, key: &str, additive: bool) {
        if !self.layout.contains(key) {
            debug!(key, "ignoring selection of unknown field");
            return;
        }
        if additive {
            if let Some(index) = self.selection.iter().position(|k| k == key) {
                self.selection.remove(index);
            } else {
                self.selection.push(key.to_string());
            }
        } else {
            self.selection.clear();
            self.selection.push(key.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn is_selected(&self, key: &str) -> bool {
        self.selection.iter().any(|k| k == key)
    }

    // ------------------------------------------------------------------------
    // Dragging
    // ------------------------------------------------------------------------

    /// Starts dragging `key`; replaces any drag already in progress.
    /// Returns false when the field does not exist.
    pub fn begin_drag(&mut self, key: &str, pointer: (f64, f64), surface: Surface) -> bool {
        let Some(field) = self.layout.get(key) else {
            return false;
        };
        if surface.width <= 0.0 || surface.height <= 0.0 {
            return false;
        }
        self.drag = Some(DragSession {
            key: key.to_string(),
            pointer_start: pointer,
            origin: field.point(),
            surface,
        });
        true
    }

    /// Pointer moved. The dragged field follows the pointer, clamped to the
    /// page; when it is part of a multi-field selection every selected field
    /// moves by the same amount.
    pub fn drag_to(&mut self, pointer: (f64, f64)) {
        let Some(drag) = &self.drag else {
            return;
        };
        let Some(current) = self.layout.get(&drag.key).map(|f| f.point()) else {
            return;
        };

        let target_x = drag.origin.x + (pointer.0 - drag.pointer_start.0) / drag.surface.width * 100.0;
        let target_y = drag.origin.y + (pointer.1 - drag.pointer_start.1) / drag.surface.height * 100.0;
        let target_x = target_x.clamp(0.0, 100.0);
        let target_y = target_y.clamp(0.0, 100.0);

        let dx = target_x - current.x;
        let dy = target_y - current.y;
        let key = drag.key.clone();

        if self.selection.len() > 1 && self.is_selected(&key) {
            let selected = self.selection.clone();
            for k in &selected {
                if let Some(field) = self.layout.get_mut(k) {
                    field.x += dx;
                    field.y += dy;
                }
            }
        } else if let Some(field) = self.layout.get_mut(&key) {
            field.x = target_x;
            field.y = target_y;
        }
        self.dirty = true;
    }

    /// Pointer released.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    // ------------------------------------------------------------------------
    // Keyboard Adjustments
    // ------------------------------------------------------------------------

    pub fn nudge(&mut self, direction: Direction, fine: bool) {
        if self.selection.is_empty() {
            return;
        }
        let step = if fine { FINE_NUDGE_STEP } else { NUDGE_STEP };
        let (dx, dy) = match direction {
            Direction::Up => (0.0, -step),
            Direction::Down => (0.0, step),
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
        };
        for key in &self.selection {
            if let Some(field) = self.layout.get_mut(key) {
                field.x += dx;
                field.y += dy;
                self.dirty = true;
            }
        }
    }

    pub fn align_selected_x(&mut self) {
        if let Some(reference) = self.alignment_reference() {
            for key in &self.selection {
                if let Some(field) = self.layout.get_mut(key) {
                    field.x = reference.x;
                }
            }
            self.dirty = true;
        }
    }

    pub fn align_selected_y(&mut self) {
        if let Some(reference) = self.alignment_reference() {
            for key in &self.selection {
                if let Some(field) = self.layout.get_mut(key) {
                    field.y = reference.y;
                }
            }
            self.dirty = true;
        }
    }

    /// Position of the first selected field, if at least two are selected.
    fn alignment_reference(&self) -> Option<Point> {
        if self.selection.len() < 2 {
            return None;
        }
        self.selection
            .iter()
            .find_map(|k| self.layout.get(k))
            .map(|f| f.point())
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    pub fn switch_form_type<S: KeyValueStore>(
        &mut self,
        store: &mut LayoutStore<S>,
        form_type: FormType,
        on_unsaved: OnSwitch,
    ) -> Result<()> {
        if self.dirty {
            match on_unsaved {
                OnSwitch::Refuse => return Err(AppError::UnsavedChanges(self.form_type())),
                OnSwitch::Save => self.save(store)?,
                OnSwitch::Discard => {
                    info!(form_type = %self.form_type(), "discarding unsaved layout edits")
                }
            }
        }
        self.layout = store.resolve(form_type);
        self.selection.clear();
        self.drag = None;
        self.dirty = false;
        Ok(())
    }

    pub fn save<S: KeyValueStore>(&mut self, store: &mut LayoutStore<S>) -> Result<()> {
        store.put_layout(self.form_type(), &self.layout.to_stored())?;
        self.dirty = false;
        info!(form_type = %self.form_type(), "layout saved");
        Ok(())
    }

    pub fn reset_to_default<S: KeyValueStore>(&mut self, store: &mut LayoutStore<S>) -> Result<()> {
        store.delete_override(self.form_type())?;
        self.layout = Layout::default_for(self.form_type());
        self.drag = None;
        self.dirty = false;
        Ok(())
    }

    /// `{ "<key>": { "x": .., "y": .. }, ... }`, pretty-printed.
    pub fn export_layout(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.layout.to_stored())
            .map_err(|e| AppError::ImportError(e.to_string()))
    }

    /// Applies positions from an exported layout and saves the result.
    /// Unknown keys are ignored; a malformed file changes nothing.
    /// Returns how many fields were updated.
    pub fn import_layout<S: KeyValueStore>(&mut self, store: &mut LayoutStore<S>, json: &str) -> Result<usize> {
        let parsed: serde_json::Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| AppError::ImportError(format!("Invalid JSON: {}", e)))?;

        let mut stored = StoredLayout::new();
        for (key, value) in parsed {
            if !self.layout.contains(&key) {
                continue;
            }
            let point: Point = serde_json::from_value(value)
                .map_err(|e| AppError::ImportError(format!("{}: {}", key, e)))?;
            stored.insert(key, point);
        }

        let mut updated = self.layout.clone();
        let applied = updated.merge(&stored);
        store.put_layout(self.form_type(), &updated.to_stored())?;

        self.layout = updated;
        self.dirty = false;
        info!(form_type = %self.form_type(), applied, "layout imported");
        Ok(applied)
    }

    /// Replaces the background template of the form being edited.
    pub fn import_template<S: KeyValueStore>(&self, store: &mut LayoutStore<S>, image: &[u8]) -> Result<()> {
        decode_image(image).map_err(|e| AppError::TemplateError(e.to_string()))?;
        store.put_template(self.form_type(), image)
    }

    // ------------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------------

    /// Markers for `section`, positioned on a surface of `size`.
    pub fn markers(&self, section: Section, size: PageSize) -> Vec<Marker> {
        self.layout
            .iter()
            .filter(|(key, _)| match section {
                Section::All => true,
                Section::Profile => is_profile_field(key),
                Section::Form => !is_profile_field(key),
            })
            .map(|(key, field)| {
                let (x, y) = to_page_units(field.point(), size);
                Marker {
                    key: key.to_string(),
                    label: field.label.clone(),
                    x,
                    y,
                    selected: self.is_selected(key),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn surface() -> Surface {
        Surface::new(1000.0, 1000.0)
    }

    fn session() -> CalibrationSession {
        CalibrationSession::with_layout(Layout::default_for(FormType::Crop))
    }

    fn place(session: &mut CalibrationSession, key: &str, x: f64, y: f64) {
        let field = session.layout.get_mut(key).unwrap();
        field.x = x;
        field.y = y;
    }

    fn pos(session: &CalibrationSession, key: &str) -> Point {
        session.layout().get(key).unwrap().point()
    }

    #[test]
    fn plain_click_replaces_and_shift_click_toggles() {
        let mut s = session();
        s.select_field("last_name", false);
        s.select_field("first_name", true);
        s.select_field("mid_name", true);
        assert_eq!(s.selection(), ["last_name", "first_name", "mid_name"]);

        s.select_field("first_name", true);
        assert_eq!(s.selection(), ["last_name", "mid_name"]);

        s.select_field("suffix", false);
        assert_eq!(s.selection(), ["suffix"]);

        s.select_field("no_such_field", true);
        assert_eq!(s.selection(), ["suffix"]);
    }

    #[test]
    fn single_drag_follows_pointer_and_clamps() {
        let mut s = session();
        place(&mut s, "farmer_id", 50.0, 50.0);
        assert!(s.begin_drag("farmer_id", (500.0, 500.0), surface()));

        s.drag_to((600.0, 450.0));
        let p = pos(&s, "farmer_id");
        assert!((p.x - 60.0).abs() < 1e-9 && (p.y - 45.0).abs() < 1e-9);

        s.drag_to((-900.0, 2000.0));
        assert_eq!(pos(&s, "farmer_id"), Point { x: 0.0, y: 100.0 });
        assert!(s.is_dirty());

        s.end_drag();
        s.drag_to((500.0, 500.0));
        assert_eq!(pos(&s, "farmer_id"), Point { x: 0.0, y: 100.0 });
    }

    #[test]
    fn group_drag_moves_every_selected_field_equally() {
        let mut s = session();
        place(&mut s, "last_name", 10.0, 20.0);
        place(&mut s, "first_name", 30.0, 20.0);
        place(&mut s, "mid_name", 50.0, 70.0);
        let untouched = pos(&s, "suffix");

        s.select_field("last_name", false);
        s.select_field("first_name", true);
        s.select_field("mid_name", true);

        assert!(s.begin_drag("first_name", (300.0, 200.0), surface()));
        s.drag_to((350.0, 180.0));
        s.end_drag();

        let close = |a: Point, b: Point| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9;
        assert!(close(pos(&s, "last_name"), Point { x: 15.0, y: 18.0 }));
        assert!(close(pos(&s, "first_name"), Point { x: 35.0, y: 18.0 }));
        assert!(close(pos(&s, "mid_name"), Point { x: 55.0, y: 68.0 }));
        assert_eq!(pos(&s, "suffix"), untouched);
    }

    #[test]
    fn dragging_unselected_field_moves_only_it() {
        let mut s = session();
        place(&mut s, "last_name", 10.0, 10.0);
        place(&mut s, "first_name", 20.0, 10.0);
        s.select_field("last_name", false);
        s.select_field("first_name", true);

        place(&mut s, "suffix", 40.0, 40.0);
        assert!(s.begin_drag("suffix", (400.0, 400.0), surface()));
        s.drag_to((410.0, 400.0));
        assert_eq!(pos(&s, "last_name"), Point { x: 10.0, y: 10.0 });
        assert!((pos(&s, "suffix").x - 41.0).abs() < 1e-9);
    }

    #[test]
    fn drag_of_unknown_field_is_ignored() {
        let mut s = session();
        let before = s.layout().clone();
        assert!(!s.begin_drag("ls_class_1", (0.0, 0.0), surface()));
        s.drag_to((100.0, 100.0));
        assert_eq!(s.layout(), &before);
        assert!(!s.is_dirty());
    }

    #[test]
    fn drag_scales_each_axis_by_surface_size() {
        let mut s = session();
        place(&mut s, "farmer_id", 50.0, 50.0);
        assert!(s.begin_drag("farmer_id", (400.0, 900.0), Surface::new(800.0, 1200.0)));
        s.drag_to((480.0, 780.0));
        let p = pos(&s, "farmer_id");
        assert!((p.x - 60.0).abs() < 1e-9, "x = {}", p.x);
        assert!((p.y - 40.0).abs() < 1e-9, "y = {}", p.y);
    }

    #[test]
    fn fine_nudge_up_three_times() {
        let mut s = session();
        place(&mut s, "contact", 20.0, 50.0);
        s.select_field("contact", false);
        for _ in 0..3 {
            s.nudge(Direction::Up, true);
        }
        let p = pos(&s, "contact");
        assert!((p.y - 49.7).abs() < 1e-9, "y = {}", p.y);
        assert_eq!(p.x, 20.0);
    }

    #[test]
    fn nudge_without_selection_does_nothing() {
        let mut s = session();
        let before = s.layout().clone();
        s.nudge(Direction::Right, false);
        assert_eq!(s.layout(), &before);
        assert!(!s.is_dirty());
    }

    #[test]
    fn align_x_uses_first_selected() {
        let mut s = session();
        place(&mut s, "last_name", 10.0, 20.0);
        place(&mut s, "first_name", 50.0, 20.0);
        s.select_field("last_name", false);
        s.select_field("first_name", true);

        s.align_selected_x();
        assert_eq!(pos(&s, "last_name"), Point { x: 10.0, y: 20.0 });
        assert_eq!(pos(&s, "first_name"), Point { x: 10.0, y: 20.0 });
    }

    #[test]
    fn align_y_leaves_x_alone() {
        let mut s = session();
        place(&mut s, "bene_name", 5.0, 31.0);
        place(&mut s, "bene_rel", 80.0, 33.0);
        place(&mut s, "bene_birth", 70.0, 35.0);
        for (i, k) in ["bene_rel", "bene_name", "bene_birth"].iter().enumerate() {
            s.select_field(k, i > 0);
        }
        s.align_selected_y();
        assert_eq!(pos(&s, "bene_name"), Point { x: 5.0, y: 33.0 });
        assert_eq!(pos(&s, "bene_rel"), Point { x: 80.0, y: 33.0 });
        assert_eq!(pos(&s, "bene_birth"), Point { x: 70.0, y: 33.0 });
    }

    #[test]
    fn align_needs_two_fields() {
        let mut s = session();
        s.select_field("last_name", false);
        let before = s.layout().clone();
        s.align_selected_x();
        assert_eq!(s.layout(), &before);
    }

    #[test]
    fn save_writes_positions_only() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut s = CalibrationSession::open(&store, FormType::Livestock);
        s.select_field("ls_tag_3", false);
        s.nudge(Direction::Left, false);
        s.save(&mut store).unwrap();
        assert!(!s.is_dirty());

        let raw = store.backend().get("pdf_layout_livestock").unwrap().unwrap();
        assert!(!raw.contains("label"));
        let reopened = CalibrationSession::open(&store, FormType::Livestock);
        assert_eq!(reopened.layout(), s.layout());
    }

    #[test]
    fn failed_save_keeps_edits_pending() {
        let mut store = LayoutStore::new(MemoryStore::unavailable());
        let mut s = session();
        s.select_field("farmer_id", false);
        s.nudge(Direction::Down, false);
        assert!(s.save(&mut store).is_err());
        assert!(s.is_dirty());
    }

    #[test]
    fn switching_honours_unsaved_policy() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut s = CalibrationSession::open(&store, FormType::Crop);
        s.select_field("farmer_id", false);
        s.nudge(Direction::Right, false);
        let edited = pos(&s, "farmer_id");

        let refused = s.switch_form_type(&mut store, FormType::Adss, OnSwitch::Refuse);
        assert!(matches!(refused, Err(AppError::UnsavedChanges(FormType::Crop))));
        assert_eq!(s.form_type(), FormType::Crop);

        s.switch_form_type(&mut store, FormType::Adss, OnSwitch::Save).unwrap();
        assert_eq!(s.form_type(), FormType::Adss);
        assert!(s.selection().is_empty());
        assert_eq!(store.resolve(FormType::Crop).get("farmer_id").unwrap().point(), edited);

        s.select_field("adss_premium", false);
        s.nudge(Direction::Right, false);
        s.switch_form_type(&mut store, FormType::Crop, OnSwitch::Discard).unwrap();
        assert_eq!(store.get_layout(FormType::Adss).unwrap(), None);
    }

    #[test]
    fn reset_discards_override() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut s = CalibrationSession::open(&store, FormType::Banca);
        s.select_field("bn_usage", false);
        s.nudge(Direction::Up, false);
        s.save(&mut store).unwrap();

        s.reset_to_default(&mut store).unwrap();
        assert_eq!(s.layout(), &Layout::default_for(FormType::Banca));
        assert_eq!(store.get_layout(FormType::Banca).unwrap(), None);
    }

    #[test]
    fn export_then_import_is_a_no_op() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut s = CalibrationSession::open(&store, FormType::Crop);
        let before = s.layout().clone();
        let exported = s.export_layout().unwrap();

        let applied = s.import_layout(&mut store, &exported).unwrap();
        assert_eq!(applied, before.len());
        assert_eq!(s.layout(), &before);
    }

    #[test]
    fn export_reproduces_positions_in_another_session() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut source = CalibrationSession::open(&store, FormType::Adss);
        source.select_field("adss_cover", false);
        source.select_field("adss_premium", true);
        source.nudge(Direction::Down, true);
        let exported = source.export_layout().unwrap();
        assert!(!exported.contains("label"));

        let mut target = CalibrationSession::open(&store, FormType::Adss);
        target.import_layout(&mut store, &exported).unwrap();
        assert_eq!(target.layout().to_stored(), source.layout().to_stored());
        assert_eq!(store.get_layout(FormType::Adss).unwrap(), Some(source.layout().to_stored()));
    }

    #[test]
    fn import_ignores_unknown_keys() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut s = CalibrationSession::open(&store, FormType::Crop);
        let json = r#"{"farmer_id": {"x": 1.0, "y": 2.0}, "bn_usage": "whatever", "gone": {"x": 9}}"#;
        assert_eq!(s.import_layout(&mut store, json).unwrap(), 1);
        assert_eq!(pos(&s, "farmer_id"), Point { x: 1.0, y: 2.0 });
    }

    #[test]
    fn malformed_import_changes_nothing() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut s = CalibrationSession::open(&store, FormType::Crop);
        let before = s.layout().clone();

        for bad in ["{not json", "[1, 2]", r#"{"farmer_id": {"x": 1.0}, "last_name": {"x": 3, "y": 4}}"#] {
            assert!(matches!(s.import_layout(&mut store, bad), Err(AppError::ImportError(_))), "{bad}");
            assert_eq!(s.layout(), &before);
            assert_eq!(store.get_layout(FormType::Crop).unwrap(), None);
        }
    }

    #[test]
    fn markers_filter_by_section_and_project_onto_surface() {
        let mut s = session();
        s.select_field("farmer_id", false);
        let size = PageSize::new(800.0, 1000.0);

        let all = s.markers(Section::All, size);
        let profile = s.markers(Section::Profile, size);
        let form = s.markers(Section::Form, size);
        assert_eq!(all.len(), profile.len() + form.len());
        assert!(form.iter().any(|m| m.key == "georef_id"));
        assert!(profile.iter().all(|m| m.key != "georef_id"));

        let marker = profile.iter().find(|m| m.key == "farmer_id").unwrap();
        assert!(marker.selected);
        assert_eq!(marker.label, "Farmer ID");
        assert!((marker.x - 31.01564644582508 * 8.0).abs() < 1e-9);
    }

    #[test]
    fn template_import_rejects_non_images() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let s = session();
        assert!(matches!(
            s.import_template(&mut store, b"plain text"),
            Err(AppError::TemplateError(_))
        ));
        assert_eq!(store.get_template(FormType::Crop).unwrap(), None);
    }
}
