//! Field layouts and the percentage-to-page coordinate transform.
//!
//! A layout stores every field as a percentage of page width and height, so
//! the same layout drives both the calibration surface (whatever size it is
//! drawn at) and the fixed-size PDF page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::form_type::FormType;

// ============================================================================
// Page Geometry
// ============================================================================

/// A4 dimensions in mm
pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Width and height of whatever a layout is being projected onto.
///
/// For rendering this is the PDF page in mm; for calibration it is the
/// on-screen box of the editing surface in its own units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4_PORTRAIT: PageSize = PageSize {
        width: A4_WIDTH_MM,
        height: A4_HEIGHT_MM,
    };

    pub const A4_LANDSCAPE: PageSize = PageSize {
        width: A4_HEIGHT_MM,
        height: A4_WIDTH_MM,
    };

    pub fn new(width: f64, height: f64) -> Self {
        PageSize { width, height }
    }
}

/// Percent coordinates as persisted and exported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Converts a percentage point into absolute units of `page`.
///
/// Values outside 0..=100 are projected as-is so fields may bleed off the page.
pub fn to_page_units(point: Point, page: PageSize) -> (f64, f64) {
    (point.x / 100.0 * page.width, point.y / 100.0 * page.height)
}

// ============================================================================
// Field Positions
// ============================================================================

/// Which point of a drawn item the stored coordinate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Left end of the text baseline.
    #[default]
    Baseline,
    /// Center of an image box.
    Center,
    /// Top-left corner of an image box.
    TopLeft,
}

impl Anchor {
    /// Top-left corner of a `width` x `height` box placed at `at` (y grows downward).
    pub fn box_origin(self, at: (f64, f64), width: f64, height: f64) -> (f64, f64) {
        let (x, y) = at;
        match self {
            Anchor::Center => (x - width / 2.0, y - height / 2.0),
            Anchor::TopLeft => (x, y),
            Anchor::Baseline => (x, y - height),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldPosition {
    pub x: f64,
    pub y: f64,
    /// Editor caption only; never persisted.
    pub label: String,
    pub anchor: Anchor,
}

impl FieldPosition {
    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

// ============================================================================
// Layouts
// ============================================================================

/// The positions-only form a layout takes in storage and in exported files.
pub type StoredLayout = BTreeMap<String, Point>;

/// Every field of one form type, keyed by field key.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    form_type: FormType,
    fields: BTreeMap<String, FieldPosition>,
}

impl Layout {
    /// Fresh copy of the built-in layout for `form_type`.
    pub fn default_for(form_type: FormType) -> Self {
        let fields = defaults::positions(form_type)
            .iter()
            .map(|d| {
                (
                    d.key.to_string(),
                    FieldPosition {
                        x: d.x,
                        y: d.y,
                        label: d.label.to_string(),
                        anchor: d.anchor,
                    },
                )
            })
            .collect();
        Layout { form_type, fields }
    }

    pub fn form_type(&self) -> FormType {
        self.form_type
    }

    pub fn get(&self, key: &str) -> Option<&FieldPosition> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldPosition> {
        self.fields.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldPosition)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overwrites x/y of keys this layout already has; unknown keys are ignored.
    /// Returns how many positions were applied.
    pub fn merge(&mut self, stored: &StoredLayout) -> usize {
        let mut applied = 0;
        for (key, point) in stored {
            if let Some(field) = self.fields.get_mut(key) {
                field.x = point.x;
                field.y = point.y;
                applied += 1;
            }
        }
        applied
    }

    /// Positions only, labels and anchors dropped.
    pub fn to_stored(&self) -> StoredLayout {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.point()))
            .collect()
    }
}

/// Default layout for `form_type` with `stored` applied on top of it.
///
/// The result always has exactly the default key set.
pub fn resolve_layout(form_type: FormType, stored: Option<&StoredLayout>) -> Layout {
    let mut layout = Layout::default_for(form_type);
    if let Some(stored) = stored {
        layout.merge(stored);
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn point(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    #[test]
    fn resolved_key_set_matches_default() {
        for form_type in FormType::ALL {
            let default_keys: Vec<String> = Layout::default_for(form_type)
                .keys()
                .map(str::to_string)
                .collect();

            let mut stored = StoredLayout::new();
            stored.insert("not_a_field".to_string(), point(1.0, 2.0));
            stored.insert("last_name".to_string(), point(3.0, 4.0));

            let resolved = resolve_layout(form_type, Some(&stored));
            let resolved_keys: Vec<String> = resolved.keys().map(str::to_string).collect();
            assert_eq!(resolved_keys, default_keys);
            assert!(!resolved.contains("not_a_field"));
        }
    }

    #[test]
    fn override_replaces_position_but_keeps_label() {
        let mut stored = StoredLayout::new();
        stored.insert("farmer_id".to_string(), point(50.0, 60.0));

        let layout = resolve_layout(FormType::Crop, Some(&stored));
        let field = layout.get("farmer_id").unwrap();
        assert_eq!(field.point(), point(50.0, 60.0));
        assert_eq!(field.label, "Farmer ID");

        let untouched = layout.get("last_name").unwrap();
        let default = Layout::default_for(FormType::Crop);
        assert_eq!(untouched, default.get("last_name").unwrap());
    }

    #[test]
    fn transform_maps_corners() {
        for (w, h) in [(210.0, 297.0), (1.0, 1.0), (800.0, 1131.0)] {
            let page = PageSize::new(w, h);
            assert_eq!(to_page_units(point(0.0, 0.0), page), (0.0, 0.0));
            assert_eq!(to_page_units(point(100.0, 100.0), page), (w, h));
        }
    }

    #[test]
    fn transform_does_not_clamp() {
        let (x, y) = to_page_units(point(-10.0, 110.0), PageSize::A4_PORTRAIT);
        assert!((x + 21.0).abs() < 1e-9);
        assert!((y - 326.7).abs() < 1e-9);
    }

    #[test]
    fn crop_farmer_id_lands_in_mm() {
        let layout = Layout::default_for(FormType::Crop);
        let field = layout.get("farmer_id").unwrap();
        let (x, y) = to_page_units(field.point(), PageSize::A4_PORTRAIT);
        assert!((x - 65.13).abs() < 0.01, "x = {x}");
        assert!((y - 45.59).abs() < 0.01, "y = {y}");
    }

    #[test]
    fn center_anchor_offsets_by_half_box() {
        let origin = Anchor::Center.box_origin((100.0, 50.0), 40.0, 15.0);
        assert_eq!(origin, (80.0, 42.5));
        assert_eq!(Anchor::TopLeft.box_origin((100.0, 50.0), 40.0, 15.0), (100.0, 50.0));
        assert_eq!(Anchor::Baseline.box_origin((100.0, 50.0), 40.0, 15.0), (100.0, 35.0));
    }

    #[test]
    fn stored_form_drops_labels() {
        let layout = Layout::default_for(FormType::Banca);
        let stored = layout.to_stored();
        assert_eq!(stored.len(), layout.len());
        let json = serde_json::to_string(&stored).unwrap();
        assert!(!json.contains("label"));
        assert!(json.contains("\"bn_home_port\":{\"x\":"));
    }
}
