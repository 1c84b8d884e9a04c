//! enroll-pdf: calibrate where each field of an insurance enrollment form
//! lands on a scanned template, then render application records onto it.

pub mod defaults;
pub mod editor;
pub mod error;
pub mod fields;
pub mod form_type;
pub mod images;
pub mod layout;
pub mod record;
pub mod render;
pub mod script;
pub mod store;
pub mod summary;

pub use editor::{CalibrationSession, Direction, Marker, OnSwitch, Section, Surface};
pub use error::{AppError, Result};
pub use form_type::FormType;
pub use layout::{resolve_layout, to_page_units, Anchor, FieldPosition, Layout, PageSize, Point, StoredLayout};
pub use record::ApplicationRecord;
pub use render::{paint, plan_page, render_to_page, DirectorySink, PageSink, RenderedPage};
pub use store::{FileStore, KeyValueStore, LayoutStore, MemoryStore};
pub use summary::{Summary, SummaryRequest};
