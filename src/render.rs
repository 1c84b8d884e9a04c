//! Renders an application record onto its form template as a one-page PDF.
//!
//! Rendering is split in two: `plan_page` decides what goes where (pure, no
//! PDF types), `paint` turns the plan into PDF bytes. Draw order is
//! background, text, checkmarks, images; later items overlap earlier ones.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ::image::DynamicImage;
use chrono::NaiveDate;
use printpdf::*;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, Result};
use crate::fields::{bindings, BindingContext, FieldKind, TextStyle};
use crate::form_type::FormType;
use crate::images::{blank_template, decode_base64, decode_image, flatten_onto_white};
use crate::layout::{to_page_units, Layout, PageSize};
use crate::record::ApplicationRecord;
use crate::store::{KeyValueStore, LayoutStore};

/// Every application form prints on A4 portrait
pub const FORM_PAGE: PageSize = PageSize::A4_PORTRAIT;

/// ZapfDingbats code for a check mark
const CHECK_GLYPH: &str = "3";
const CHECK_FONT_SIZE: f32 = 12.0;

const MM_PER_INCH: f32 = 25.4;

// ============================================================================
// Page Plan
// ============================================================================

/// One drawing step, in page mm measured from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Background {
        width: f64,
        height: f64,
    },
    Text {
        key: &'static str,
        text: String,
        x: f64,
        y: f64,
        style: TextStyle,
    },
    Check {
        key: &'static str,
        x: f64,
        y: f64,
    },
    /// `x`/`y` is the top-left corner of the box.
    Image {
        key: &'static str,
        data: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl DrawOp {
    /// Paint layer; ops are always emitted in ascending layer order.
    pub fn layer(&self) -> u8 {
        match self {
            DrawOp::Background { .. } => 0,
            DrawOp::Text { .. } => 1,
            DrawOp::Check { .. } => 2,
            DrawOp::Image { .. } => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub form_type: FormType,
    pub page: PageSize,
    pub ops: Vec<DrawOp>,
}

/// Decides what to draw for `record` on `layout`'s form. Fields with no value
/// or no position are left out.
pub fn plan_page(record: &ApplicationRecord, layout: &Layout, today: NaiveDate) -> PagePlan {
    let form_type = layout.form_type();
    let page = FORM_PAGE;
    let ctx = BindingContext::new(record, today);

    let mut texts = Vec::new();
    let mut checks = Vec::new();
    let mut images = Vec::new();

    for binding in bindings(form_type) {
        let Some(position) = layout.get(binding.key) else {
            debug!(%form_type, key = binding.key, "no position for field, skipping");
            continue;
        };
        let (x, y) = to_page_units(position.point(), page);

        match &binding.kind {
            FieldKind::Text { source, style } => {
                if let Some(text) = ctx.text(source) {
                    texts.push(DrawOp::Text {
                        key: binding.key,
                        text,
                        x,
                        y,
                        style: *style,
                    });
                }
            }
            FieldKind::Check(condition) => {
                if ctx.holds(condition) {
                    checks.push(DrawOp::Check {
                        key: binding.key,
                        x,
                        y,
                    });
                }
            }
            FieldKind::Image {
                source,
                width,
                height,
            } => {
                if let Some(data) = ctx.image(source) {
                    let (left, top) = position.anchor.box_origin((x, y), *width, *height);
                    images.push(DrawOp::Image {
                        key: binding.key,
                        data,
                        x: left,
                        y: top,
                        width: *width,
                        height: *height,
                    });
                }
            }
        }
    }

    let mut ops = Vec::with_capacity(1 + texts.len() + checks.len() + images.len());
    ops.push(DrawOp::Background {
        width: page.width,
        height: page.height,
    });
    ops.extend(texts);
    ops.extend(checks);
    ops.extend(images);

    PagePlan {
        form_type,
        page,
        ops,
    }
}

// ============================================================================
// PDF Painting
// ============================================================================

/// Draws `plan` over `template` and returns the PDF bytes.
///
/// A template that cannot be decoded fails the page; a bad field image only
/// loses that field.
pub fn paint(plan: &PagePlan, template: &[u8]) -> Result<Vec<u8>> {
    let page_width = plan.page.width as f32;
    let page_height = plan.page.height as f32;

    let (doc, page1, layer1) = PdfDocument::new(
        format!("{} Application", plan.form_type),
        Mm(page_width),
        Mm(page_height),
        "Layer 1",
    );
    let layer = doc.get_page(page1).get_layer(layer1);

    let font_regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    let font_check = doc
        .add_builtin_font(BuiltinFont::ZapfDingbats)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    for op in &plan.ops {
        match op {
            DrawOp::Background { width, height } => {
                let background = decode_image(template)
                    .map_err(|e| AppError::TemplateError(e.to_string()))?;
                embed_stretched(&layer, &background, 0.0, 0.0, *width as f32, *height as f32)
                    .map_err(|e| AppError::TemplateError(e.to_string()))?;
            }
            DrawOp::Text {
                text, x, y, style, ..
            } => {
                let font = if style.bold { &font_bold } else { &font_regular };
                layer.use_text(
                    text.as_str(),
                    style.size,
                    Mm(*x as f32),
                    Mm(page_height - *y as f32),
                    font,
                );
            }
            DrawOp::Check { x, y, .. } => {
                layer.use_text(
                    CHECK_GLYPH,
                    CHECK_FONT_SIZE,
                    Mm(*x as f32),
                    Mm(page_height - *y as f32),
                    &font_check,
                );
            }
            DrawOp::Image {
                key,
                data,
                x,
                y,
                width,
                height,
            } => {
                let drawn = decode_base64(data)
                    .and_then(|bytes| decode_image(&bytes))
                    .and_then(|image| {
                        embed_stretched(
                            &layer,
                            &image,
                            *x as f32,
                            page_height - (*y + *height) as f32,
                            *width as f32,
                            *height as f32,
                        )
                    });
                if let Err(e) = drawn {
                    warn!(key = *key, error = %e, "image field skipped");
                }
            }
        }
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::PdfError(e.to_string()))
}

/// Places `image` so it exactly fills the box whose bottom-left corner is (`x`, `y`).
fn embed_stretched(
    layer: &PdfLayerReference,
    image: &DynamicImage,
    x: f32,
    y: f32,
    width_mm: f32,
    height_mm: f32,
) -> Result<()> {
    let rgb_image = flatten_onto_white(image);
    let (width_px, height_px) = rgb_image.dimensions();
    if width_px == 0 || height_px == 0 || width_mm <= 0.0 || height_mm <= 0.0 {
        return Err(AppError::ImageError("empty image or box".to_string()));
    }

    let raw_pixels = rgb_image.into_raw();

    let image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: raw_pixels,
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI fixes the width; the height is then stretched to the box
    let dpi = (width_px as f32) / (width_mm / MM_PER_INCH);
    let natural_height_mm = height_px as f32 / dpi * MM_PER_INCH;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            dpi: Some(dpi),
            scale_y: Some(height_mm / natural_height_mm),
            ..Default::default()
        },
    );

    Ok(())
}

// ============================================================================
// Store-Backed Rendering
// ============================================================================

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Renders `record` as `form_type` with the layout and template held in `store`.
pub fn render_to_page<S: KeyValueStore>(
    record: &ApplicationRecord,
    form_type: FormType,
    store: &mut LayoutStore<S>,
    today: NaiveDate,
) -> Result<RenderedPage> {
    let layout = store.resolve(form_type);
    let template = template_for(store, form_type)?;
    let plan = plan_page(record, &layout, today);
    debug!(%form_type, ops = plan.ops.len(), "page planned");

    let bytes = paint(&plan, &template)?;
    Ok(RenderedPage {
        file_name: record.suggested_file_name(form_type, today),
        bytes,
    })
}

/// Imported template, or the bundled blank page. A blank page used because
/// none was imported is written back so later renders find it.
fn template_for<S: KeyValueStore>(store: &mut LayoutStore<S>, form_type: FormType) -> Result<Vec<u8>> {
    let missing = match store.get_template(form_type) {
        Ok(Some(bytes)) => return Ok(bytes),
        Ok(None) => true,
        Err(e @ AppError::TemplateError(_)) => return Err(e),
        Err(e) => {
            warn!(%form_type, error = %e, "template unavailable, drawing on blank page");
            false
        }
    };

    let bytes = blank_template(FORM_PAGE)?;
    if missing {
        info!(%form_type, "no template imported, restoring bundled blank page");
        if let Err(e) = store.put_template(form_type, &bytes) {
            error!(%form_type, error = %e, "could not persist bundled template");
        }
    }
    Ok(bytes)
}

// ============================================================================
// Output
// ============================================================================

/// Somewhere finished pages go.
pub trait PageSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes pages as files under a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        DirectorySink {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl PageSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use base64::engine::general_purpose::STANDARD as B64;
    use base64::Engine;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    fn tiny_png() -> String {
        let image = ::image::RgbaImage::from_pixel(4, 2, ::image::Rgba([0, 0, 0, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut png), ::image::ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", B64.encode(png))
    }

    fn crop_record() -> ApplicationRecord {
        let mut record = ApplicationRecord::new();
        record.set("FarmersID", "10-45-001");
        record.set("LastName", "Santos");
        record.set("FirstName", "Maria");
        record.set("Sex", "FEMALE");
        record.set("Birthdate", "1975-08-30");
        record.set("CropType", "RICE");
        record.set("TypePlanting", "DIRECT");
        record.set("Signature", tiny_png());
        record
    }

    fn keys(plan: &PagePlan) -> Vec<&'static str> {
        plan.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { key, .. } | DrawOp::Check { key, .. } | DrawOp::Image { key, .. } => Some(*key),
                DrawOp::Background { .. } => None,
            })
            .collect()
    }

    #[test]
    fn ops_follow_paint_order() {
        let layout = Layout::default_for(FormType::Crop);
        let plan = plan_page(&crop_record(), &layout, today());

        assert!(matches!(plan.ops[0], DrawOp::Background { width, height } if width == 210.0 && height == 297.0));
        let layers: Vec<u8> = plan.ops.iter().map(DrawOp::layer).collect();
        let mut sorted = layers.clone();
        sorted.sort();
        assert_eq!(layers, sorted);
        assert!(layers.contains(&1) && layers.contains(&2) && layers.contains(&3));
    }

    #[test]
    fn text_lands_at_transformed_position() {
        let layout = Layout::default_for(FormType::Crop);
        let plan = plan_page(&crop_record(), &layout, today());
        let farmer_id = plan
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { key: "farmer_id", text, x, y, style } => Some((text.clone(), *x, *y, *style)),
                _ => None,
            })
            .unwrap();
        assert_eq!(farmer_id.0, "10-45-001");
        assert!((farmer_id.1 - 65.13).abs() < 0.01);
        assert!((farmer_id.2 - 45.59).abs() < 0.01);
        assert_eq!(farmer_id.3, TextStyle::REGULAR);
    }

    #[test]
    fn dates_and_signature_name_are_formatted() {
        let layout = Layout::default_for(FormType::Crop);
        let plan = plan_page(&crop_record(), &layout, today());
        let text_of = |wanted: &str| {
            plan.ops.iter().find_map(|op| match op {
                DrawOp::Text { key, text, style, .. } if *key == wanted => Some((text.clone(), *style)),
                _ => None,
            })
        };
        assert_eq!(text_of("birthday").unwrap().0, "08/30/1975");
        assert_eq!(text_of("sign_date").unwrap().0, "02/01/2026");
        assert_eq!(text_of("sign_name").unwrap(), ("Maria Santos".to_string(), TextStyle::SIGNATURE));
        assert!(text_of("crop_high_txt").is_none());
    }

    #[test]
    fn signature_box_is_centered_on_its_point() {
        let layout = Layout::default_for(FormType::Crop);
        let plan = plan_page(&crop_record(), &layout, today());
        let (x, y, w, h) = plan
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Image { key: "signature_img", x, y, width, height, .. } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .unwrap();

        let point = layout.get("signature_img").unwrap().point();
        let (cx, cy) = to_page_units(point, FORM_PAGE);
        assert_eq!((w, h), (40.0, 15.0));
        assert!((x + w / 2.0 - cx).abs() < 1e-9);
        assert!((y + h / 2.0 - cy).abs() < 1e-9);
    }

    #[test]
    fn missing_and_empty_values_plan_identically() {
        let layout = Layout::default_for(FormType::Crop);
        for field in ["LastName", "Sex", "Signature"] {
            let mut omitted = crop_record();
            omitted.remove(field);
            let mut empty = crop_record();
            empty.set(field, "");

            let a = plan_page(&omitted, &layout, today());
            let b = plan_page(&empty, &layout, today());
            assert_eq!(a, b, "{field}");
            assert!(a.ops.len() < plan_page(&crop_record(), &layout, today()).ops.len());
        }
    }

    #[test]
    fn checkmarks_follow_record_values() {
        let layout = Layout::default_for(FormType::Crop);
        let plan = plan_page(&crop_record(), &layout, today());
        let checked: Vec<&str> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Check { key, .. } => Some(*key),
                _ => None,
            })
            .collect();
        assert_eq!(
            checked,
            vec!["sex_female", "consent_certify_check", "consent_privacy_check", "l1_meth_ds"]
        );
    }

    #[test]
    fn livestock_table_draws_only_present_rows() {
        let mut record = ApplicationRecord::new();
        record.set(
            "Animals",
            r#"[{"Class":"Breeder","Tag":"A-1","DOB":"2024-01-02"},{"Class":"Fattener"}]"#,
        );
        let layout = Layout::default_for(FormType::Livestock);
        let plan = plan_page(&record, &layout, today());
        let table: Vec<&str> = keys(&plan).into_iter().filter(|k| k.starts_with("ls_")).collect();
        assert_eq!(table, vec!["ls_class_1", "ls_tag_1", "ls_dob_1", "ls_class_2"]);
    }

    #[test]
    fn paint_produces_a_pdf() {
        let layout = Layout::default_for(FormType::Crop);
        let plan = plan_page(&crop_record(), &layout, today());
        let template = blank_template(FORM_PAGE).unwrap();
        let bytes = paint(&plan, &template).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn bad_field_image_does_not_abort_page() {
        let mut record = crop_record();
        record.set("Signature", "data:image/png;base64,bm90IGFuIGltYWdl");
        record.set("Photo", "%%%");
        let layout = Layout::default_for(FormType::Crop);
        let plan = plan_page(&record, &layout, today());
        let template = blank_template(FORM_PAGE).unwrap();
        assert!(paint(&plan, &template).is_ok());
    }

    #[test]
    fn undecodable_template_fails_page() {
        let layout = Layout::default_for(FormType::Adss);
        let plan = plan_page(&ApplicationRecord::new(), &layout, today());
        assert!(matches!(paint(&plan, b"not an image"), Err(AppError::TemplateError(_))));
    }

    #[test]
    fn fallback_template_is_persisted() {
        let mut store = LayoutStore::new(MemoryStore::new());
        assert!(store.get_template(FormType::Banca).unwrap().is_none());

        let page = render_to_page(&crop_record(), FormType::Banca, &mut store, today()).unwrap();
        assert!(page.bytes.starts_with(b"%PDF"));
        assert_eq!(page.file_name, "Santos_Maria_Banca_UnknownType_UnknownClass_2026-02.pdf");
        assert!(store.get_template(FormType::Banca).unwrap().is_some());
    }

    #[test]
    fn offline_store_still_renders_with_defaults() {
        let mut store = LayoutStore::new(MemoryStore::unavailable());
        let page = render_to_page(&crop_record(), FormType::Crop, &mut store, today()).unwrap();
        assert!(page.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn corrupt_stored_template_fails_page() {
        let mut kv = MemoryStore::new();
        kv.put("pdf_template", "%%%").unwrap();
        let mut store = LayoutStore::new(kv);
        let result = render_to_page(&crop_record(), FormType::Crop, &mut store, today());
        assert!(matches!(result, Err(AppError::TemplateError(_))));
        // the bad template is left for the operator to replace
        assert_eq!(store.backend().get("pdf_template").unwrap(), Some("%%%".to_string()));
    }

    #[test]
    fn directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"));
        let path = sink.save("page.pdf", b"%PDF-1.3").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"%PDF-1.3");
    }
}
