//! Landscape summary report over many application records.

use std::collections::BTreeSet;
use std::ops::Range;

use chrono::NaiveDate;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::layout::PageSize;
use crate::record::{format_date_display, ApplicationRecord};

// ============================================================================
// Constants
// ============================================================================

const PAGE: PageSize = PageSize::A4_LANDSCAPE;

const MARGIN_MM: f32 = 10.0;

/// Distances from the top edge, in mm
const TITLE_Y_MM: f32 = 15.0;
const CIC_Y_MM: f32 = 20.0;
const TOTALS_Y_MM: f32 = 25.0;
const FIRST_TABLE_TOP_MM: f32 = 28.0;
const TABLE_TOP_MM: f32 = 15.0;
const TABLE_BOTTOM_MM: f32 = 190.0;
const FOOTER_Y_MM: f32 = 200.0;

const HEADER_ROW_HEIGHT_MM: f32 = 7.0;
const ROW_HEIGHT_MM: f32 = 6.0;

const TITLE_FONT_SIZE: f32 = 14.0;
const CIC_FONT_SIZE: f32 = 10.0;
const TOTALS_FONT_SIZE: f32 = 9.0;
const TABLE_FONT_SIZE: f32 = 7.0;
const FOOTER_FONT_SIZE: f32 = 8.0;

const PT_TO_MM: f32 = 0.3528;

/// Average Helvetica advance as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

const HEADER_FILL: (u8, u8, u8) = (27, 94, 32);

const COLUMNS: [(&str, f32); 12] = [
    ("#", 8.0),
    ("ID", 24.0),
    ("Name", 40.0),
    ("Farm ID", 22.0),
    ("Georef", 24.0),
    ("Address", 52.0),
    ("Line", 16.0),
    ("Commodity", 20.0),
    ("Area", 14.0),
    ("Premium", 18.0),
    ("Amount Cover", 22.0),
    ("App. Date", 17.0),
];

// ============================================================================
// Data Structures
// ============================================================================

/// Which records go into the report and who signs it.
#[derive(Debug, Clone, Default)]
pub struct SummaryRequest {
    pub agent: String,
    pub cic: Option<String>,
    /// `None` keeps every commodity
    pub crop: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SummaryRequest {
    /// `ALL` (any case) or an empty value means no commodity filter.
    pub fn crop_filter(value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn matches(&self, record: &ApplicationRecord) -> bool {
        if let Some(crop) = &self.crop {
            let commodity = record.text("CropType").unwrap_or_default();
            if !commodity.eq_ignore_ascii_case(crop) {
                return false;
            }
        }
        let planted: String = record
            .text("Planting")
            .unwrap_or_default()
            .chars()
            .take(10)
            .collect();
        if let Some(from) = self.from {
            if planted < from.format("%Y-%m-%d").to_string() {
                return false;
            }
        }
        if let Some(to) = self.to {
            if planted > to.format("%Y-%m-%d").to_string() {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub unique_farmers: usize,
    pub farms: usize,
    pub area: f64,
    pub amount_cover: f64,
}

#[derive(Debug, Clone)]
pub struct Summary {
    agent: String,
    cic: String,
    crop: String,
    date: NaiveDate,
    rows: Vec<[String; 12]>,
    totals: Totals,
}

impl Summary {
    pub fn build(records: &[ApplicationRecord], request: &SummaryRequest, today: NaiveDate) -> Result<Self> {
        let agent = request.agent.trim();
        if agent.is_empty() {
            return Err(AppError::SummaryError("agent name is required".to_string()));
        }

        let selected: Vec<&ApplicationRecord> = records.iter().filter(|r| request.matches(r)).collect();
        if selected.is_empty() {
            return Err(AppError::SummaryError(
                "No records found for the selected criteria".to_string(),
            ));
        }
        debug!(total = records.len(), selected = selected.len(), "summary records filtered");

        let farmers: BTreeSet<Option<String>> = selected.iter().map(|r| r.text("FarmersID")).collect();
        let totals = Totals {
            unique_farmers: farmers.len(),
            farms: selected.len(),
            area: selected.iter().filter_map(|r| leading_number(r, "Area")).sum(),
            amount_cover: selected.iter().filter_map(|r| leading_number(r, "AmountCover")).sum(),
        };

        let rows = selected
            .iter()
            .enumerate()
            .map(|(i, r)| summary_row(i + 1, r))
            .collect();

        Ok(Summary {
            agent: agent.to_string(),
            cic: request
                .cic
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or("NA")
                .to_string(),
            crop: request.crop.clone().unwrap_or_else(|| "ALL".to_string()),
            date: today,
            rows,
            totals,
        })
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn rows(&self) -> &[[String; 12]] {
        &self.rows
    }

    pub fn file_name(&self) -> String {
        let name = format!(
            "SUMMARY_{}_{}_{}_{}.pdf",
            self.crop,
            self.rows.len(),
            self.date.format("%Y-%m-%d"),
            self.cic
        );
        name.replace(['/', '\\'], "-")
    }

    pub fn totals_line(&self) -> String {
        format!(
            "Total Unique Farmers: {} | Total Farms: {} | Total Area: {:.2} ha | Total Amount Cover: PHP {}",
            self.totals.unique_farmers,
            self.totals.farms,
            self.totals.area,
            group_thousands(self.totals.amount_cover)
        )
    }

    /// Draws the report and returns the PDF bytes.
    pub fn render(&self) -> Result<Vec<u8>> {
        let page_width = PAGE.width as f32;
        let page_height = PAGE.height as f32;
        let pages = paginate(self.rows.len());

        let (doc, page1, layer1) = PdfDocument::new(
            "Application Summary",
            Mm(page_width),
            Mm(page_height),
            "Layer 1",
        );

        let font_regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::PdfError(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        for (index, range) in pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(page1).get_layer(layer1)
            } else {
                let (page, layer) = doc.add_page(Mm(page_width), Mm(page_height), "Layer 1");
                doc.get_page(page).get_layer(layer)
            };

            let mut top = TABLE_TOP_MM;
            if index == 0 {
                self.draw_heading(&layer, &font_regular, &font_bold);
                top = FIRST_TABLE_TOP_MM;
            }

            draw_header_row(&layer, &font_bold, page_height - top);
            let mut y = page_height - top - HEADER_ROW_HEIGHT_MM;
            for row in &self.rows[range.clone()] {
                draw_row(&layer, &font_regular, y, row);
                y -= ROW_HEIGHT_MM;
            }

            self.draw_footer(&layer, &font_regular, index + 1, pages.len());
        }

        doc.save_to_bytes()
            .map_err(|e| AppError::PdfError(e.to_string()))
    }

    fn draw_heading(&self, layer: &PdfLayerReference, font_regular: &IndirectFontRef, font_bold: &IndirectFontRef) {
        let page_height = PAGE.height as f32;
        let center = PAGE.width as f32 / 2.0;

        let title = "Application Summary";
        layer.use_text(
            title,
            TITLE_FONT_SIZE,
            Mm(center - text_width(title, TITLE_FONT_SIZE) / 2.0),
            Mm(page_height - TITLE_Y_MM),
            font_bold,
        );

        let cic = format!("CIC: {}", self.cic);
        layer.use_text(
            &cic,
            CIC_FONT_SIZE,
            Mm(center - text_width(&cic, CIC_FONT_SIZE) / 2.0),
            Mm(page_height - CIC_Y_MM),
            font_regular,
        );

        let totals = self.totals_line();
        layer.use_text(
            &totals,
            TOTALS_FONT_SIZE,
            Mm(center - text_width(&totals, TOTALS_FONT_SIZE) / 2.0),
            Mm(page_height - TOTALS_Y_MM),
            font_regular,
        );
    }

    fn draw_footer(&self, layer: &PdfLayerReference, font: &IndirectFontRef, page: usize, pages: usize) {
        let y = Mm(PAGE.height as f32 - FOOTER_Y_MM);
        let right_edge = PAGE.width as f32 - MARGIN_MM;
        let center = PAGE.width as f32 / 2.0;

        layer.use_text(format_date_display(&self.date), FOOTER_FONT_SIZE, Mm(MARGIN_MM), y, font);

        let prepared = format!("Prepared by: {}", self.agent);
        layer.use_text(
            &prepared,
            FOOTER_FONT_SIZE,
            Mm(center - text_width(&prepared, FOOTER_FONT_SIZE) / 2.0),
            y,
            font,
        );

        let numbering = format!("Page {} of {}", page, pages);
        layer.use_text(
            &numbering,
            FOOTER_FONT_SIZE,
            Mm(right_edge - text_width(&numbering, FOOTER_FONT_SIZE)),
            y,
            font,
        );
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn summary_row(number: usize, record: &ApplicationRecord) -> [String; 12] {
    let text = |key: &str| record.text(key).unwrap_or_default();

    let name = format!("{}, {} {}", text("LastName"), text("FirstName"), text("MiddlName"))
        .trim()
        .to_string();
    let address = ["Sitio", "BrgyFarm", "MunFarm", "ProvFarm"]
        .iter()
        .filter_map(|k| record.text(k))
        .collect::<Vec<_>>()
        .join(", ");
    let applied: String = text("timestamp").chars().take(10).collect();

    [
        number.to_string(),
        text("FarmersID"),
        name,
        text("FarmID"),
        text("Georef"),
        address,
        text("InsuranceLine"),
        text("CropType"),
        text("Area"),
        text("premium"),
        text("AmountCover"),
        applied,
    ]
}

/// Numeric prefix of a field, so `"1.5 ha"` counts as 1.5.
fn leading_number(record: &ApplicationRecord, key: &str) -> Option<f64> {
    let raw = record.text(key)?;
    let raw = raw.trim();
    let mut end = 0;
    for (i, c) in raw.char_indices() {
        let sign = i == 0 && (c == '-' || c == '+');
        if c.is_ascii_digit() || c == '.' || sign {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    raw[..end].parse().ok()
}

/// `1234567.891` becomes `1,234,567.89`.
pub fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Row ranges for each page; the first page gives room to the heading.
fn paginate(rows: usize) -> Vec<Range<usize>> {
    let per_page = |top: f32| ((TABLE_BOTTOM_MM - top - HEADER_ROW_HEIGHT_MM) / ROW_HEIGHT_MM).floor() as usize;
    let first = per_page(FIRST_TABLE_TOP_MM);
    let rest = per_page(TABLE_TOP_MM);

    let mut pages = vec![0..rows.min(first)];
    let mut start = rows.min(first);
    while start < rows {
        let end = (start + rest).min(rows);
        pages.push(start..end);
        start = end;
    }
    pages
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * PT_TO_MM
}

/// Shortens `text` so it stays inside a column of `width` mm.
fn fit_text(text: &str, width: f32, size: f32) -> String {
    let available = width - 2.0;
    if text_width(text, size) <= available {
        return text.to_string();
    }
    let max_chars = (available / (size * AVG_GLYPH_WIDTH * PT_TO_MM)).floor() as usize;
    let kept: String = text.chars().take(max_chars.saturating_sub(2)).collect();
    format!("{}..", kept)
}

// ============================================================================
// Table Drawing
// ============================================================================

fn draw_header_row(layer: &PdfLayerReference, font_bold: &IndirectFontRef, top: f32) {
    let left = MARGIN_MM;
    let right = PAGE.width as f32 - MARGIN_MM;
    let bottom = top - HEADER_ROW_HEIGHT_MM;

    let (r, g, b) = HEADER_FILL;
    layer.set_fill_color(Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    )));
    let points = vec![
        (Point::new(Mm(left), Mm(bottom)), false),
        (Point::new(Mm(right), Mm(bottom)), false),
        (Point::new(Mm(right), Mm(top)), false),
        (Point::new(Mm(left), Mm(top)), false),
    ];
    layer.add_polygon(Polygon {
        rings: vec![points],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });

    layer.set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
    let text_y = top - HEADER_ROW_HEIGHT_MM / 2.0 - 1.0;
    let mut x = left;
    for (title, width) in COLUMNS {
        layer.use_text(
            fit_text(title, width, TABLE_FONT_SIZE),
            TABLE_FONT_SIZE,
            Mm(x + 1.0),
            Mm(text_y),
            font_bold,
        );
        x += width;
    }
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
}

fn draw_row(layer: &PdfLayerReference, font_regular: &IndirectFontRef, top: f32, cells: &[String; 12]) {
    let text_y = top - ROW_HEIGHT_MM / 2.0 - 1.0;
    let mut x = MARGIN_MM;
    for (cell, (_, width)) in cells.iter().zip(COLUMNS) {
        if !cell.is_empty() {
            layer.use_text(
                fit_text(cell, width, TABLE_FONT_SIZE),
                TABLE_FONT_SIZE,
                Mm(x + 1.0),
                Mm(text_y),
                font_regular,
            );
        }
        x += width;
    }

    let line_color = Color::Rgb(Rgb::new(0.8, 0.8, 0.8, None));
    layer.set_outline_color(line_color);
    layer.set_outline_thickness(0.3);
    let bottom = top - ROW_HEIGHT_MM;
    draw_line(layer, MARGIN_MM, bottom, PAGE.width as f32 - MARGIN_MM, bottom);
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x2), Mm(y2)), false),
    ];
    let line = Line {
        points,
        is_closed: false,
    };
    layer.add_line(line);
}
