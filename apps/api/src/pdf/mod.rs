//! Text-only PDF writer used for downloadable reports.
//!
//! Documents are built from a list of [`Block`]s laid out top to bottom on A4 pages,
//! wrapping and paginating as needed. Text uses the non-embedded `HYGoThic-Medium`
//! CID font with the `UniKS-UCS2-H` encoding, so Korean renders in any viewer that
//! ships the Adobe Korean font pack, and strings are written as UCS-2 hex.

pub mod metrics;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;

use crate::pdf::metrics::{measure_em, wrap_text};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const TEXT_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;

const TITLE_SIZE: i64 = 22;
const HEADING_SIZE: i64 = 15;
const BODY_SIZE: i64 = 11;
const TABLE_LABEL_WIDTH: i64 = 150;
const TABLE_PADDING: i64 = 6;

const FONT_KEY: &str = "F1";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF encoding failed: {0}")]
    Encode(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One unit of report content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Large centred title.
    Title(String),
    Heading(String),
    Paragraph(String),
    /// Two-column label/value grid.
    Table(Vec<(String, String)>),
    /// Vertical gap in points.
    Spacer(i64),
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

fn leading(size: i64) -> i64 {
    size * 3 / 2
}

fn max_em(width: i64, size: i64) -> f32 {
    width as f32 / size as f32
}

/// Encodes text as big-endian UCS-2. Characters outside the BMP become `?`
/// and control characters become spaces.
pub fn encode_ucs2(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for c in text.chars() {
        let c = if c.is_control() { ' ' } else { c };
        let unit = u16::try_from(u32::from(c)).unwrap_or(u16::from(b'?'));
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

fn fill_rgb(r: f32, g: f32, b: f32) -> Operation {
    Operation::new(
        "rg",
        vec![Object::Real(r as _), Object::Real(g as _), Object::Real(b as _)],
    )
}

/// Lays blocks out onto pages, producing one content stream's operations per page.
struct PageLayout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    /// Baseline of the next line, measured from the bottom edge.
    y: i64,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Starts a new page unless `height` more points fit above the bottom margin.
    fn reserve(&mut self, height: i64) {
        if self.y - height < MARGIN && !self.current.is_empty() {
            self.new_page();
        }
    }

    fn text(&mut self, x: i64, y: i64, size: i64, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(FONT_KEY.into()), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_ucs2(text), StringFormat::Hexadecimal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn lines(&mut self, text: &str, size: i64, colour: (f32, f32, f32)) {
        let line_height = leading(size);
        self.current.push(fill_rgb(colour.0, colour.1, colour.2));
        for line in wrap_text(text, max_em(TEXT_WIDTH, size)) {
            self.reserve(line_height);
            self.y -= line_height;
            self.text(MARGIN, self.y, size, &line);
        }
        self.current.push(fill_rgb(0.0, 0.0, 0.0));
    }

    fn title(&mut self, text: &str) {
        let line_height = leading(TITLE_SIZE);
        self.current.push(fill_rgb(0.0, 0.0, 0.55));
        for line in wrap_text(text, max_em(TEXT_WIDTH, TITLE_SIZE)) {
            self.reserve(line_height);
            self.y -= line_height;
            let width = (measure_em(&line) * TITLE_SIZE as f32) as i64;
            let x = MARGIN + (TEXT_WIDTH - width).max(0) / 2;
            self.text(x, self.y, TITLE_SIZE, &line);
        }
        self.current.push(fill_rgb(0.0, 0.0, 0.0));
    }

    fn table(&mut self, rows: &[(String, String)]) {
        let line_height = leading(BODY_SIZE);
        let value_width = TEXT_WIDTH - TABLE_LABEL_WIDTH;

        for (label, value) in rows {
            let label_lines = wrap_text(label, max_em(TABLE_LABEL_WIDTH - 2 * TABLE_PADDING, BODY_SIZE));
            let value_lines = wrap_text(value, max_em(value_width - 2 * TABLE_PADDING, BODY_SIZE));
            let row_lines = label_lines.len().max(value_lines.len()) as i64;
            let row_height = row_lines * line_height + 2 * TABLE_PADDING;

            self.reserve(row_height);
            let top = self.y;
            let bottom = top - row_height;

            self.current.extend([
                Operation::new("q", vec![]),
                fill_rgb(0.9, 0.9, 0.9),
                Operation::new(
                    "re",
                    vec![MARGIN.into(), bottom.into(), TEXT_WIDTH.into(), row_height.into()],
                ),
                Operation::new("f", vec![]),
                Operation::new("w", vec![1.into()]),
                Operation::new(
                    "re",
                    vec![MARGIN.into(), bottom.into(), TABLE_LABEL_WIDTH.into(), row_height.into()],
                ),
                Operation::new(
                    "re",
                    vec![
                        (MARGIN + TABLE_LABEL_WIDTH).into(),
                        bottom.into(),
                        value_width.into(),
                        row_height.into(),
                    ],
                ),
                Operation::new("S", vec![]),
                Operation::new("Q", vec![]),
            ]);

            for (i, line) in label_lines.iter().enumerate() {
                let y = top - TABLE_PADDING - (i as i64 + 1) * line_height + BODY_SIZE / 2;
                self.text(MARGIN + TABLE_PADDING, y, BODY_SIZE, line);
            }
            for (i, line) in value_lines.iter().enumerate() {
                let y = top - TABLE_PADDING - (i as i64 + 1) * line_height + BODY_SIZE / 2;
                self.text(MARGIN + TABLE_LABEL_WIDTH + TABLE_PADDING, y, BODY_SIZE, line);
            }

            self.y = bottom;
        }
    }

    fn layout(mut self, blocks: &[Block]) -> Vec<Vec<Operation>> {
        for block in blocks {
            match block {
                Block::Title(text) => self.title(text),
                Block::Heading(text) => {
                    // keep a heading with at least one body line
                    self.reserve(leading(HEADING_SIZE) + leading(BODY_SIZE));
                    self.lines(text, HEADING_SIZE, (0.0, 0.0, 0.55));
                }
                Block::Paragraph(text) => self.lines(text, BODY_SIZE, (0.0, 0.0, 0.0)),
                Block::Table(rows) => self.table(rows),
                Block::Spacer(height) => {
                    if self.y - height < MARGIN {
                        self.new_page();
                    } else {
                        self.y -= height;
                    }
                }
            }
        }
        self.pages.push(self.current);
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document assembly
// ────────────────────────────────────────────────────────────────────────────

fn add_korean_font(doc: &mut Document) -> ObjectId {
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => "HYGoThic-Medium",
        "Flags" => 6,
        "FontBBox" => vec![(-6).into(), (-145).into(), 1003.into(), 880.into()],
        "ItalicAngle" => 0,
        "Ascent" => 880,
        "Descent" => -120,
        "CapHeight" => 880,
        "StemV" => 93,
    });

    let descendant_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType0",
        "BaseFont" => "HYGoThic-Medium",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Korea1"),
            "Supplement" => 1,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "W" => vec![1.into(), 95.into(), 500.into()],
    });

    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "HYGoThic-Medium",
        "Encoding" => "UniKS-UCS2-H",
        "DescendantFonts" => vec![descendant_id.into()],
    })
}

/// Renders blocks into a complete PDF file.
pub fn render(blocks: &[Block]) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = add_korean_font(&mut doc);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_KEY => font_id,
        },
    });

    let mut kids = Vec::new();
    for operations in PageLayout::new().layout(blocks) {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
