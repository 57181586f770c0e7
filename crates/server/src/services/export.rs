//! PDF export of a user's series list.

use std::io::Cursor;

use futures::future::join_all;
use printpdf::image_crate::codecs::jpeg::JpegDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point,
};
use reqwest::Client;
use thiserror::Error;

use crate::models::SeriesRecord;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const ENTRIES_PER_PAGE: usize = 4;

const COVER_WIDTH: f32 = 40.0;
/// Keeps four entries on one A4 page.
const COVER_MAX_HEIGHT: f32 = 45.0;
/// Vertical space reserved when an entry has no cover.
const COVER_PLACEHOLDER_HEIGHT: f32 = 20.0;
const TEXT_GAP: f32 = 6.0;

const DOCUMENT_TITLE: &str = "My Series List";
const CONTINUED_TITLE: &str = "My Series List (continued)";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to render PDF: {0}")]
    Render(String),
    #[error("PDF rendering task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One list entry with its cover image bytes, if they could be fetched.
pub struct ExportEntry {
    pub record: SeriesRecord,
    pub cover: Option<Vec<u8>>,
}

pub struct PdfExporter {
    client: Client,
}

impl PdfExporter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch covers and render the list. Rendering runs on a blocking thread.
    pub async fn export(&self, series: Vec<SeriesRecord>) -> Result<Vec<u8>, ExportError> {
        let covers = join_all(series.iter().map(|s| self.fetch_cover(s.cover_url.as_deref()))).await;
        let entries: Vec<ExportEntry> = series
            .into_iter()
            .zip(covers)
            .map(|(record, cover)| ExportEntry { record, cover })
            .collect();

        tokio::task::spawn_blocking(move || render_document(&entries)).await?
    }

    async fn fetch_cover(&self, url: Option<&str>) -> Option<Vec<u8>> {
        let url = url?;
        let response = match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!("Cover {} responded with {}", url, response.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("Failed to fetch cover {}: {}", url, e);
                return None;
            }
        };

        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                tracing::debug!("Failed to read cover {}: {}", url, e);
                None
            }
        }
    }
}

/// Number of pages a list of `entries` occupies.
pub fn page_count(entries: usize) -> usize {
    entries.div_ceil(ENTRIES_PER_PAGE).max(1)
}

/// Entries of each page in order; an empty list still yields one empty page.
fn page_chunks(entries: &[ExportEntry]) -> impl Iterator<Item = &[ExportEntry]> + '_ {
    (0..page_count(entries.len())).map(move |page| {
        let start = (page * ENTRIES_PER_PAGE).min(entries.len());
        let end = (start + ENTRIES_PER_PAGE).min(entries.len());
        &entries[start..end]
    })
}

/// Lay out the list on A4 pages, four entries per page.
pub fn render_document(entries: &[ExportEntry]) -> Result<Vec<u8>, ExportError> {
    let render_err = |e: printpdf::Error| ExportError::Render(format!("{:?}", e));

    let (doc, first_page, first_layer) =
        PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_err)?,
    };

    for (page, chunk) in page_chunks(entries).enumerate() {
        let (layer, title) = if page == 0 {
            (doc.get_page(first_page).get_layer(first_layer), DOCUMENT_TITLE)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            (doc.get_page(page).get_layer(layer), CONTINUED_TITLE)
        };

        let mut cursor = draw_header(&layer, &fonts, title);
        for entry in chunk {
            cursor = draw_entry(&layer, &fonts, entry, cursor);
        }
    }

    doc.save_to_bytes().map_err(render_err)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// printpdf places text by baseline from the bottom edge; layout here is
/// measured in millimetres from the top edge.
fn from_top(top: f32) -> Mm {
    Mm(PAGE_HEIGHT - top)
}

/// Returns the top offset where the first entry starts.
fn draw_header(layer: &PdfLayerReference, fonts: &Fonts, title: &str) -> f32 {
    layer.use_text(title, 20.0, Mm(MARGIN), from_top(MARGIN + 7.0), &fonts.bold);
    MARGIN + 15.0
}

/// Draws one entry starting at `top` and returns the top of the next one.
fn draw_entry(layer: &PdfLayerReference, fonts: &Fonts, entry: &ExportEntry, top: f32) -> f32 {
    let record = &entry.record;

    let cover_height = entry
        .cover
        .as_deref()
        .and_then(|bytes| draw_cover(layer, bytes, top))
        .unwrap_or(COVER_PLACEHOLDER_HEIGHT);

    let text_x = Mm(MARGIN + COVER_WIDTH + TEXT_GAP);
    let heading = format!("{} ({})", record.title, record.year);
    layer.use_text(pdf_text(&heading), 14.0, text_x, from_top(top + 5.0), &fonts.bold);

    let status = format!(
        "Status: {} – {}/{} episodes",
        record.status, record.episodes_watched, record.total_episodes
    );
    layer.use_text(pdf_text(&status), 12.0, text_x, from_top(top + 12.5), &fonts.regular);

    let text_bottom = top + 14.0;
    let separator = text_bottom.max(top + cover_height) + 10.0;

    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), from_top(separator)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), from_top(separator)), false),
        ],
        is_closed: false,
    });

    separator + 8.0
}

/// Place a JPEG cover at the left margin. Returns its rendered height, or
/// `None` if the bytes are not a decodable JPEG.
fn draw_cover(layer: &PdfLayerReference, bytes: &[u8], top: f32) -> Option<f32> {
    let decoder = match JpegDecoder::new(Cursor::new(bytes)) {
        Ok(decoder) => decoder,
        Err(e) => {
            tracing::debug!("Skipping cover that is not a JPEG: {}", e);
            return None;
        }
    };
    let image = match Image::try_from(decoder) {
        Ok(image) => image,
        Err(e) => {
            tracing::debug!("Skipping undecodable cover: {}", e);
            return None;
        }
    };

    let width_px = image.image.width.0 as f32;
    let height_px = image.image.height.0 as f32;
    if width_px <= 0.0 || height_px <= 0.0 {
        return None;
    }

    let (width, height) = fit_cover(width_px, height_px);
    // At this dpi one pixel maps to exactly width / width_px millimetres.
    let dpi = width_px * 25.4 / width;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(from_top(top + height)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    Some(height)
}

/// Cover size in millimetres: 40 mm wide with preserved aspect ratio,
/// shrunk to the maximum height when needed.
fn fit_cover(width_px: f32, height_px: f32) -> (f32, f32) {
    let height = height_px * COVER_WIDTH / width_px;
    if height <= COVER_MAX_HEIGHT {
        (COVER_WIDTH, height)
    } else {
        (width_px * COVER_MAX_HEIGHT / height_px, COVER_MAX_HEIGHT)
    }
}

/// Characters outside ASCII that WinAnsi maps into 0x80..=0x9F.
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Built-in PDF fonts are WinAnsi encoded; anything else becomes `?`.
fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c,
            _ if WIN_ANSI_EXTRAS.contains(c) => c,
            _ => '?',
        })
        .collect()
}
