// ABOUTME: Minimal PDF 1.4 writer for single-column text documents
// ABOUTME: WinAnsi-encoded Helvetica text with wrapping and page breaks, plus RGB images
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Text-flow PDF writer.
//!
//! Produces US Letter pages with the two standard Helvetica faces. Widths
//! are approximated from the font's average glyph width, which is enough
//! for wrapping and centering plain business documents. Text is encoded as
//! WinAnsi (Latin-1 plus the typographic punctuation in 0x80-0x9F); other
//! characters print as `?`. Raster images are embedded as uncompressed
//! 8-bit RGB XObjects.

use std::fmt::Write as _;

use image::{ImageError, RgbaImage};

/// US Letter width in points
const PAGE_WIDTH: f64 = 612.0;
/// US Letter height in points
const PAGE_HEIGHT: f64 = 792.0;
/// Margin on every side
const MARGIN: f64 = 54.0;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f64 = 0.5;
/// Line height as a multiple of the font size
const LINE_SPACING: f64 = 1.5;

/// Standard Type 1 face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
}

impl Font {
    const fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Horizontal placement of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Flush with the left margin
    Left,
    /// Centered between the margins
    Center,
}

/// Decoded raster image ready for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl PdfImage {
    /// Decode a PNG or JPEG; transparency is flattened onto white
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the bytes are not a supported image
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_rgba(&rgba))
    }

    fn from_rgba(rgba: &RgbaImage) -> Self {
        let mut rgb = Vec::with_capacity(rgba.as_raw().len() / 4 * 3);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = u16::from(a);
            for channel in [r, g, b] {
                let blended = (u16::from(channel) * alpha + 255 * (255 - alpha)) / 255;
                rgb.push(u8::try_from(blended).unwrap_or(u8::MAX));
            }
        }
        Self {
            width: rgba.width(),
            height: rgba.height(),
            rgb,
        }
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, Clone)]
enum Placed {
    Text {
        x: f64,
        y: f64,
        font: Font,
        size: f64,
        text: String,
    },
    Image {
        index: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Incrementally laid-out PDF document
#[derive(Debug, Clone)]
pub struct PdfWriter {
    pages: Vec<Vec<Placed>>,
    images: Vec<PdfImage>,
    cursor_y: f64,
    font: Font,
    size: f64,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    /// Start a document with one empty page, 12pt Helvetica
    #[must_use]
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            images: Vec::new(),
            cursor_y: PAGE_HEIGHT - MARGIN,
            font: Font::Regular,
            size: 12.0,
        }
    }

    /// Change the current font
    pub fn set_font(&mut self, font: Font, size: f64) -> &mut Self {
        self.font = font;
        self.size = size;
        self
    }

    /// Number of pages laid out so far
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn line_height(&self) -> f64 {
        self.size * LINE_SPACING
    }

    fn max_chars(&self) -> usize {
        let usable = PAGE_WIDTH - 2.0 * MARGIN;
        let count = (usable / (self.size * AVG_GLYPH_WIDTH)).floor() as usize;
        count.max(1)
    }

    fn ensure_room(&mut self, height: f64) {
        if self.cursor_y - height < MARGIN {
            self.pages.push(Vec::new());
            self.cursor_y = PAGE_HEIGHT - MARGIN;
        }
    }

    /// Advance the cursor by `points`, breaking the page if needed
    pub fn space(&mut self, points: f64) -> &mut Self {
        if self.cursor_y - points < MARGIN {
            self.ensure_room(f64::INFINITY);
        } else {
            self.cursor_y -= points;
        }
        self
    }

    /// Write text, wrapping at word boundaries and honoring embedded newlines
    pub fn text(&mut self, text: &str, align: Align) -> &mut Self {
        let max_chars = self.max_chars();
        for paragraph in text.split('\n') {
            let lines = wrap(paragraph, max_chars);
            if lines.is_empty() {
                self.space(self.line_height());
            }
            for line in lines {
                self.place(line, align);
            }
        }
        self
    }

    /// Write text at the left margin
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.text(text, Align::Left)
    }

    /// Write two short texts side by side in half-width columns
    pub fn columns(&mut self, left: &str, right: &str) -> &mut Self {
        let height = self.line_height();
        self.ensure_room(height);
        self.cursor_y -= height;
        let column_x = MARGIN + (PAGE_WIDTH - 2.0 * MARGIN) / 2.0;
        let y = self.cursor_y;
        let (font, size) = (self.font, self.size);
        if let Some(page) = self.pages.last_mut() {
            page.push(Placed::Text {
                x: MARGIN,
                y,
                font,
                size,
                text: left.to_owned(),
            });
            page.push(Placed::Text {
                x: column_x,
                y,
                font,
                size,
                text: right.to_owned(),
            });
        }
        self
    }

    fn place(&mut self, text: String, align: Align) {
        let height = self.line_height();
        self.ensure_room(height);
        self.cursor_y -= height;
        let x = match align {
            Align::Left => MARGIN,
            Align::Center => {
                let width = text.chars().count() as f64 * self.size * AVG_GLYPH_WIDTH;
                ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
            }
        };
        let placed = Placed::Text {
            x,
            y: self.cursor_y,
            font: self.font,
            size: self.size,
            text,
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(placed);
        }
    }

    /// Draw an image at the left margin, scaled to `width` points
    pub fn image(&mut self, image: &PdfImage, width: f64) -> &mut Self {
        if image.width == 0 || image.height == 0 {
            return self;
        }
        let width = width.min(PAGE_WIDTH - 2.0 * MARGIN);
        let height = width * f64::from(image.height) / f64::from(image.width);
        self.ensure_room(height);
        self.cursor_y -= height;

        let index = self.images.len();
        self.images.push(image.clone());
        let placed = Placed::Image {
            index,
            x: MARGIN,
            y: self.cursor_y,
            width,
            height,
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(placed);
        }
        self
    }

    /// Serialize the document
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        // Object layout: 1 catalog, 2 page tree, 3-4 fonts, one object per
        // image, then (page, content) pairs
        let first_image = 5;
        let first_page = first_image + self.images.len();
        let page_ids: Vec<usize> = (0..self.pages.len())
            .map(|i| first_page + i * 2)
            .collect();

        let mut objects: Vec<Vec<u8>> =
            Vec::with_capacity(first_page - 1 + self.pages.len() * 2);
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(
            format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                self.pages.len()
            )
            .into_bytes(),
        );
        objects.push(
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        );
        objects.push(
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        );

        for image in &self.images {
            let mut object = format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Length {} >>\nstream\n",
                image.width,
                image.height,
                image.rgb.len()
            )
            .into_bytes();
            object.extend_from_slice(&image.rgb);
            object.extend_from_slice(b"\nendstream");
            objects.push(object);
        }

        let xobjects = if self.images.is_empty() {
            String::new()
        } else {
            let entries = (0..self.images.len())
                .map(|i| format!("/Im{} {} 0 R", i + 1, first_image + i))
                .collect::<Vec<_>>()
                .join(" ");
            format!(" /XObject << {entries} >>")
        };

        for (page, page_id) in self.pages.iter().zip(&page_ids) {
            let content_id = page_id + 1;
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >>{xobjects} >> \
                     /Contents {content_id} 0 R >>"
                )
                .into_bytes(),
            );
            let stream = content_stream(page);
            objects.push(
                format!(
                    "<< /Length {} >>\nstream\n{stream}\nendstream",
                    stream.len()
                )
                .into_bytes(),
            );
        }

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        let mut trailer = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in &offsets {
            let _ = writeln!(trailer, "{offset:010} 00000 n ");
        }
        let _ = write!(
            trailer,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        );
        out.extend_from_slice(trailer.as_bytes());
        out
    }
}

fn content_stream(page: &[Placed]) -> String {
    let mut stream = String::new();
    for item in page {
        match item {
            Placed::Text {
                x,
                y,
                font,
                size,
                text,
            } => {
                let _ = writeln!(
                    stream,
                    "BT /{} {size:.1} Tf {x:.2} {y:.2} Td ({}) Tj ET",
                    font.resource(),
                    escape_text(text)
                );
            }
            Placed::Image {
                index,
                x,
                y,
                width,
                height,
            } => {
                let _ = writeln!(
                    stream,
                    "q {width:.2} 0 0 {height:.2} {x:.2} {y:.2} cm /Im{} Do Q",
                    index + 1
                );
            }
        }
    }
    stream
}

/// WinAnsiEncoding byte for a character, if the encoding has one
fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => return u8::try_from(u32::from(c)).ok(),
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

/// Escape a PDF literal string
///
/// Bytes above 0x7E are written as octal escapes so the content stream
/// stays ASCII; characters outside WinAnsi become `?`.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\t' => escaped.push(' '),
            _ => match win_ansi_byte(c) {
                Some(byte) if byte.is_ascii() => escaped.push(char::from(byte)),
                Some(byte) => {
                    let _ = write!(escaped, "\\{byte:03o}");
                }
                None => escaped.push('?'),
            },
        }
    }
    escaped
}

/// Greedy word wrap; words longer than a line are split
fn wrap(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|line| line.chars().count() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
        assert_eq!(wrap("abcdefghij12", 5), vec!["abcde", "fghij", "12"]);
        assert!(wrap("   ", 5).is_empty());
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(r"a(b)\c"), r"a\(b\)\\c");
        assert_eq!(escape_text("Café"), r"Caf\351");
        assert_eq!(escape_text("Señora"), r"Se\361ora");
        assert_eq!(escape_text("\u{2019}s \u{20ac}5"), r"\222s \2005");
        assert_eq!(escape_text("\u{4e2d}\u{1f600}"), "??");
        assert_eq!(escape_text("a\tb"), "a b");
    }

    #[test]
    fn test_accented_text_is_win_ansi_encoded() {
        let mut pdf = PdfWriter::new();
        pdf.set_font(Font::Bold, 16.0)
            .text("Café Señora Cleaning", Align::Center);
        let text = String::from_utf8(pdf.finish()).unwrap();
        assert!(text.contains(r"(Caf\351 Se\361ora Cleaning) Tj"));
        assert!(!text.contains("Caf?"));
    }

    #[test]
    fn test_transparency_flattens_onto_white() {
        let rgba = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgba([0, 0, 0, 0])
            } else {
                image::Rgba([10, 20, 30, 255])
            }
        });
        let image = PdfImage::from_rgba(&rgba);
        assert_eq!((image.width(), image.height()), (2, 1));
        assert_eq!(image.rgb, vec![255, 255, 255, 10, 20, 30]);
    }

    #[test]
    fn test_image_is_embedded_as_xobject() {
        let image = PdfImage::from_rgba(&RgbaImage::from_pixel(
            4,
            2,
            image::Rgba([0, 0, 0, 255]),
        ));
        let mut pdf = PdfWriter::new();
        pdf.line("above").image(&image, 120.0).line("below");
        let bytes = pdf.finish();

        assert!(find(&bytes, b"/Subtype /Image /Width 4 /Height 2").is_some());
        assert!(find(&bytes, b"/XObject << /Im1 5 0 R >>").is_some());
        assert!(find(&bytes, b"q 120.00 0 0 60.00 54.00").is_some());
        assert!(find(&bytes, b"/Im1 Do Q").is_some());
        assert!(find(&bytes, b"/Count 1").is_some());

        // xref entries still point at their objects with binary data present
        let xref_start = find(&bytes, b"xref\n").unwrap();
        let table = String::from_utf8(bytes[xref_start..].to_vec()).unwrap();
        let entries: Vec<usize> = table
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 7);
        for (index, offset) in entries.iter().enumerate() {
            assert!(bytes[*offset..].starts_with(format!("{} 0 obj", index + 1).as_bytes()));
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(PdfImage::decode(b"not an image").is_err());
    }

    #[test]
    fn test_document_structure() {
        let mut pdf = PdfWriter::new();
        pdf.set_font(Font::Bold, 16.0)
            .text("Sparkle Co", Align::Center);
        pdf.set_font(Font::Regular, 12.0).line("Total: $10.00");
        let bytes = pdf.finish();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("(Sparkle Co) Tj"));
        assert!(text.contains("/F2 16.0 Tf"));
        assert!(text.contains("/Count 1"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut pdf = PdfWriter::new();
        pdf.line("hello");
        let text = String::from_utf8(pdf.finish()).unwrap();

        let xref_start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (index, offset) in entries.iter().enumerate() {
            assert!(text[*offset..].starts_with(&format!("{} 0 obj", index + 1)));
        }
    }

    #[test]
    fn test_long_text_breaks_pages() {
        let mut pdf = PdfWriter::new();
        for i in 0..80 {
            pdf.line(&format!("line {i}"));
        }
        assert!(pdf.page_count() >= 2);
        let text = String::from_utf8(pdf.finish()).unwrap();
        assert!(text.contains(&format!("/Count {}", pdf.page_count())));
    }
}
