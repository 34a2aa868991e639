//! Document emitter: replays a draw-instruction sequence against printpdf
//! and writes the finished file.
//!
//! The layout space is PDF points with a top-left origin (what the upstream
//! apps were designed against); printpdf wants millimeters from the bottom
//! left, so every coordinate is converted here and nowhere else.
//!
//! Failure policy: a missing or undecodable cosmetic asset (logo, QR bytes)
//! skips that single instruction with a warning so the invoice still ships;
//! an unopenable sink or a backend failure is fatal.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color as PdfColor, ColorBits, ColorSpace, Image as PdfImage, ImageTransform,
    ImageXObject, IndirectFontRef, Line as PdfLine, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Px, Rect as PdfRect, Rgb,
};

use crate::core::config::{Color, PageGeometry, RenderConfig};
use crate::core::error::{RenderError, RenderResult};
use crate::invoice::text;
use crate::layout::{Align, DrawInstruction, FontId, ImageSource, Stroke};

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Render the instruction sequence and write it to `output_path` with
/// overwrite semantics. Returns only after the bytes are durably flushed;
/// there is no success signal before `sync_all` completes.
pub fn emit(
    instructions: &[DrawInstruction],
    output_path: &Path,
    config: &RenderConfig,
) -> RenderResult<()> {
    let bytes = render_to_bytes(instructions, config)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| RenderError::Sink {
                path: output_path.to_path_buf(),
                source: e,
            })?;
        }
    }
    let mut file = File::create(output_path).map_err(|e| RenderError::Sink {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Render the instruction sequence to an in-memory PDF, for the upload path.
pub fn render_to_bytes(
    instructions: &[DrawInstruction],
    config: &RenderConfig,
) -> RenderResult<Vec<u8>> {
    let page = &config.page;
    let (doc, page_idx, layer_idx) = PdfDocument::new(
        "invoice",
        Mm(page.width * PT_TO_MM),
        Mm(page.height * PT_TO_MM),
        "content",
    );
    let layer = doc.get_page(page_idx).get_layer(layer_idx);
    let fonts = load_fonts(&doc, config)?;

    for instruction in instructions {
        replay(&layer, &fonts, page, instruction);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Backend(e.to_string()))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, id: FontId) -> &IndirectFontRef {
        match id {
            FontId::Regular => &self.regular,
            FontId::Bold => &self.bold,
        }
    }
}

/// Load the configured brand font; fall back to the built-in Helvetica pair
/// when the file is missing so a lost asset never blocks invoice delivery.
fn load_fonts(doc: &PdfDocumentReference, config: &RenderConfig) -> RenderResult<Fonts> {
    match File::open(&config.font_path) {
        Ok(file) => match doc.add_external_font(file) {
            Ok(font) => {
                // One brand font family upstream; emphasis is size-based.
                return Ok(Fonts {
                    regular: font.clone(),
                    bold: font,
                });
            }
            Err(e) => {
                tracing::warn!(
                    font = %config.font_path.display(),
                    error = %e,
                    "failed to embed brand font, falling back to builtin"
                );
            }
        },
        Err(e) => {
            tracing::warn!(
                font = %config.font_path.display(),
                error = %e,
                "brand font not found, falling back to builtin"
            );
        }
    }

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Backend(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Backend(e.to_string()))?;
    Ok(Fonts { regular, bold })
}

fn replay(layer: &PdfLayerReference, fonts: &Fonts, page: &PageGeometry, instruction: &DrawInstruction) {
    match instruction {
        DrawInstruction::Text {
            content,
            x,
            y,
            width,
            align,
            font,
            size,
            color,
        } => {
            let shaped = text::shape(content);
            let draw_x = aligned_x(&shaped, *x, *width, *align, *size);
            // Layout y is the top of the text block; the baseline sits one
            // em below.
            let baseline = y + size;
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(
                shaped,
                *size,
                Mm(draw_x * PT_TO_MM),
                Mm((page.height - baseline) * PT_TO_MM),
                fonts.get(*font),
            );
        }
        DrawInstruction::Rect {
            x,
            y,
            w,
            h,
            fill,
            stroke,
        } => {
            let mode = match (fill, stroke) {
                (Some(_), Some(_)) => PaintMode::FillStroke,
                (Some(_), None) => PaintMode::Fill,
                (None, Some(_)) => PaintMode::Stroke,
                (None, None) => return,
            };
            if let Some(fill) = fill {
                layer.set_fill_color(pdf_color(*fill));
            }
            if let Some(Stroke { color, thickness }) = stroke {
                layer.set_outline_color(pdf_color(*color));
                layer.set_outline_thickness(*thickness);
            }
            let rect = PdfRect::new(
                Mm(x * PT_TO_MM),
                Mm((page.height - y - h) * PT_TO_MM),
                Mm((x + w) * PT_TO_MM),
                Mm((page.height - y) * PT_TO_MM),
            )
            .with_mode(mode);
            layer.add_rect(rect);
        }
        DrawInstruction::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            thickness,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*thickness);
            layer.add_line(PdfLine {
                points: vec![
                    (
                        Point::new(Mm(x1 * PT_TO_MM), Mm((page.height - y1) * PT_TO_MM)),
                        false,
                    ),
                    (
                        Point::new(Mm(x2 * PT_TO_MM), Mm((page.height - y2) * PT_TO_MM)),
                        false,
                    ),
                ],
                is_closed: false,
            });
        }
        DrawInstruction::Image { source, x, y, w, h } => {
            let decoded = match source {
                ImageSource::Png(bytes) => image::load_from_memory(bytes),
                ImageSource::File(path) => match image::open(path) {
                    Ok(img) => Ok(img),
                    Err(e) => {
                        tracing::warn!(
                            asset = %path.display(),
                            error = %e,
                            "image asset unavailable, skipping instruction"
                        );
                        return;
                    }
                },
            };
            let decoded = match decoded {
                Ok(img) => img,
                Err(e) => {
                    tracing::warn!(error = %e, "undecodable image bytes, skipping instruction");
                    return;
                }
            };

            place_image(layer, page, decoded, *x, *y, *w, *h);
        }
    }
}

fn place_image(
    layer: &PdfLayerReference,
    page: &PageGeometry,
    decoded: image::DynamicImage,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
) {
    let rgb = decoded.to_rgb8();
    let (px_w, px_h) = rgb.dimensions();
    if px_w == 0 || px_h == 0 {
        return;
    }

    let pdf_image = PdfImage::from(ImageXObject {
        width: Px(px_w as usize),
        height: Px(px_h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // The dpi alone sets the physical size: the bitmap fills the requested
    // width, height following the image's own aspect ratio.
    let target_w_mm = w * PT_TO_MM;
    let dpi = px_w as f32 / (target_w_mm / 25.4);

    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x * PT_TO_MM)),
            translate_y: Some(Mm((page.height - y - h) * PT_TO_MM)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

/// Approximate advance width: printpdf draws raw glyph runs and exposes no
/// metrics, so alignment works off an average glyph width. Half an em per
/// character tracks both the digit-heavy cells and the brand font closely
/// enough for a fixed-geometry page.
fn aligned_x(content: &str, x: f32, width: f32, align: Align, size: f32) -> f32 {
    let estimated = content.chars().count() as f32 * size * 0.5;
    match align {
        Align::Left => x,
        Align::Center => x + ((width - estimated) / 2.0).max(0.0),
        Align::Right => x + (width - estimated).max(0.0),
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Color;
    use std::path::PathBuf;

    fn sample_instructions() -> Vec<DrawInstruction> {
        vec![
            DrawInstruction::Rect {
                x: 0.0,
                y: 0.0,
                w: 595.28,
                h: 841.89,
                fill: Some(Color::rgb(0xf3, 0xf4, 0xf6)),
                stroke: None,
            },
            DrawInstruction::Text {
                content: "Invoice A1".to_string(),
                x: 36.0,
                y: 100.0,
                width: 200.0,
                align: Align::Right,
                font: FontId::Regular,
                size: 11.0,
                color: Color::rgb(0x11, 0x18, 0x27),
            },
            DrawInstruction::Line {
                x1: 36.0,
                y1: 130.0,
                x2: 400.0,
                y2: 130.0,
                color: Color::rgb(0xe5, 0xe7, 0xeb),
                thickness: 1.0,
            },
        ]
    }

    #[test]
    fn writes_a_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice-test.pdf");

        emit(&sample_instructions(), &path, &RenderConfig::default()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn missing_cosmetic_assets_are_skipped_not_fatal() {
        let mut instructions = sample_instructions();
        instructions.push(DrawInstruction::Image {
            source: ImageSource::File(PathBuf::from("/nonexistent/logo.png")),
            x: 10.0,
            y: 10.0,
            w: 120.0,
            h: 60.0,
        });
        instructions.push(DrawInstruction::Image {
            source: ImageSource::Png(vec![1, 2, 3]),
            x: 10.0,
            y: 100.0,
            w: 70.0,
            h: 70.0,
        });

        let bytes = render_to_bytes(&instructions, &RenderConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn embedded_qr_bytes_render() {
        let qr = crate::pdf::qr::qr_png("order:A1").unwrap();
        let mut instructions = sample_instructions();
        instructions.push(DrawInstruction::Image {
            source: ImageSource::Png(qr),
            x: 62.0,
            y: 700.0,
            w: 70.0,
            h: 70.0,
        });

        let bytes = render_to_bytes(&instructions, &RenderConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn unwritable_sink_is_a_sink_error() {
        let result = emit(
            &sample_instructions(),
            Path::new("/proc/definitely/not/writable.pdf"),
            &RenderConfig::default(),
        );
        assert!(matches!(result, Err(RenderError::Sink { .. })));
    }

    #[test]
    fn alignment_estimates_stay_inside_the_block() {
        // Right-aligned text never starts left of the block origin.
        let x = aligned_x("short", 100.0, 200.0, Align::Right, 11.0);
        assert!(x >= 100.0);
        assert!(x <= 300.0);

        let wide = aligned_x(&"x".repeat(200), 100.0, 50.0, Align::Center, 11.0);
        assert_eq!(wide, 100.0);
    }
}
