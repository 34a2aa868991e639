use std::path::PathBuf;

use crate::core::config::Color;

/// Horizontal alignment of a text block inside its bounding width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Logical font slot; the emitter maps these onto actual font handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontId {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub thickness: f32,
}

/// Raster source for an Image instruction. PNG bytes for generated images
/// (the QR code), a file path for on-disk assets (the logo).
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Png(Vec<u8>),
    File(PathBuf),
}

/// One primitive rendering operation.
///
/// Instructions are produced as an ordered sequence and consumed strictly in
/// order; later instructions paint over earlier ones, which the layered
/// background and highlight rectangles rely on. Coordinates are PDF points
/// in a top-left-origin space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    Text {
        content: String,
        x: f32,
        y: f32,
        width: f32,
        align: Align,
        font: FontId,
        size: f32,
        color: Color,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        thickness: f32,
    },
    Image {
        source: ImageSource,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
}
