use std::path::PathBuf;

/// RGB color used by draw instructions. Stored as 0-255 channels, converted
/// to the backend's color space by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// Palette for the invoice page. Defaults match the production brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub card: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub panel: Color,
    pub row_divider: Color,
    pub alert: Color,
    pub highlight: Color,
    pub footer_accent: Color,
    pub faint: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::rgb(0xf3, 0xf4, 0xf6),
            card: Color::rgb(0xff, 0xff, 0xff),
            text: Color::rgb(0x11, 0x18, 0x27),
            muted: Color::rgb(0x6b, 0x72, 0x80),
            border: Color::rgb(0xe5, 0xe7, 0xeb),
            panel: Color::rgb(0xf9, 0xfa, 0xfb),
            row_divider: Color::rgb(0xf3, 0xf4, 0xf6),
            alert: Color::rgb(0xdc, 0x26, 0x26),
            highlight: Color::rgb(0xee, 0xf2, 0xff),
            footer_accent: Color::rgb(0xb9, 0x1c, 0x1c),
            faint: Color::rgb(0x9c, 0xa3, 0xaf),
        }
    }
}

/// Fixed single-page geometry in PDF points, top-left origin.
/// The layout engine does not paginate; a very long item list simply keeps
/// advancing past the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub card_inset: f32,
    pub line_height: f32,
    pub row_height: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 in points.
        PageGeometry {
            width: 595.28,
            height: 841.89,
            margin: 36.0,
            card_inset: 32.0,
            line_height: 18.0,
            row_height: 26.0,
        }
    }
}

/// Everything the rendering pipeline needs that used to live as module-level
/// constants: asset paths, palette, page geometry, and the fixed strings that
/// brand the document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub page: PageGeometry,
    pub theme: Theme,
    pub font_path: PathBuf,
    pub logo_path: PathBuf,
    pub currency_label: String,
    /// Currency name used by the amount-in-words line.
    pub currency_words: String,
    pub title: String,
    pub footer_line1: String,
    pub footer_line2: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            page: PageGeometry::default(),
            theme: Theme::default(),
            font_path: PathBuf::from("assets/fonts/Cairo-Regular.ttf"),
            logo_path: PathBuf::from("assets/logo/malaky.png"),
            currency_label: "₪".to_string(),
            currency_words: "شيقل".to_string(),
            title: "فاتورة طلب".to_string(),
            footer_line1: "شكراً لاختياركم مطعم ملكي بروست!".to_string(),
            footer_line2: "نتطلع لخدمتكم مرة أخرى".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct RenderConfigBuilder {
    page: Option<PageGeometry>,
    theme: Option<Theme>,
    font_path: Option<PathBuf>,
    logo_path: Option<PathBuf>,
    currency_label: Option<String>,
    currency_words: Option<String>,
    title: Option<String>,
    footer_line1: Option<String>,
    footer_line2: Option<String>,
}

impl RenderConfigBuilder {
    pub fn page(mut self, page: PageGeometry) -> Self {
        self.page = Some(page);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn logo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    pub fn currency_label(mut self, label: impl Into<String>) -> Self {
        self.currency_label = Some(label.into());
        self
    }

    pub fn currency_words(mut self, words: impl Into<String>) -> Self {
        self.currency_words = Some(words.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn footer_lines(mut self, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        self.footer_line1 = Some(line1.into());
        self.footer_line2 = Some(line2.into());
        self
    }

    pub fn build(self) -> RenderConfig {
        let default = RenderConfig::default();
        RenderConfig {
            page: self.page.unwrap_or(default.page),
            theme: self.theme.unwrap_or(default.theme),
            font_path: self.font_path.unwrap_or(default.font_path),
            logo_path: self.logo_path.unwrap_or(default.logo_path),
            currency_label: self.currency_label.unwrap_or(default.currency_label),
            currency_words: self.currency_words.unwrap_or(default.currency_words),
            title: self.title.unwrap_or(default.title),
            footer_line1: self.footer_line1.unwrap_or(default.footer_line1),
            footer_line2: self.footer_line2.unwrap_or(default.footer_line2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_defaults_for_unset_fields() {
        let config = RenderConfig::builder()
            .currency_label("EUR")
            .build();

        assert_eq!(config.currency_label, "EUR");
        assert_eq!(config.page, PageGeometry::default());
        assert_eq!(config.title, RenderConfig::default().title);
    }
}
