//! Layout engine: canonical invoice in, ordered draw instructions out.
//!
//! Pure and deterministic; no I/O, no clock. Page geometry, palette, and
//! branding come from `RenderConfig`, variant differences from the preset.
//! Coordinates are PDF points with a top-left origin; the emitter converts
//! to whatever space the backend wants. Text content stays in logical order
//! here; the emitter runs it through the RTL pipeline.

pub mod instruction;
pub mod preset;

pub use instruction::{Align, DrawInstruction, FontId, ImageSource, Stroke};
pub use preset::{Column, ColumnField, LayoutPreset, QrCorner};

use crate::core::config::{Color, RenderConfig};
use crate::invoice::format::{amount_in_words, format_date, format_money, format_time};
use crate::models::{CanonicalInvoice, LineItem};

const SIZE_TITLE: f32 = 16.0;
const SIZE_BODY: f32 = 11.0;
const SIZE_SMALL: f32 = 10.0;
const SIZE_TOTAL: f32 = 13.0;
const SIZE_FINE: f32 = 9.0;

const LOGO_WIDTH: f32 = 120.0;
const LOGO_HEIGHT: f32 = 60.0;
const QR_SIZE: f32 = 70.0;
const SUMMARY_ROW_HEIGHT: f32 = 18.0;

const LABEL_ORDER_NO: &str = "رقم الطلب:";
const LABEL_DATE: &str = "التاريخ:";
const LABEL_TIME: &str = "الوقت:";
const LABEL_PAYMENT: &str = "طريقة الدفع:";
const LABEL_CUSTOMER_TITLE: &str = "معلومات العميل";
const LABEL_NAME: &str = "الاسم:";
const LABEL_PHONE: &str = "الهاتف:";
const LABEL_ADDRESS: &str = "العنوان:";
const LABEL_SUBTOTAL: &str = "المجموع الفرعي:";
const LABEL_DELIVERY: &str = "رسوم التوصيل:";
const LABEL_DISCOUNT: &str = "الخصم:";
const LABEL_GRAND_TOTAL: &str = "الإجمالي الكلي:";
const LABEL_NOTES: &str = "ملاحظات:";
const LABEL_GENERATED_AT: &str = "تم توليد الفاتورة بتاريخ";

/// Compute the full instruction sequence for one invoice page.
///
/// `qr_png` carries the already-rendered QR bitmap; `None` degrades to a page
/// without a QR instruction rather than an error.
pub fn layout(
    invoice: &CanonicalInvoice,
    qr_png: Option<Vec<u8>>,
    preset: &LayoutPreset,
    config: &RenderConfig,
) -> Vec<DrawInstruction> {
    let mut sheet = Sheet::new(config);

    sheet.background();
    sheet.header(config);
    sheet.metadata_block(invoice);
    sheet.customer_block(invoice);
    sheet.item_table(invoice, preset);
    sheet.summary_block(invoice, config);
    sheet.notes_line(invoice);
    sheet.qr_and_footer(invoice, qr_png, preset);

    sheet.out
}

/// Mutable page state while instructions accumulate: the output sequence and
/// a downward-advancing y cursor, plus the derived card geometry.
struct Sheet<'a> {
    out: Vec<DrawInstruction>,
    config: &'a RenderConfig,
    y: f32,
    card_x: f32,
    card_y: f32,
    card_w: f32,
    card_h: f32,
    content_x: f32,
    content_w: f32,
    summary_x: f32,
    summary_w: f32,
}

impl<'a> Sheet<'a> {
    fn new(config: &'a RenderConfig) -> Self {
        let page = &config.page;
        let card_x = page.card_inset;
        let card_y = page.card_inset;
        let card_w = page.width - card_x * 2.0;
        let card_h = page.height - card_y * 2.0;
        let content_x = card_x + 24.0;
        let content_w = card_w - 48.0;
        Sheet {
            out: Vec::new(),
            config,
            y: card_y + 20.0,
            card_x,
            card_y,
            card_w,
            card_h,
            content_x,
            content_w,
            summary_x: content_x + 10.0,
            summary_w: content_w - 20.0,
        }
    }

    fn theme(&self) -> &crate::core::config::Theme {
        &self.config.theme
    }

    fn text(
        &mut self,
        content: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        align: Align,
        font: FontId,
        size: f32,
        color: Color,
    ) {
        self.out.push(DrawInstruction::Text {
            content: content.into(),
            x,
            y,
            width,
            align,
            font,
            size,
            color,
        });
    }

    fn body_text(&mut self, content: impl Into<String>, x: f32, y: f32, width: f32, align: Align) {
        let color = self.theme().text;
        self.text(content, x, y, width, align, FontId::Regular, SIZE_BODY, color);
    }

    /// Right-anchored "label value" row inside a bordered box.
    fn label_value_pair(&mut self, label: &str, value: &str, x: f32, width: f32, y: f32) {
        self.body_text(format!("{} {}", label, value), x, y, width, Align::Right);
    }

    fn hline(&mut self, x1: f32, x2: f32, y: f32, color: Color, thickness: f32) {
        self.out.push(DrawInstruction::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            color,
            thickness,
        });
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Option<Color>, stroke: Option<Stroke>) {
        self.out.push(DrawInstruction::Rect {
            x,
            y,
            w,
            h,
            fill,
            stroke,
        });
    }

    /// Full-page background wash, then the white card everything sits on.
    fn background(&mut self) {
        let page = &self.config.page;
        let background = self.theme().background;
        let card = self.theme().card;
        self.rect(0.0, 0.0, page.width, page.height, Some(background), None);
        self.rect(
            self.card_x,
            self.card_y,
            self.card_w,
            self.card_h,
            Some(card),
            None,
        );
    }

    fn header(&mut self, config: &RenderConfig) {
        let page_w = self.config.page.width;
        self.out.push(DrawInstruction::Image {
            source: ImageSource::File(config.logo_path.clone()),
            x: page_w / 2.0 - LOGO_WIDTH / 2.0,
            y: self.y,
            w: LOGO_WIDTH,
            h: LOGO_HEIGHT,
        });
        self.y += LOGO_HEIGHT + 8.0;

        let color = self.theme().text;
        self.text(
            config.title.clone(),
            0.0,
            self.y,
            page_w,
            Align::Center,
            FontId::Bold,
            SIZE_TITLE,
            color,
        );
        self.y += SIZE_TITLE + 16.0;
    }

    /// Bordered box with order number, date, time and payment method as
    /// right-anchored label/value pairs.
    fn metadata_block(&mut self, invoice: &CanonicalInvoice) {
        let line_height = self.config.page.line_height;
        let box_x = self.card_x + 18.0;
        let box_w = self.card_w - 36.0;
        let rows = [
            (LABEL_ORDER_NO, invoice.display_number.clone()),
            (LABEL_DATE, format_date(invoice.issued_at)),
            (LABEL_TIME, format_time(invoice.issued_at)),
            (LABEL_PAYMENT, invoice.payment_method.clone()),
        ];
        let box_h = rows.len() as f32 * line_height + 16.0;

        let border = self.theme().border;
        self.rect(
            box_x,
            self.y,
            box_w,
            box_h,
            None,
            Some(Stroke {
                color: border,
                thickness: 1.0,
            }),
        );

        let mut line_y = self.y + 10.0;
        for (label, value) in rows {
            self.label_value_pair(label, &value, box_x + 16.0, box_w - 32.0, line_y);
            line_y += line_height;
        }
        self.y += box_h + 20.0;
    }

    fn customer_block(&mut self, invoice: &CanonicalInvoice) {
        let line_height = self.config.page.line_height;
        let text = self.theme().text;
        self.text(
            LABEL_CUSTOMER_TITLE,
            self.content_x,
            self.y,
            self.content_w,
            Align::Right,
            FontId::Bold,
            12.0,
            text,
        );
        self.y += 20.0;

        let rows = [
            (LABEL_NAME, invoice.customer_name.clone()),
            (LABEL_PHONE, invoice.phone.clone()),
            (LABEL_ADDRESS, invoice.address.clone()),
        ];
        let box_h = rows.len() as f32 * line_height + 16.0;
        let panel = self.theme().panel;
        let border = self.theme().border;
        self.rect(
            self.content_x,
            self.y,
            self.content_w,
            box_h,
            Some(panel),
            Some(Stroke {
                color: border,
                thickness: 1.0,
            }),
        );

        let mut line_y = self.y + 10.0;
        for (label, value) in rows {
            self.body_text(
                format!("{} {}", label, value),
                self.content_x + 10.0,
                line_y,
                self.content_w - 20.0,
                Align::Right,
            );
            line_y += line_height;
        }
        self.y += box_h + 20.0;
    }

    /// Column captions and one row per line item. The first column sits
    /// flush against the right margin; each later column is placed further
    /// left by its width. This right-to-left geometry is a layout contract,
    /// independent of how the text itself gets shaped.
    fn item_table(&mut self, invoice: &CanonicalInvoice, preset: &LayoutPreset) {
        let table_right = self.content_x + self.content_w;
        let mut positions: Vec<(f32, &Column)> = Vec::with_capacity(preset.columns.len());
        let mut cursor = table_right;
        for column in &preset.columns {
            cursor -= column.width;
            positions.push((cursor, column));
        }

        let muted = self.theme().muted;
        for (x, column) in &positions {
            self.text(
                column.label,
                *x,
                self.y,
                column.width,
                column.align,
                FontId::Regular,
                SIZE_BODY,
                muted,
            );
        }
        self.y += SIZE_BODY + 6.0;

        let border = self.theme().border;
        self.hline(self.content_x, table_right, self.y, border, 1.0);
        self.y += 10.0;

        let row_height = self.config.page.row_height;
        let zebra = self.theme().panel;
        let divider = self.theme().row_divider;
        for (index, item) in invoice.line_items.iter().enumerate() {
            if preset.zebra_rows && index % 2 == 1 {
                self.rect(
                    self.content_x,
                    self.y - 4.0,
                    self.content_w,
                    row_height,
                    Some(zebra),
                    None,
                );
            }
            for (x, column) in &positions {
                self.item_cell(item, column, *x);
            }
            self.y += row_height - 4.0;
            self.hline(self.content_x, table_right, self.y, divider, 0.5);
            self.y += 4.0;
        }
        self.y += 12.0;
    }

    fn item_cell(&mut self, item: &LineItem, column: &Column, x: f32) {
        let currency = self.config.currency_label.clone();
        match column.field {
            ColumnField::Item => {
                self.body_text(item.name.clone(), x, self.y, column.width, column.align);
            }
            ColumnField::Quantity => {
                self.body_text(format_quantity(item.quantity), x, self.y, column.width, column.align);
            }
            ColumnField::Price => {
                self.body_text(
                    format_money(item.unit_price, &currency),
                    x,
                    self.y,
                    column.width,
                    column.align,
                );
            }
            ColumnField::Notes => {
                let muted = self.theme().muted;
                let notes = item.notes.clone().unwrap_or_else(|| "-".to_string());
                self.text(
                    notes,
                    x,
                    self.y,
                    column.width,
                    column.align,
                    FontId::Regular,
                    SIZE_SMALL,
                    muted,
                );
            }
            ColumnField::LineTotal => {
                self.body_text(
                    format_money(item.line_total, &currency),
                    x,
                    self.y,
                    column.width,
                    column.align,
                );
            }
        }
    }

    /// Subtotal always; delivery fee, discount and tax only when nonzero;
    /// grand total always, emphasized over a highlight band with the amount
    /// spelled out underneath.
    fn summary_block(&mut self, invoice: &CanonicalInvoice, config: &RenderConfig) {
        let currency = config.currency_label.clone();
        let border = self.theme().border;
        self.hline(
            self.summary_x,
            self.summary_x + self.summary_w,
            self.y,
            border,
            1.0,
        );
        self.y += 10.0;

        let text = self.theme().text;
        let alert = self.theme().alert;
        self.summary_row(LABEL_SUBTOTAL, &format_money(invoice.subtotal, &currency), text);
        if invoice.delivery_fee != 0.0 {
            self.summary_row(
                LABEL_DELIVERY,
                &format_money(invoice.delivery_fee, &currency),
                text,
            );
        }
        if invoice.discount != 0.0 {
            self.summary_row(
                LABEL_DISCOUNT,
                &format!("-{}", format_money(invoice.discount, &currency)),
                alert,
            );
        }
        if invoice.tax_percent != 0.0 {
            self.summary_row(
                &format!("الضريبة (VAT {}%):", format_quantity(invoice.tax_percent)),
                &format_money(invoice.tax_amount, &currency),
                text,
            );
        }

        let highlight = self.theme().highlight;
        self.rect(self.summary_x, self.y, self.summary_w, 30.0, Some(highlight), None);
        let half = self.summary_w / 2.0;
        self.text(
            LABEL_GRAND_TOTAL,
            self.summary_x + 4.0,
            self.y + 8.0,
            half,
            Align::Right,
            FontId::Bold,
            SIZE_TOTAL,
            text,
        );
        self.text(
            format_money(invoice.grand_total, &currency),
            self.summary_x + half + 8.0,
            self.y + 8.0,
            half - 8.0,
            Align::Left,
            FontId::Bold,
            SIZE_TOTAL,
            text,
        );
        self.y += 40.0;

        let muted = self.theme().muted;
        self.text(
            format!(
                "فقط {} لا غير",
                amount_in_words(invoice.grand_total, &config.currency_words)
            ),
            self.summary_x,
            self.y,
            self.summary_w,
            Align::Right,
            FontId::Regular,
            SIZE_FINE,
            muted,
        );
        self.y += 16.0;
    }

    fn summary_row(&mut self, label: &str, value: &str, color: Color) {
        let half = self.summary_w / 2.0;
        self.text(
            label,
            self.summary_x,
            self.y,
            half,
            Align::Right,
            FontId::Regular,
            SIZE_BODY,
            color,
        );
        self.text(
            value,
            self.summary_x + half + 8.0,
            self.y,
            half - 8.0,
            Align::Left,
            FontId::Regular,
            SIZE_BODY,
            color,
        );
        self.y += SUMMARY_ROW_HEIGHT;
    }

    fn notes_line(&mut self, invoice: &CanonicalInvoice) {
        if let Some(notes) = &invoice.notes {
            let muted = self.theme().muted;
            self.text(
                format!("{} {}", LABEL_NOTES, notes),
                self.content_x,
                self.y,
                self.content_w,
                Align::Right,
                FontId::Regular,
                SIZE_SMALL,
                muted,
            );
            self.y += 18.0;
        }
    }

    fn qr_and_footer(
        &mut self,
        invoice: &CanonicalInvoice,
        qr_png: Option<Vec<u8>>,
        preset: &LayoutPreset,
    ) {
        let footer_y = self.card_y + self.card_h - 90.0;

        if let Some(png) = qr_png {
            let x = match preset.qr_corner {
                QrCorner::BottomLeft => self.card_x + 30.0,
                QrCorner::BottomRight => self.card_x + self.card_w - 30.0 - QR_SIZE,
            };
            self.out.push(DrawInstruction::Image {
                source: ImageSource::Png(png),
                x,
                y: footer_y - 10.0,
                w: QR_SIZE,
                h: QR_SIZE,
            });
        }

        let page_w = self.config.page.width;
        let accent = self.theme().footer_accent;
        let muted = self.theme().muted;
        let faint = self.theme().faint;
        self.text(
            self.config.footer_line1.clone(),
            0.0,
            footer_y,
            page_w,
            Align::Center,
            FontId::Regular,
            SIZE_BODY,
            accent,
        );
        self.text(
            self.config.footer_line2.clone(),
            0.0,
            footer_y + 16.0,
            page_w,
            Align::Center,
            FontId::Regular,
            SIZE_SMALL,
            muted,
        );
        // The generation stamp reuses the issue date so the layout stays
        // clock-free and reproducible.
        self.text(
            format!("{} {}", LABEL_GENERATED_AT, format_date(invoice.issued_at)),
            0.0,
            footer_y + 32.0,
            page_w,
            Align::Center,
            FontId::Regular,
            SIZE_FINE,
            faint,
        );
    }
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Theme;
    use crate::invoice::normalize;
    use crate::models::OrderInput;
    use serde_json::json;

    fn render(order: serde_json::Value) -> Vec<DrawInstruction> {
        let invoice = normalize(&OrderInput::new(order));
        layout(
            &invoice,
            Some(vec![0u8; 8]),
            &LayoutPreset::classic(),
            &RenderConfig::default(),
        )
    }

    fn text_contents(instructions: &[DrawInstruction]) -> Vec<&str> {
        instructions
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn background_is_painted_first() {
        let instructions = render(json!({ "id": "A1", "items": [] }));
        match &instructions[0] {
            DrawInstruction::Rect { x, y, fill, .. } => {
                assert_eq!((*x, *y), (0.0, 0.0));
                assert_eq!(*fill, Some(Theme::default().background));
            }
            other => panic!("expected background rect, got {:?}", other),
        }
    }

    #[test]
    fn single_item_scenario() {
        let instructions = render(json!({
            "id": "A1",
            "items": [{"name": "Burger", "qty": 2, "price": 10}]
        }));

        let texts = text_contents(&instructions);
        assert_eq!(texts.iter().filter(|t| **t == "Burger").count(), 1);
        assert!(texts.contains(&"20.00 ₪"));

        let qr_images = instructions
            .iter()
            .filter(|i| matches!(i, DrawInstruction::Image { source: ImageSource::Png(_), .. }))
            .count();
        assert_eq!(qr_images, 1);
    }

    #[test]
    fn metadata_rows_render_label_and_value() {
        let instructions = render(json!({
            "id": "A1",
            "order_number": "1042",
            "date": "2026-08-29T15:45:00Z",
            "items": []
        }));
        let texts = text_contents(&instructions);
        assert!(texts.contains(&"رقم الطلب: 1042"));
        assert!(texts.contains(&"التاريخ: 29 أغسطس 2026"));
        assert!(texts.contains(&"الوقت: 3:45 م"));
        assert!(texts.iter().any(|t| t.starts_with("طريقة الدفع:")));
    }

    #[test]
    fn zero_valued_summary_rows_are_omitted() {
        let instructions = render(json!({
            "id": "A1",
            "items": [{"name": "Burger", "qty": 2, "price": 10}]
        }));
        let texts = text_contents(&instructions);
        assert!(!texts.contains(&"الخصم:"));
        assert!(!texts.contains(&"رسوم التوصيل:"));
        assert!(texts.contains(&"المجموع الفرعي:"));
        assert!(texts.contains(&"الإجمالي الكلي:"));
    }

    #[test]
    fn nonzero_discount_renders_with_sign() {
        let instructions = render(json!({ "id": "A2", "items": [], "discount": 50 }));
        let texts = text_contents(&instructions);
        assert!(texts.contains(&"الخصم:"));
        assert!(texts.contains(&"-50.00 ₪"));
        // Pass-through negative grand total.
        assert!(texts.contains(&"-50.00 ₪"));
    }

    #[test]
    fn discount_rows_use_the_alert_color() {
        let instructions = render(json!({ "id": "A2", "items": [], "discount": 5 }));
        let discount_label = instructions.iter().find(|i| {
            matches!(i, DrawInstruction::Text { content, .. } if content == "الخصم:")
        });
        match discount_label {
            Some(DrawInstruction::Text { color, .. }) => {
                assert_eq!(*color, Theme::default().alert);
            }
            _ => panic!("discount label missing"),
        }
    }

    #[test]
    fn delivery_and_tax_rows_appear_when_nonzero() {
        let instructions = render(json!({
            "id": "A3",
            "items": [{"name": "Meal", "qty": 1, "price": 100}],
            "delivery_price": 20,
            "vat_percent": 10
        }));
        let texts = text_contents(&instructions);
        assert!(texts.contains(&"رسوم التوصيل:"));
        assert!(texts.iter().any(|t| t.starts_with("الضريبة")));
    }

    #[test]
    fn layout_is_structurally_idempotent() {
        let invoice = normalize(&OrderInput::new(json!({
            "id": "A4",
            "date": "2026-08-29T10:00:00Z",
            "items": [{"name": "Burger", "qty": 2, "price": 10}]
        })));
        let preset = LayoutPreset::classic();
        let config = RenderConfig::default();
        let a = layout(&invoice, Some(vec![1, 2, 3]), &preset, &config);
        let b = layout(&invoice, Some(vec![1, 2, 3]), &preset, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_qr_degrades_to_no_image_instruction() {
        let invoice = normalize(&OrderInput::new(json!({ "id": "A5", "items": [] })));
        let instructions = layout(
            &invoice,
            None,
            &LayoutPreset::classic(),
            &RenderConfig::default(),
        );
        assert!(!instructions
            .iter()
            .any(|i| matches!(i, DrawInstruction::Image { source: ImageSource::Png(_), .. })));
    }

    #[test]
    fn columns_anchor_to_the_right_margin() {
        let config = RenderConfig::default();
        let preset = LayoutPreset::classic();
        let instructions = render(json!({ "id": "A6", "items": [] }));

        let table_right = config.page.card_inset + 24.0
            + (config.page.width - config.page.card_inset * 2.0 - 48.0);
        let first_caption = preset.columns[0].label;
        let caption = instructions
            .iter()
            .find_map(|i| match i {
                DrawInstruction::Text { content, x, width, .. } if content == first_caption => {
                    Some((*x, *width))
                }
                _ => None,
            })
            .expect("first column caption missing");
        assert!((caption.0 + caption.1 - table_right).abs() < 0.01);
    }

    #[test]
    fn long_item_lists_overflow_without_pagination() {
        let items: Vec<_> = (0..60)
            .map(|i| json!({"name": format!("Item {}", i), "qty": 1, "price": 1}))
            .collect();
        let instructions = render(json!({ "id": "A7", "items": items }));
        let config = RenderConfig::default();

        let max_y = instructions
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::Text { y, .. } => Some(*y),
                _ => None,
            })
            .fold(0.0f32, f32::max);
        assert!(max_y > config.page.height);
    }

    #[test]
    fn notes_line_only_when_present() {
        let with = render(json!({ "id": "A8", "items": [], "notes": "ring the bell" }));
        let without = render(json!({ "id": "A8", "items": [] }));

        assert!(text_contents(&with)
            .iter()
            .any(|t| t.starts_with("ملاحظات:")));
        assert!(!text_contents(&without)
            .iter()
            .any(|t| t.starts_with("ملاحظات:")));
    }

    #[test]
    fn compact_preset_moves_the_qr_right() {
        let invoice = normalize(&OrderInput::new(json!({ "id": "A9", "items": [] })));
        let config = RenderConfig::default();
        let classic = layout(&invoice, Some(vec![1]), &LayoutPreset::classic(), &config);
        let compact = layout(&invoice, Some(vec![1]), &LayoutPreset::compact(), &config);

        let qr_x = |instrs: &[DrawInstruction]| {
            instrs.iter().find_map(|i| match i {
                DrawInstruction::Image { source: ImageSource::Png(_), x, .. } => Some(*x),
                _ => None,
            })
        };
        assert!(qr_x(&classic).unwrap() < qr_x(&compact).unwrap());
    }
}
