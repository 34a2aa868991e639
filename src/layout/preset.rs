use super::instruction::Align;

/// Which invoice field a table column renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnField {
    Item,
    Quantity,
    Price,
    Notes,
    LineTotal,
}

/// One table column: caption, width in points, cell alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub field: ColumnField,
    pub label: &'static str,
    pub width: f32,
    pub align: Align,
}

/// Corner hosting the QR code image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrCorner {
    BottomLeft,
    BottomRight,
}

/// A named layout variant.
///
/// The upstream service grew at least eight copy-pasted renditions of the
/// same page that differed only in column count, zebra striping, and QR
/// placement. Those differences are data, not code: one engine, several
/// presets.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPreset {
    pub name: &'static str,
    /// Columns in reading order. The first column sits flush against the
    /// right margin; each following column is placed further left.
    pub columns: Vec<Column>,
    pub zebra_rows: bool,
    pub qr_corner: QrCorner,
}

impl LayoutPreset {
    /// The full five-column page: the shape most variants shared.
    pub fn classic() -> Self {
        LayoutPreset {
            name: "classic",
            columns: vec![
                Column {
                    field: ColumnField::Item,
                    label: "الصنف",
                    width: 160.0,
                    align: Align::Right,
                },
                Column {
                    field: ColumnField::Quantity,
                    label: "الكمية",
                    width: 50.0,
                    align: Align::Center,
                },
                Column {
                    field: ColumnField::Price,
                    label: "السعر",
                    width: 80.0,
                    align: Align::Left,
                },
                Column {
                    field: ColumnField::Notes,
                    label: "ملاحظات",
                    width: 100.0,
                    align: Align::Right,
                },
                Column {
                    field: ColumnField::LineTotal,
                    label: "الإجمالي",
                    width: 90.0,
                    align: Align::Left,
                },
            ],
            zebra_rows: false,
            qr_corner: QrCorner::BottomLeft,
        }
    }

    /// Four columns, no per-item notes, striped rows, QR on the right.
    pub fn compact() -> Self {
        LayoutPreset {
            name: "compact",
            columns: vec![
                Column {
                    field: ColumnField::Item,
                    label: "الصنف",
                    width: 210.0,
                    align: Align::Right,
                },
                Column {
                    field: ColumnField::Quantity,
                    label: "الكمية",
                    width: 60.0,
                    align: Align::Center,
                },
                Column {
                    field: ColumnField::Price,
                    label: "السعر",
                    width: 100.0,
                    align: Align::Left,
                },
                Column {
                    field: ColumnField::LineTotal,
                    label: "الإجمالي",
                    width: 100.0,
                    align: Align::Left,
                },
            ],
            zebra_rows: true,
            qr_corner: QrCorner::BottomRight,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "compact" => Some(Self::compact()),
            _ => None,
        }
    }
}

impl Default for LayoutPreset {
    fn default() -> Self {
        Self::classic()
    }
}
