//! Reference renderers for [`InvoiceDocument`].
//!
//! ```text
//! EZ-Theme                                                 INVOICE
//! ================================================================
//! BILL TO
//! ada@example.com
//!
//! INVOICE NO                                         2024010112345
//! DATE                                            2024/01/01 08:00
//! STATUS                                                 Completed
//! ----------------------------------------------------------------
//! DESCRIPTION                      PERIOD         QTY      AMOUNT
//! ----------------------------------------------------------------
//! Pro                              Monthly          1     ¤100.00
//! ----------------------------------------------------------------
//!                                 Subtotal                 ¤100.00
//!                                 Discount                 -¤10.00
//!                                 --------------------------------
//!                                 TOTAL                     ¤90.00
//! ================================================================
//!                             [ PAID ]
//!                           Via: Stripe
//!
//!                   Thank you for your business!
//!                      Generated by EZ-Theme
//! ```
//!
//! Widths are counted in chars, so wide CJK glyphs can push a line past the
//! nominal width.

use quill_core::document::TotalsRowKind;
use quill_core::InvoiceDocument;

/// Default line width of the text renderer.
pub const DEFAULT_WIDTH: usize = 64;

/// Narrower widths are widened to this.
pub const MIN_WIDTH: usize = 40;

const PERIOD_WIDTH: usize = 14;
const QTY_WIDTH: usize = 4;
const AMOUNT_WIDTH: usize = 12;

/// Lays the document out as fixed-width text.
pub fn text(doc: &InvoiceDocument, width: usize) -> String {
    let mut b = TextLayout::new(width.max(MIN_WIDTH));

    b.line_lr(&doc.header.site_name, &doc.header.title);
    b.sep('=');

    b.write_line(&doc.bill_to.label);
    b.write_line(&doc.bill_to.email);
    b.blank();
    for field in [&doc.meta.number, &doc.meta.date, &doc.meta.status] {
        b.line_lr(&field.label, &field.value);
    }
    b.sep('-');

    // ── Line item ──
    let columns = &doc.columns;
    b.columns([
        &columns.description,
        &columns.period,
        &columns.quantity,
        &columns.amount,
    ]);
    b.sep('-');
    let item = &doc.line_item;
    b.columns([
        &item.description,
        &item.period,
        &item.quantity.to_string(),
        &item.amount_display,
    ]);
    b.sep('-');

    // ── Totals ──
    let indent = b.width / 2;
    for row in &doc.totals.rows {
        if row.kind == TotalsRowKind::Total {
            b.write_line(&format!(
                "{}{}",
                " ".repeat(indent),
                "-".repeat(b.width - indent)
            ));
        }
        b.line_lr_indented(indent, &row.label, &row.display);
    }
    b.sep('=');

    // ── Paid stamp ──
    if let Some(stamp) = &doc.paid_stamp {
        b.center(&format!("[ {} ]", stamp.notice));
        if let Some(method) = &stamp.payment_method {
            b.center(&method.display());
        }
        b.blank();
    }

    b.center(&doc.footer.message);
    b.center(&doc.footer.generated_by);
    b.finish()
}

/// Pretty JSON, for renderers that lay the document out themselves.
pub fn json(doc: &InvoiceDocument) -> serde_json::Result<String> {
    doc.to_json_pretty()
}

// =============================================================================
// Text Layout
// =============================================================================

fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn truncate_to_width(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

fn pad_to_width(s: &str, width: usize, align_right: bool) -> String {
    let current = display_width(s);
    if current >= width {
        return truncate_to_width(s, width);
    }
    let spaces = " ".repeat(width - current);
    if align_right {
        format!("{spaces}{s}")
    } else {
        format!("{s}{spaces}")
    }
}

struct TextLayout {
    buf: String,
    width: usize,
}

impl TextLayout {
    fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
        }
    }

    fn write_line(&mut self, s: &str) {
        self.buf.push_str(s.trim_end());
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn sep(&mut self, c: char) {
        self.write_line(&c.to_string().repeat(self.width));
    }

    fn center(&mut self, s: &str) {
        let w = display_width(s);
        let pad = self.width.saturating_sub(w) / 2;
        self.write_line(&format!("{}{}", " ".repeat(pad), s));
    }

    /// Left-aligned `left`, right-aligned `right`; space-separated when they
    /// do not fit.
    fn line_lr(&mut self, left: &str, right: &str) {
        self.line_lr_indented(0, left, right);
    }

    fn line_lr_indented(&mut self, indent: usize, left: &str, right: &str) {
        let available = self.width.saturating_sub(indent);
        let lw = display_width(left);
        let rw = display_width(right);
        let line = if lw + rw >= available {
            format!("{}{} {}", " ".repeat(indent), left, right)
        } else {
            format!(
                "{}{}{}{}",
                " ".repeat(indent),
                left,
                " ".repeat(available - lw - rw),
                right
            )
        };
        self.write_line(&line);
    }

    /// Description, period, quantity, amount.
    fn columns(&mut self, cells: [&str; 4]) {
        let description_width = self
            .width
            .saturating_sub(PERIOD_WIDTH + QTY_WIDTH + AMOUNT_WIDTH + 2);
        let line = format!(
            "{} {}{} {}",
            pad_to_width(cells[0], description_width, false),
            pad_to_width(cells[1], PERIOD_WIDTH, false),
            pad_to_width(cells[2], QTY_WIDTH, true),
            pad_to_width(cells[3], AMOUNT_WIDTH - 1, true),
        );
        self.write_line(&line);
    }

    fn finish(self) -> String {
        self.buf
    }
}
