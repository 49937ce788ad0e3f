//! Presentation seam shared by the front ends, plus number formatting helpers.

use chrono::NaiveDateTime;

use crate::quote::QuoteSnapshot;
use crate::Result;

/// Draws a quote snapshot on some output device.
pub trait Renderer {
    /// Render one frame. `rendered_at` is the local time of the refresh.
    fn render(&mut self, snapshot: &QuoteSnapshot, rendered_at: NaiveDateTime) -> Result<()>;
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Percent change with an explicit sign, e.g. `+1.25%` / `-0.40%`.
pub fn signed_percent(change: f64) -> String {
    if change >= 0.0 {
        format!("+{change:.2}%")
    } else {
        format!("{change:.2}%")
    }
}
