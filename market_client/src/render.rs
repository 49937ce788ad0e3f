//! Terminal renderers for quote snapshots.
//!
//! - `TerminalRenderer`: one table row per symbol between banner lines.
//! - `CardRenderer`: a two-column grid of boxed cards, the desktop layout.
//!
//! Both write to any `io::Write`; colour is optional so output can be captured.

use chrono::NaiveDateTime;
use colored::{ColoredString, Colorize};
use market_common::render::{Renderer, group_thousands, signed_percent};
use market_common::{Quote, QuoteSnapshot, Result};
use std::io::Write;
use std::time::Duration;

const RULE_WIDTH: usize = 70;
const CARD_WIDTH: usize = 28;
const CARDS_PER_ROW: usize = 2;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

fn paint(text: String, up: bool, color: bool) -> ColoredString {
    match (color, up) {
        (false, _) => text.normal(),
        (true, true) => text.green(),
        (true, false) => text.red(),
    }
}

/// Table view, refreshed in place.
pub struct TerminalRenderer<W: Write> {
    out: W,
    color: bool,
    clear_screen: bool,
    refresh_every: Duration,
}

impl<W: Write> TerminalRenderer<W> {
    /// Renderer writing to `out`; the footer announces `refresh_every`.
    pub fn new(out: W, color: bool, clear_screen: bool, refresh_every: Duration) -> Self {
        TerminalRenderer {
            out,
            color,
            clear_screen,
            refresh_every,
        }
    }

    fn row(&self, symbol: &str, quote: &Quote) -> String {
        let arrow = if quote.is_up() { "▲" } else { "▼" };
        let change = paint(
            format!("{} {:>7.2}%", arrow, quote.change),
            quote.is_up(),
            self.color,
        );
        format!(
            "{:<6} | ${:>10.2} | {} | Vol: {:>12}",
            symbol,
            quote.price,
            change,
            group_thousands(quote.volume)
        )
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, snapshot: &QuoteSnapshot, rendered_at: NaiveDateTime) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str(&format!("{rule}\n{:>20}MARKET DASHBOARD\n{rule}\n\n", ""));
        for (symbol, quote) in snapshot {
            frame.push_str(&self.row(symbol, quote));
            frame.push('\n');
        }
        frame.push_str(&format!(
            "\n{rule}\nLast updated: {}\nPress Ctrl+C to exit, refreshing every {} seconds...\n{rule}\n",
            rendered_at.format("%Y-%m-%d %H:%M:%S"),
            self.refresh_every.as_secs()
        ));

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Card grid view: symbol, price, signed change and volume per card.
pub struct CardRenderer<W: Write> {
    out: W,
    color: bool,
    clear_screen: bool,
}

impl<W: Write> CardRenderer<W> {
    /// Renderer writing to `out`.
    pub fn new(out: W, color: bool, clear_screen: bool) -> Self {
        CardRenderer {
            out,
            color,
            clear_screen,
        }
    }

    fn card(&self, symbol: &str, quote: &Quote) -> Vec<String> {
        let inner = CARD_WIDTH - 4;
        let border = format!("+{}+", "-".repeat(CARD_WIDTH - 2));
        let line = |text: String| format!("| {text} |");
        let change = paint(
            format!("{:<inner$}", signed_percent(quote.change)),
            quote.is_up(),
            self.color,
        );

        vec![
            border.clone(),
            line(format!("{:<inner$}", symbol)),
            line(format!("{:<inner$}", format!("${:.2}", quote.price))),
            line(change.to_string()),
            line(format!("{:<inner$}", format!("Vol: {}", group_thousands(quote.volume)))),
            border,
        ]
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for CardRenderer<W> {
    fn render(&mut self, snapshot: &QuoteSnapshot, rendered_at: NaiveDateTime) -> Result<()> {
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str("Market Dashboard\n\n");

        let cards: Vec<Vec<String>> = snapshot.iter().map(|(s, q)| self.card(s, q)).collect();
        for row in cards.chunks(CARDS_PER_ROW) {
            for line in 0..row[0].len() {
                let joined: Vec<&str> = row.iter().map(|card| card[line].as_str()).collect();
                frame.push_str(&joined.join(" "));
                frame.push('\n');
            }
        }
        frame.push_str(&format!("\nUpdated {}\n", rendered_at.format("%H:%M:%S")));

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
