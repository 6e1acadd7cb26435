//! Text or JSON output.

use anyhow::Result;
use chrono::NaiveDate;
use mostrador_core::format::format_date_display;
use serde::Serialize;

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    /// Prints `value` as pretty JSON in `--json` mode, otherwise runs `text`.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }
}

pub fn date(d: NaiveDate) -> String {
    format_date_display(d)
}

/// Optional field, blank when absent.
pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
