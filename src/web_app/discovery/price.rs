// web_app/discovery/price.rs - Min/max price inputs
//
// Both bounds are kept as raw text so partial entries like "12." survive
// re-rendering. Either field restarts one shared debounce timer, which emits
// the parsed pair.

use std::time::Duration;

use super::debounce::{Debouncer, Scheduler};
use crate::web_app::model::PriceBounds;

/// Lenient bound parsing: blank or unparseable input means "no bound"
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Text shown in an input for a committed bound
pub fn bound_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// "12." shows 12; "abc" shows nothing even though it parses to no bound
fn text_shows(text: &str, bound: Option<f64>) -> bool {
    match bound {
        Some(_) => parse_price(text) == bound,
        None => text.trim().is_empty(),
    }
}

pub struct PriceFilterInput<S: Scheduler> {
    min_text: String,
    max_text: String,
    debouncer: Debouncer<PriceBounds, S>,
}

impl<S: Scheduler> PriceFilterInput<S> {
    pub fn new(
        initial: PriceBounds,
        scheduler: S,
        delay: Duration,
        on_commit: impl Fn(PriceBounds) + Send + Sync + 'static,
    ) -> Self {
        Self {
            min_text: bound_text(initial.min_price),
            max_text: bound_text(initial.max_price),
            debouncer: Debouncer::new(scheduler, delay, on_commit),
        }
    }

    pub fn min_text(&self) -> &str {
        &self.min_text
    }

    pub fn max_text(&self) -> &str {
        &self.max_text
    }

    /// Current parse of both fields
    pub fn bounds(&self) -> PriceBounds {
        PriceBounds {
            min_price: parse_price(&self.min_text),
            max_price: parse_price(&self.max_text),
        }
    }

    pub fn set_min_text(&mut self, value: impl Into<String>) {
        self.min_text = value.into();
        self.debouncer.call(self.bounds());
    }

    pub fn set_max_text(&mut self, value: impl Into<String>) {
        self.max_text = value.into();
        self.debouncer.call(self.bounds());
    }

    /// The owner changed the bounds; rewrite the text without committing
    ///
    /// Text already showing `bounds` (including partial entries like "12.")
    /// is left alone, anything else is replaced.
    pub fn sync_external(&mut self, bounds: PriceBounds) {
        if text_shows(&self.min_text, bounds.min_price) && text_shows(&self.max_text, bounds.max_price) {
            return;
        }
        self.debouncer.cancel();
        self.min_text = bound_text(bounds.min_price);
        self.max_text = bound_text(bounds.max_price);
    }

    pub fn set_on_commit(&self, on_commit: impl Fn(PriceBounds) + Send + Sync + 'static) {
        self.debouncer.set_handler(on_commit);
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}
