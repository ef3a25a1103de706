// web_app/discovery/search.rs - Search box state
//
// The text echoes every keystroke immediately; the committed term only
// reaches the controller through the debouncer.

use std::time::Duration;

use super::debounce::{Debouncer, Scheduler};

pub struct SearchInput<S: Scheduler> {
    text: String,
    debouncer: Debouncer<String, S>,
}

impl<S: Scheduler> SearchInput<S> {
    pub fn new(
        initial: impl Into<String>,
        scheduler: S,
        delay: Duration,
        on_commit: impl Fn(String) + Send + Sync + 'static,
    ) -> Self {
        Self {
            text: initial.into(),
            debouncer: Debouncer::new(scheduler, delay, on_commit),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// A keystroke: update the echo and (re)start the commit timer
    pub fn input(&mut self, value: impl Into<String>) {
        self.text = value.into();
        self.debouncer.call(self.text.clone());
    }

    /// The owner changed the term (e.g. "clear filters")
    ///
    /// Replaces the text without committing anything, and drops a pending
    /// commit of the text being replaced.
    pub fn sync_external(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value == self.text {
            return;
        }
        self.debouncer.cancel();
        self.text = value;
    }

    pub fn set_on_commit(&self, on_commit: impl Fn(String) + Send + Sync + 'static) {
        self.debouncer.set_handler(on_commit);
    }

    /// Teardown: nothing fires after this
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}
