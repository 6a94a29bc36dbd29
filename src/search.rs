use crate::DEFAULT_SEARCH_DEBOUNCE_MS;

/// Debounced search-box state.
///
/// The quiet period is tracked with a generation counter instead of timer
/// cancellation: every accepted keystroke arms a fresh shell timer tagged
/// with the new generation, and only the timer whose tag still matches when
/// it fires is allowed to settle. Earlier timers land as [`SettleOutcome::Stale`]
/// and are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub input: String,
    settled: String,
    pub delay_ms: u64,
    generation: u64,
    pub disabled: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            input: String::new(),
            settled: String::new(),
            delay_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            generation: 0,
            disabled: false,
        }
    }
}

/// Timer the shell should arm after a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTimer {
    pub id: u64,
    pub delay_ms: u64,
}

/// What a finished quiet period amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Superseded by a newer keystroke; ignore entirely.
    Stale,
    /// Quiet period ended but there is nothing new to announce.
    NoChange,
    /// The settled text changed to a searchable value (delivered untrimmed).
    Trigger(String),
}

impl SearchState {
    /// Record a keystroke and say which timer to arm, if any.
    ///
    /// Unchanged text does not restart the quiet period, and a disabled
    /// search box accepts no input at all.
    pub fn input_changed(&mut self, text: String) -> Option<DebounceTimer> {
        if self.disabled || text == self.input {
            return None;
        }
        self.input = text;
        self.generation += 1;
        Some(DebounceTimer {
            id: self.generation,
            delay_ms: self.delay_ms,
        })
    }

    /// A shell timer fired. Only the latest generation may settle; a settled
    /// value triggers a search when it differs from the previous one and is
    /// not blank after trimming. The triggered value itself stays untrimmed.
    pub fn timer_elapsed(&mut self, id: u64) -> SettleOutcome {
        if id != self.generation {
            return SettleOutcome::Stale;
        }
        if self.input == self.settled {
            return SettleOutcome::NoChange;
        }
        self.settled = self.input.clone();
        if self.settled.trim().is_empty() {
            SettleOutcome::NoChange
        } else {
            SettleOutcome::Trigger(self.settled.clone())
        }
    }

    /// Enter fast-path: submit the raw input immediately. The blank-guard
    /// does not apply here, and any pending quiet period keeps running.
    #[must_use]
    pub fn submit(&self) -> Option<String> {
        if self.disabled {
            return None;
        }
        Some(self.input.clone())
    }

    /// Reconfigure the quiet period. Takes effect from the next keystroke;
    /// a timer that is already running keeps its original delay.
    pub fn set_delay(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn settled(&self) -> &str {
        &self.settled
    }
}
