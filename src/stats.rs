use serde::Serialize;

use crate::classifier::{Classification, Verdict};

/// Running counters for one session.
///
/// Live accuracy is `correct / typed`. Final accuracy compares the word
/// count against the keystroke total and floors at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub words_typed: u32,
    pub correct_words: u32,
    pub extra_words: u32,
    pub missed_words: u32,
    pub total_keystrokes: f64,
}

/// Snapshot of live metrics handed to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct LiveMetrics {
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    pub current_wpm: u64,
    pub average_wpm: f64,
    /// `None` until at least one word was typed
    pub accuracy: Option<f64>,
    pub progress: f64,
    pub current_word: Option<String>,
    pub next_word: Option<String>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submission(
        &mut self,
        classification: Classification,
        fully_consumed: bool,
        keystrokes: usize,
    ) {
        match classification {
            Classification::Exact => {
                self.words_typed += 1;
                self.correct_words += 1;
            }
            Classification::PartialPrefix => self.words_typed += 1,
            Classification::Mismatch => self.extra_words += 1,
        }

        if !fully_consumed {
            self.missed_words += 1;
        }

        self.total_keystrokes += keystrokes as f64;
    }

    pub fn record(&mut self, verdict: &Verdict) {
        self.record_submission(
            verdict.classification,
            verdict.fully_consumed,
            verdict.keystrokes,
        );
    }

    /// Words per minute over `elapsed_secs`; zero when no time has elapsed
    pub fn average_wpm(&self, elapsed_secs: f64) -> f64 {
        if elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.words_typed as f64 / (elapsed_secs / 60.0)
    }

    /// Integer display value of [`Self::average_wpm`], truncated toward zero
    pub fn current_wpm(&self, elapsed_secs: f64) -> u64 {
        self.average_wpm(elapsed_secs).trunc() as u64
    }

    pub fn accuracy(&self) -> Option<f64> {
        if self.words_typed == 0 {
            return None;
        }
        Some(self.correct_words as f64 / self.words_typed as f64 * 100.0)
    }

    /// Accuracy shown on the results screen, floored at zero.
    /// Zero when nothing was submitted.
    pub fn final_accuracy(&self) -> f64 {
        let total_typed = (self.words_typed + self.extra_words) as f64;
        if total_typed == 0.0 {
            return 0.0;
        }
        ((total_typed - self.total_keystrokes) / total_typed * 100.0).max(0.0)
    }

    /// Words per minute against the configured duration
    pub fn total_wpm(&self, duration_secs: u64) -> f64 {
        if duration_secs == 0 {
            return 0.0;
        }
        self.words_typed as f64 / (duration_secs as f64 / 60.0)
    }
}

/// Fraction of the configured duration that has elapsed, within `[0, 1]`
pub fn progress(elapsed_secs: u64, duration_secs: u64) -> f64 {
    if duration_secs == 0 {
        return 1.0;
    }
    (elapsed_secs as f64 / duration_secs as f64).clamp(0.0, 1.0)
}
