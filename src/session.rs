use std::time::Instant;
use tracing::{debug, info};

use crate::classifier::{classify, Verdict};
use crate::clock::{Clock, SystemClock};
use crate::corpus::CorpusStore;
use crate::error::{EngineError, Result};
use crate::generator::{ParagraphGenerator, TargetSequence, WordSelector, WORDS_PER_PARAGRAPH};
use crate::report::Report;
use crate::stats::{self, LiveMetrics, SessionStats};

/// Durations, in seconds, a session can be configured with
pub const AVAILABLE_TIMES: [u64; 7] = [15, 20, 45, 60, 90, 120, 300];

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Live(LiveMetrics),
    /// time ran out on this tick; the report is available from [`TestSession::report`]
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Next { verdict: Verdict, next_word: String },
    /// the last target word was consumed
    Finished { verdict: Verdict },
}

/// One typing test attempt: Idle -> Running -> Finished.
///
/// Owns every piece of mutable state of the attempt. `Finished` is terminal;
/// start a new attempt with a fresh instance.
pub struct TestSession {
    phase: SessionPhase,
    words_per_paragraph: usize,
    generator: ParagraphGenerator,
    clock: Box<dyn Clock>,
    corpus: String,
    duration_secs: u64,
    target: Option<TargetSequence>,
    cursor: usize,
    stats: SessionStats,
    started_at: Option<Instant>,
    elapsed_secs: u64,
    last_verdict: Option<Verdict>,
    report: Option<Report>,
}

impl TestSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            words_per_paragraph: WORDS_PER_PARAGRAPH,
            generator: ParagraphGenerator::default(),
            clock: Box::new(SystemClock),
            corpus: String::new(),
            duration_secs: 0,
            target: None,
            cursor: 0,
            stats: SessionStats::default(),
            started_at: None,
            elapsed_secs: 0,
            last_verdict: None,
            report: None,
        }
    }

    pub fn with_selector(mut self, selector: Box<dyn WordSelector>) -> Self {
        self.generator = ParagraphGenerator::new(selector);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_words_per_paragraph(mut self, words: usize) -> Self {
        self.words_per_paragraph = words;
        self
    }

    fn ensure_phase(&self, operation: &'static str, expected: SessionPhase) -> Result<()> {
        if self.phase != expected {
            return Err(EngineError::InvalidState {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Validate the selection, build the target sequence and start the clock
    pub fn start(
        &mut self,
        store: &dyn CorpusStore,
        corpus: Option<&str>,
        duration_secs: Option<u64>,
    ) -> Result<&TargetSequence> {
        self.ensure_phase("start", SessionPhase::Idle)?;

        let corpus = corpus
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| EngineError::InvalidConfig("no corpus selected".to_string()))?;
        let duration_secs = duration_secs
            .filter(|d| *d > 0)
            .ok_or_else(|| EngineError::InvalidConfig("no duration selected".to_string()))?;
        if !AVAILABLE_TIMES.contains(&duration_secs) {
            return Err(EngineError::InvalidConfig(format!(
                "duration {duration_secs}s is not one of {AVAILABLE_TIMES:?}"
            )));
        }

        let list = store.load(corpus)?;
        let target = self.generator.generate(&list, self.words_per_paragraph)?;

        self.corpus = corpus.to_string();
        self.duration_secs = duration_secs;
        self.cursor = 0;
        self.stats = SessionStats::default();
        self.elapsed_secs = 0;
        self.last_verdict = None;
        self.started_at = Some(self.clock.now());
        self.phase = SessionPhase::Running;

        info!(
            corpus,
            duration_secs,
            words = target.len(),
            corpus_size = list.len(),
            "session started"
        );

        Ok(self.target.insert(target))
    }

    /// Advance the clock-driven part of the session.
    ///
    /// Finishes the session once the configured duration has elapsed,
    /// otherwise returns fresh live metrics.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.ensure_phase("tick", SessionPhase::Running)?;

        let elapsed = self
            .started_at
            .map(|start| self.clock.now().saturating_duration_since(start).as_secs())
            .unwrap_or_default();
        self.elapsed_secs = elapsed.min(self.duration_secs);

        if elapsed >= self.duration_secs {
            self.finish();
            return Ok(TickOutcome::Finished);
        }

        Ok(TickOutcome::Live(self.metrics()))
    }

    /// Score `text` against the current target word and move to the next one
    pub fn submit(&mut self, text: &str) -> Result<SubmitOutcome> {
        self.ensure_phase("submit", SessionPhase::Running)?;

        let target = self.target.as_ref().ok_or(EngineError::InvalidState {
            operation: "submit",
            phase: self.phase,
        })?;
        let expected = target.get(self.cursor).ok_or(EngineError::InvalidState {
            operation: "submit",
            phase: self.phase,
        })?;

        let verdict = classify(expected, text);
        debug!(
            expected,
            submitted = text.trim(),
            classification = ?verdict.classification,
            fully_consumed = verdict.fully_consumed,
            "submission scored"
        );

        self.stats.record(&verdict);
        self.last_verdict = Some(verdict);
        self.cursor += 1;

        match target.get(self.cursor) {
            Some(next) => Ok(SubmitOutcome::Next {
                verdict,
                next_word: next.to_string(),
            }),
            None => {
                self.finish();
                Ok(SubmitOutcome::Finished { verdict })
            }
        }
    }

    fn finish(&mut self) {
        let total_wpm = self.stats.total_wpm(self.duration_secs);
        let report = self
            .target
            .as_ref()
            .map(|target| Report::new(target, &self.corpus, self.duration_secs, &self.stats));

        info!(
            corpus = %self.corpus,
            total_wpm,
            accuracy = self.stats.final_accuracy(),
            words_typed = self.stats.words_typed,
            correct_words = self.stats.correct_words,
            extra_words = self.stats.extra_words,
            missed_words = self.stats.missed_words,
            "session finished"
        );

        self.report = report;
        self.phase = SessionPhase::Finished;
    }

    /// Live metrics as of the last tick
    pub fn metrics(&self) -> LiveMetrics {
        let t = self.elapsed_secs as f64;
        LiveMetrics {
            elapsed_secs: self.elapsed_secs,
            remaining_secs: self.remaining_secs(),
            current_wpm: self.stats.current_wpm(t),
            average_wpm: self.stats.average_wpm(t),
            accuracy: self.stats.accuracy(),
            progress: stats::progress(self.elapsed_secs, self.duration_secs),
            current_word: self.current_word().map(str::to_string),
            next_word: self.next_word().map(str::to_string),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn has_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn target(&self) -> Option<&TargetSequence> {
        self.target.as_ref()
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn words_per_paragraph(&self) -> usize {
        self.words_per_paragraph
    }

    pub fn remaining_secs(&self) -> u64 {
        self.duration_secs.saturating_sub(self.elapsed_secs)
    }

    pub fn current_word(&self) -> Option<&str> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        self.target.as_ref()?.get(self.cursor)
    }

    pub fn next_word(&self) -> Option<&str> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        self.target.as_ref()?.get(self.cursor + 1)
    }

    pub fn last_verdict(&self) -> Option<&Verdict> {
        self.last_verdict.as_ref()
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSession")
            .field("phase", &self.phase)
            .field("corpus", &self.corpus)
            .field("duration_secs", &self.duration_secs)
            .field("cursor", &self.cursor)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
