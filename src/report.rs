use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write;

use crate::generator::TargetSequence;
use crate::stats::SessionStats;

/// One target word paired with the session's words per minute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub word: String,
    pub wpm: f64,
}

/// Final result of a session, created once when it finishes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
    pub total_wpm: f64,
    pub accuracy: f64,
    pub corpus: String,
    pub duration_secs: u64,
    pub stats: SessionStats,
    pub finished_at: DateTime<Local>,
}

pub struct ReportFormatter;

impl ReportFormatter {
    /// Pair every target word with `total_wpm`.
    /// No per-word rate is measured; each entry carries the session total.
    pub fn format(target: &TargetSequence, total_wpm: f64) -> Vec<ReportEntry> {
        target
            .words()
            .iter()
            .map(|word| ReportEntry {
                word: word.clone(),
                wpm: total_wpm,
            })
            .collect()
    }
}

impl Report {
    /// Summarize a finished session.
    ///
    /// WPM is measured against the configured duration and accuracy uses the
    /// final-report formula, so both are fixed once the session ends.
    pub fn new(
        target: &TargetSequence,
        corpus: &str,
        duration_secs: u64,
        stats: &SessionStats,
    ) -> Self {
        let total_wpm = stats.total_wpm(duration_secs);
        Self {
            entries: ReportFormatter::format(target, total_wpm),
            total_wpm,
            accuracy: stats.final_accuracy(),
            corpus: corpus.to_string(),
            duration_secs,
            stats: stats.clone(),
            finished_at: Local::now(),
        }
    }

    /// `word -> 12.0wpm` lines, one per target word
    pub fn to_text(&self) -> String {
        self.entries.iter().fold(String::new(), |mut out, entry| {
            let _ = writeln!(out, "{} -> {:?}wpm", entry.word, entry.wpm);
            out
        })
    }

    /// Timestamp-derived identifier used to name the persisted result
    pub fn identifier(&self) -> String {
        self.finished_at.format("%Y-%m-%d_%H-%M-%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::corpus::WordList;
    use crate::generator::{ParagraphGenerator, ScriptedSelector};
    use chrono::TimeZone;

    fn sequence(words: &[&str]) -> TargetSequence {
        let list = WordList::new("test", words.iter().copied()).unwrap();
        let mut generator =
            ParagraphGenerator::new(Box::new(ScriptedSelector::new(words.iter().copied())));
        generator.generate(&list, words.len()).unwrap()
    }

    fn typed(pairs: &[(&str, &str)]) -> SessionStats {
        let mut stats = SessionStats::new();
        for (expected, submitted) in pairs {
            stats.record(&classify(expected, submitted));
        }
        stats
    }

    #[test]
    fn every_word_gets_the_same_wpm() {
        let entries = ReportFormatter::format(&sequence(&["cat", "dog", "cat"]), 12.5);

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.wpm == 12.5));
        assert_eq!(entries[1].word, "dog");
    }

    #[test]
    fn text_rendering_keeps_decimal_point() {
        let stats = typed(&[("cat", "cat"), ("dog", "dog")]);
        let report = Report::new(&sequence(&["cat", "dog"]), "animals", 60, &stats);
        assert_eq!(report.to_text(), "cat -> 2.0wpm\ndog -> 2.0wpm\n");
    }

    #[test]
    fn report_is_built_from_the_session_summary() {
        let stats = typed(&[("cat", "cat"), ("dog", "dog")]);
        let report = Report::new(&sequence(&["cat", "dog"]), "animals", 60, &stats);

        assert_eq!(report.corpus, "animals");
        assert_eq!(report.duration_secs, 60);
        assert_eq!(report.total_wpm, 2.0);
        assert!(report.entries.iter().all(|e| e.wpm == 2.0));
        // (2 - 6) / 2 floors to zero
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.stats, stats);
    }

    #[test]
    fn accuracy_is_taken_from_stats_not_defaulted() {
        // empty submissions add words but no keystrokes
        let stats = typed(&[("cat", ""), ("dog", "")]);
        let report = Report::new(&sequence(&["cat", "dog"]), "animals", 30, &stats);

        assert_eq!(report.accuracy, 100.0);
        assert_eq!(report.total_wpm, 4.0);
    }

    #[test]
    fn identifier_is_timestamp() {
        let mut report = Report::new(&sequence(&["cat"]), "animals", 60, &SessionStats::new());
        report.finished_at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(report.identifier(), "2024-03-09_14-05-07");
    }

    #[test]
    fn serializes_to_json() {
        let stats = typed(&[("cat", "cat")]);
        let report = Report::new(&sequence(&["cat"]), "animals", 15, &stats);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_wpm"], 4.0);
        assert_eq!(json["corpus"], "animals");
        assert_eq!(json["entries"][0]["word"], "cat");
        assert_eq!(json["stats"]["words_typed"], 1);
    }
}
