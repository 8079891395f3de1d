use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::corpus::WordList;
use crate::error::{EngineError, Result};

/// Default number of target words per session
pub const WORDS_PER_PARAGRAPH: usize = 30;

/// Fixed-length sequence of target words for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSequence {
    words: Vec<String>,
}

impl TargetSequence {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.words.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Space separated rendering of the whole sequence
    pub fn paragraph(&self) -> String {
        self.words.iter().join(" ")
    }
}

/// Strategy drawing words from a list
pub trait WordSelector {
    /// Draw exactly `count` words, with replacement
    fn select_words(&mut self, list: &WordList, count: usize) -> Vec<String>;
}

fn draw_with_replacement<R: Rng + ?Sized>(rng: &mut R, list: &WordList, count: usize) -> Vec<String> {
    let words = list.words();
    (0..count)
        .map(|_| words[rng.gen_range(0..words.len())].clone())
        .collect()
}

/// Uniform draws from the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl WordSelector for RandomSelector {
    fn select_words(&mut self, list: &WordList, count: usize) -> Vec<String> {
        draw_with_replacement(&mut rand::thread_rng(), list, count)
    }
}

/// Uniform draws from a seeded generator, reproducible across runs
#[derive(Debug, Clone)]
pub struct SeededSelector {
    rng: StdRng,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl WordSelector for SeededSelector {
    fn select_words(&mut self, list: &WordList, count: usize) -> Vec<String> {
        draw_with_replacement(&mut self.rng, list, count)
    }
}

/// Replays forced draws in order, wrapping around when exhausted.
/// With no scripted draws it walks the word list itself.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSelector {
    draws: Vec<String>,
    next: usize,
}

impl ScriptedSelector {
    pub fn new<I, S>(draws: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            draws: draws.into_iter().map(Into::into).collect(),
            next: 0,
        }
    }
}

impl WordSelector for ScriptedSelector {
    fn select_words(&mut self, list: &WordList, count: usize) -> Vec<String> {
        let source = if self.draws.is_empty() {
            list.words()
        } else {
            self.draws.as_slice()
        };
        let picked: Vec<String> = source
            .iter()
            .cycle()
            .skip(self.next % source.len())
            .take(count)
            .cloned()
            .collect();
        self.next = (self.next + count) % source.len();
        picked
    }
}

/// Builds the target sequence for a session
pub struct ParagraphGenerator {
    selector: Box<dyn WordSelector>,
}

impl ParagraphGenerator {
    pub fn new(selector: Box<dyn WordSelector>) -> Self {
        Self { selector }
    }

    pub fn generate(&mut self, list: &WordList, count: usize) -> Result<TargetSequence> {
        if list.is_empty() {
            return Err(EngineError::EmptyCorpus(list.name().to_string()));
        }
        if count == 0 {
            return Err(EngineError::InvalidConfig(
                "words per paragraph must be at least 1".to_string(),
            ));
        }

        let words = self.selector.select_words(list, count);
        if words.len() != count {
            return Err(EngineError::InvalidConfig(format!(
                "selector produced {} words, expected {count}",
                words.len()
            )));
        }
        if let Some(stray) = words.iter().find(|w| !list.words().contains(*w)) {
            return Err(EngineError::InvalidConfig(format!(
                "selector drew '{stray}', which is not in corpus '{}'",
                list.name()
            )));
        }

        Ok(TargetSequence { words })
    }
}

impl Default for ParagraphGenerator {
    fn default() -> Self {
        Self::new(Box::new(RandomSelector))
    }
}

impl std::fmt::Debug for ParagraphGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParagraphGenerator").finish_non_exhaustive()
    }
}
