use crate::session::SessionConfig;
use serde::Deserialize;

/// a draggable token with a stable identity; only ever relocated, never mutated
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Word {
    pub id: String,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Results,
}

/// represents one play-through of a round being displayed to the user
#[derive(Debug, Clone)]
pub struct Game {
    pub pool: Vec<Word>,
    pub blanks: Vec<Option<Word>>,
    pub answer_key: Vec<String>,
    pub seconds_remaining: u32,
    pub phase: Phase,
    pub score: Option<f64>,
    pub session_config: SessionConfig,
    initial_words: Vec<Word>,
}

impl Game {
    pub fn new(words: Vec<Word>, answer_key: Vec<String>, session_config: SessionConfig) -> Self {
        let blanks = vec![None; answer_key.len()];
        Self {
            pool: words.clone(),
            blanks,
            answer_key,
            seconds_remaining: session_config.total_secs,
            phase: Phase::Playing,
            score: None,
            session_config,
            initial_words: words,
        }
    }

    /// Move the word with `word_id` into `blanks[slot]`, taking it out of the
    /// pool or out of whichever blank currently holds it. A word already in
    /// the target slot discards and replaces it. Unknown ids, out-of-range
    /// slots and calls after the session has finished are silent no-ops.
    pub fn place_word(&mut self, word_id: &str, slot: usize) {
        if self.phase == Phase::Results || slot >= self.blanks.len() {
            return;
        }

        let word = if let Some(idx) = self.pool.iter().position(|w| w.id == word_id) {
            self.pool.remove(idx)
        } else if let Some(occupied) = self
            .blanks
            .iter_mut()
            .find(|b| b.as_ref().is_some_and(|w| w.id == word_id))
        {
            match occupied.take() {
                Some(w) => w,
                None => return,
            }
        } else {
            return;
        };

        self.blanks[slot] = Some(word);
    }

    /// Advance the countdown by one second. Reaching zero submits the round
    /// automatically; ticks arriving after the transition are ignored.
    pub fn tick(&mut self) {
        if self.phase == Phase::Results {
            return;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.submit();
        }
    }

    /// Manual submission is only offered once every blank is occupied;
    /// the timeout path submits regardless.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Playing && self.blanks.iter().all(|b| b.is_some())
    }

    pub fn submit(&mut self) {
        if self.phase == Phase::Results {
            return;
        }

        let correct = self
            .blanks
            .iter()
            .zip(&self.answer_key)
            .filter(|(blank, key)| blank.as_ref().is_some_and(|w| &w.id == *key))
            .count();

        self.score = Some(((correct as f64 / self.answer_key.len() as f64) * 100.0).round());
        self.phase = Phase::Results;
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Results
    }

    /// Restore the session to its configured starting point: full pool in
    /// presentation order, empty blanks, timer at the configured total.
    pub fn reset(&mut self) {
        self.pool = self.initial_words.clone();
        self.blanks = vec![None; self.answer_key.len()];
        self.seconds_remaining = self.session_config.total_secs;
        self.phase = Phase::Playing;
        self.score = None;
    }

    /// Segment `i` (0-indexed) of the progress bar counts as elapsed once
    /// `seconds_remaining <= total - (i + 1) * (total / segments)`.
    pub fn segment_elapsed(&self, i: u32) -> bool {
        let total = self.session_config.total_secs as f64;
        let per_segment = total / self.session_config.segments as f64;
        self.seconds_remaining as f64 <= total - (i + 1) as f64 * per_segment
    }

    pub fn elapsed_segments(&self) -> u32 {
        (0..self.session_config.segments)
            .filter(|&i| self.segment_elapsed(i))
            .count() as u32
    }
}
