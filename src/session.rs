use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Result, TypemasterError};
use crate::scoring::{self, Metrics};
use crate::timer::{Countdown, TickOutcome};
use crate::words::WordGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Every target word was committed.
    Completed,
    /// The countdown reached zero.
    TimeUp,
    /// Terminated by the caller before either of the above.
    Stopped,
}

/// Counters mutated on every keystroke and word commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionProgress {
    pub current_word_index: usize,
    pub partial_input: String,
    pub correct_word_count: usize,
    pub incorrect_word_count: usize,
    pub total_typed_chars: usize,
    pub correct_typed_chars: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTiming {
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
}

impl SessionTiming {
    /// Seconds from start to end, or to `now` while still running.
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).as_secs_f64(),
            (Some(start), None) => now.saturating_duration_since(start).as_secs_f64(),
            _ => 0.0,
        }
    }
}

/// Final outcome of a session. Produced once, at termination.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub wpm: f64,
    pub accuracy: f64,
    pub score: u64,
    pub correct_words: usize,
    pub incorrect_words: usize,
    pub word_target: usize,
    pub elapsed_secs: f64,
    pub reason: FinishReason,
}

/// Values recomputed for display on every keystroke and tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStats {
    pub wpm: f64,
    pub accuracy: f64,
    pub remaining_secs: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// The session is already finished.
    Ignored,
    /// Input stored as the in-flight word.
    Pending,
    /// A word attempt was committed and the session continues.
    Committed { correct: bool },
    /// The commit consumed the last word.
    Finished(SessionResult),
}

/// Live colouring of a single character of the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharMark {
    Pending,
    Correct,
    Incorrect,
    /// Typed past the end of the target word.
    Extra,
}

/// Characters credited for one committed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCredit {
    pub matched: bool,
    pub correct_chars: usize,
}

/// Credit an attempt against its target word.
///
/// An exact match earns the whole word plus its delimiter. Otherwise each
/// position that matches earns one character, and the delimiter is only
/// credited when the attempt is at least as long as the target.
pub fn credit_attempt(attempt: &str, target: &str) -> WordCredit {
    let target_len = target.chars().count();
    if attempt == target {
        return WordCredit {
            matched: true,
            correct_chars: target_len + 1,
        };
    }

    let positional = attempt
        .chars()
        .zip(target.chars())
        .filter(|(typed, expected)| typed == expected)
        .count();
    let delimiter = usize::from(attempt.chars().count() >= target_len);

    WordCredit {
        matched: false,
        correct_chars: positional + delimiter,
    }
}

fn is_word_boundary(raw: &str) -> bool {
    raw.ends_with(' ') || raw.ends_with('\n')
}

/// One typing test: target words, progress counters, timing and countdown.
#[derive(Debug)]
pub struct Session {
    words: Vec<String>,
    progress: SessionProgress,
    timing: SessionTiming,
    countdown: Countdown,
    status: SessionStatus,
    result: Option<SessionResult>,
}

impl Session {
    pub fn new(words: Vec<String>, countdown_secs: u32) -> Result<Self> {
        if words.is_empty() {
            return Err(TypemasterError::EmptyWordTarget);
        }
        if countdown_secs == 0 {
            return Err(TypemasterError::ZeroCountdown);
        }

        Ok(Self {
            words,
            progress: SessionProgress::default(),
            timing: SessionTiming::default(),
            countdown: Countdown::new(countdown_secs),
            status: SessionStatus::NotStarted,
            result: None,
        })
    }

    /// Generate a fresh word list of `word_target` words and wrap it.
    pub fn prepare(
        generator: &WordGenerator,
        word_target: usize,
        countdown_secs: u32,
    ) -> Result<Self> {
        if word_target == 0 {
            return Err(TypemasterError::EmptyWordTarget);
        }
        Self::new(generator.generate(word_target), countdown_secs)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_target(&self) -> usize {
        self.words.len()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words
            .get(self.progress.current_word_index)
            .map(String::as_str)
    }

    pub fn progress(&self) -> &SessionProgress {
        &self.progress
    }

    pub fn timing(&self) -> &SessionTiming {
        &self.timing
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn has_started(&self) -> bool {
        self.status != SessionStatus::NotStarted
    }

    pub fn has_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn on_input_change(&mut self, raw: &str) -> InputOutcome {
        self.on_input_change_at(raw, Instant::now())
    }

    /// Feed the full contents of the input field.
    ///
    /// A trailing space or newline commits the trimmed value as an attempt
    /// at the current word. Anything else replaces the in-flight word.
    /// The countdown is polled first, so input arriving at or after the
    /// deadline finishes the session as `TimeUp` without being counted.
    pub fn on_input_change_at(&mut self, raw: &str, now: Instant) -> InputOutcome {
        match self.status {
            SessionStatus::Finished => return InputOutcome::Ignored,
            SessionStatus::NotStarted if raw.is_empty() => {
                self.progress.partial_input.clear();
                return InputOutcome::Pending;
            }
            SessionStatus::NotStarted => self.begin(now),
            SessionStatus::InProgress => {
                // Late input must not be credited once the deadline has passed
                if let Some(result) = self.tick_at(now) {
                    return InputOutcome::Finished(result);
                }
            }
        }

        if !is_word_boundary(raw) {
            self.progress.partial_input = raw.to_string();
            return InputOutcome::Pending;
        }

        let correct = self.commit(raw);
        if self.progress.current_word_index >= self.words.len() {
            if let Some(result) = self.finish(now, FinishReason::Completed) {
                return InputOutcome::Finished(result);
            }
        }
        InputOutcome::Committed { correct }
    }

    pub fn tick(&mut self) -> Option<SessionResult> {
        self.tick_at(Instant::now())
    }

    /// Advance the countdown. Returns the result if time just ran out.
    pub fn tick_at(&mut self, now: Instant) -> Option<SessionResult> {
        if self.has_finished() {
            return None;
        }
        match self.countdown.poll(now) {
            TickOutcome::Expired => self.finish(now, FinishReason::TimeUp),
            TickOutcome::Ticked(_) | TickOutcome::Idle => None,
        }
    }

    pub fn terminate(&mut self) -> Option<SessionResult> {
        self.terminate_at(Instant::now())
    }

    /// End the session now. Only the first call produces a result.
    pub fn terminate_at(&mut self, now: Instant) -> Option<SessionResult> {
        let reason = if self.progress.current_word_index >= self.words.len() {
            FinishReason::Completed
        } else {
            FinishReason::Stopped
        };
        self.finish(now, reason)
    }

    pub fn live(&self) -> LiveStats {
        self.live_at(Instant::now())
    }

    pub fn live_at(&self, now: Instant) -> LiveStats {
        let Metrics { wpm, accuracy } = scoring::calculate(
            self.progress.correct_typed_chars,
            self.progress.total_typed_chars,
            self.timing.elapsed_secs(now),
        );
        LiveStats {
            wpm,
            accuracy,
            remaining_secs: self.countdown.remaining_secs(),
        }
    }

    /// Position-by-position comparison of the in-flight word with its target.
    pub fn char_marks(&self) -> Vec<(char, CharMark)> {
        let Some(target) = self.current_word() else {
            return Vec::new();
        };
        let target: Vec<char> = target.chars().collect();
        let typed: Vec<char> = self.progress.partial_input.chars().collect();

        (0..target.len().max(typed.len()))
            .filter_map(|idx| match (target.get(idx), typed.get(idx)) {
                (Some(&expected), Some(&actual)) if expected == actual => {
                    Some((expected, CharMark::Correct))
                }
                (Some(&expected), Some(_)) => Some((expected, CharMark::Incorrect)),
                (Some(&expected), None) => Some((expected, CharMark::Pending)),
                (None, Some(&actual)) => Some((actual, CharMark::Extra)),
                (None, None) => None,
            })
            .collect()
    }

    /// Stop the countdown ahead of discarding an unfinished session.
    pub fn abandon(&mut self) {
        if self.status == SessionStatus::InProgress {
            debug!(
                word = self.progress.current_word_index,
                "abandoning session in progress"
            );
        }
        self.countdown.stop();
    }

    /// Replace the word list and clear every counter.
    pub fn reset_with_words(&mut self, words: Vec<String>) -> Result<()> {
        if words.is_empty() {
            return Err(TypemasterError::EmptyWordTarget);
        }
        self.countdown.reset();
        self.words = words;
        self.progress = SessionProgress::default();
        self.timing = SessionTiming::default();
        self.status = SessionStatus::NotStarted;
        self.result = None;
        Ok(())
    }

    /// Regenerate the word list at a new length and clear every counter.
    pub fn reset(&mut self, generator: &WordGenerator, word_target: usize) -> Result<()> {
        if word_target == 0 {
            return Err(TypemasterError::EmptyWordTarget);
        }
        self.reset_with_words(generator.generate(word_target))
    }

    fn begin(&mut self, now: Instant) {
        self.timing.started_at = Some(now);
        self.status = SessionStatus::InProgress;
        self.countdown.start(now);
        info!(
            words = self.words.len(),
            countdown = self.countdown.remaining_secs(),
            "session started"
        );
    }

    fn commit(&mut self, raw: &str) -> bool {
        let attempt = raw.trim();
        let Some(target) = self.words.get(self.progress.current_word_index) else {
            return false;
        };
        let credit = credit_attempt(attempt, target);

        debug!(
            index = self.progress.current_word_index,
            target = %target,
            attempt = %attempt,
            matched = credit.matched,
            credited = credit.correct_chars,
            "word committed"
        );

        if credit.matched {
            self.progress.correct_word_count += 1;
        } else {
            self.progress.incorrect_word_count += 1;
        }
        self.progress.correct_typed_chars += credit.correct_chars;
        self.progress.total_typed_chars += raw.chars().count();
        self.progress.partial_input.clear();
        self.progress.current_word_index += 1;

        credit.matched
    }

    /// A time-up never ends later than the deadline, however late it is noticed.
    fn end_instant(&self, now: Instant, reason: FinishReason) -> Instant {
        match (reason, self.timing.started_at) {
            (FinishReason::TimeUp, Some(start)) => {
                let limit = self.countdown.period() * self.countdown.initial_secs();
                now.min(start + limit)
            }
            _ => now,
        }
    }

    fn finish(&mut self, now: Instant, reason: FinishReason) -> Option<SessionResult> {
        if self.has_finished() {
            return None;
        }

        self.countdown.stop();
        if self.timing.ended_at.is_none() {
            self.timing.ended_at = Some(self.end_instant(now, reason));
        }
        self.status = SessionStatus::Finished;

        let elapsed_secs = self.timing.elapsed_secs(now);
        let Metrics { wpm, accuracy } = scoring::calculate(
            self.progress.correct_typed_chars,
            self.progress.total_typed_chars,
            elapsed_secs,
        );
        let result = SessionResult {
            wpm,
            accuracy,
            score: scoring::session_score(self.progress.correct_word_count, self.words.len()),
            correct_words: self.progress.correct_word_count,
            incorrect_words: self.progress.incorrect_word_count,
            word_target: self.words.len(),
            elapsed_secs,
            reason,
        };

        info!(
            ?reason,
            wpm = result.wpm,
            accuracy = result.accuracy,
            score = result.score,
            "session finished"
        );

        self.result = Some(result.clone());
        Some(result)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.countdown.stop();
    }
}
