/// Characters that make up one "word" when converting to WPM.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Points awarded per correctly typed word.
pub const POINTS_PER_WORD: u64 = 10;

/// Session length that earns a one point bonus per correct word.
pub const BONUS_WORD_DIVISOR: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub wpm: f64,
    pub accuracy: f64,
}

/// Words per minute and accuracy percentage for the given counters.
///
/// Non-positive elapsed time yields 0 wpm and an empty input yields 0%
/// accuracy, so the function is safe to call before the first keystroke.
pub fn calculate(correct_chars: usize, total_chars: usize, elapsed_secs: f64) -> Metrics {
    let wpm = if elapsed_secs > 0.0 {
        (correct_chars as f64 / CHARS_PER_WORD) / (elapsed_secs / 60.0)
    } else {
        0.0
    };

    let accuracy = if total_chars > 0 {
        (correct_chars as f64 / total_chars as f64) * 100.0
    } else {
        0.0
    };

    Metrics { wpm, accuracy }
}

/// Flat per-word points plus a bonus scaled by the configured word target.
pub fn session_score(correct_words: usize, word_target: usize) -> u64 {
    let correct_words = correct_words as u64;
    correct_words * POINTS_PER_WORD + (correct_words * word_target as u64) / BONUS_WORD_DIVISOR
}
