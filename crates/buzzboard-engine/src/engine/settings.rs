use std::{ops::RangeInclusive, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    core::{DEFAULT_WEAK_CATEGORY_COUNT, Round, ValueLadder},
    engine::narration::SpeechEstimate,
};

/// Valid number of categories on a board.
pub const CATEGORY_COUNT_RANGE: RangeInclusive<usize> = 3..=6;
/// Valid buzz window, in seconds.
pub const BUZZ_WINDOW_SECS_RANGE: RangeInclusive<f64> = 1.0..=15.0;
/// Valid blank delay, in milliseconds.
pub const BLANK_DELAY_MS_RANGE: RangeInclusive<u64> = 250..=5000;

const DEFAULT_CATEGORY_COUNT: usize = 4;
const DEFAULT_BUZZ_WINDOW: Duration = Duration::from_secs(5);
const DEFAULT_BLANK_DELAY: Duration = Duration::from_millis(2000);

/// Clamps a requested category count into [`CATEGORY_COUNT_RANGE`].
#[must_use]
pub fn clamp_category_count(count: i64) -> usize {
    let (lo, hi) = (
        *CATEGORY_COUNT_RANGE.start(),
        *CATEGORY_COUNT_RANGE.end(),
    );
    let clamped = usize::try_from(count.max(0)).map_or(hi, |count| count.clamp(lo, hi));
    if i64::try_from(clamped).ok() != Some(count) {
        tracing::debug!(requested = count, clamped, "category count clamped");
    }
    clamped
}

/// Clamps a buzz window in seconds into [`BUZZ_WINDOW_SECS_RANGE`].
///
/// A non-finite input falls back to the default window.
#[must_use]
pub fn clamp_buzz_window(secs: f64) -> Duration {
    if secs.is_nan() {
        tracing::debug!("buzz window is not a number, using default");
        return DEFAULT_BUZZ_WINDOW;
    }
    let clamped = secs.clamp(*BUZZ_WINDOW_SECS_RANGE.start(), *BUZZ_WINDOW_SECS_RANGE.end());
    if clamped.total_cmp(&secs).is_ne() {
        tracing::debug!(requested = secs, clamped, "buzz window clamped");
    }
    Duration::from_secs_f64(clamped)
}

/// Clamps a blank delay in milliseconds into [`BLANK_DELAY_MS_RANGE`].
#[must_use]
pub fn clamp_blank_delay(ms: i64) -> Duration {
    let (lo, hi) = (*BLANK_DELAY_MS_RANGE.start(), *BLANK_DELAY_MS_RANGE.end());
    let clamped = u64::try_from(ms).map_or(lo, |ms| ms.clamp(lo, hi));
    if u64::try_from(ms).ok() != Some(clamped) {
        tracing::debug!(requested = ms, clamped, "blank delay clamped");
    }
    Duration::from_millis(clamped)
}

/// Trainer settings.
///
/// Every value is kept within its valid range: out-of-range input is clamped
/// to the nearest bound instead of being rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    category_count: usize,
    buzz_window: Duration,
    blank_delay: Duration,
    value_ladder: ValueLadder,
    eligible_round: Round,
    weak_category_count: usize,
    speech: SpeechEstimate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            category_count: DEFAULT_CATEGORY_COUNT,
            buzz_window: DEFAULT_BUZZ_WINDOW,
            blank_delay: DEFAULT_BLANK_DELAY,
            value_ladder: ValueLadder::standard(),
            eligible_round: Round::First,
            weak_category_count: DEFAULT_WEAK_CATEGORY_COUNT,
            speech: SpeechEstimate::default(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.category_count
    }

    #[must_use]
    pub fn buzz_window(&self) -> Duration {
        self.buzz_window
    }

    #[must_use]
    pub fn blank_delay(&self) -> Duration {
        self.blank_delay
    }

    #[must_use]
    pub fn value_ladder(&self) -> &ValueLadder {
        &self.value_ladder
    }

    #[must_use]
    pub fn eligible_round(&self) -> Round {
        self.eligible_round
    }

    #[must_use]
    pub fn weak_category_count(&self) -> usize {
        self.weak_category_count
    }

    #[must_use]
    pub fn speech(&self) -> &SpeechEstimate {
        &self.speech
    }

    #[must_use]
    pub fn with_category_count(self, count: i64) -> Self {
        Self {
            category_count: clamp_category_count(count),
            ..self
        }
    }

    #[must_use]
    pub fn with_buzz_window_secs(self, secs: f64) -> Self {
        Self {
            buzz_window: clamp_buzz_window(secs),
            ..self
        }
    }

    #[must_use]
    pub fn with_blank_delay_ms(self, ms: i64) -> Self {
        Self {
            blank_delay: clamp_blank_delay(ms),
            ..self
        }
    }

    #[must_use]
    pub fn with_value_ladder(self, value_ladder: ValueLadder) -> Self {
        Self {
            value_ladder,
            ..self
        }
    }

    #[must_use]
    pub fn with_eligible_round(self, eligible_round: Round) -> Self {
        Self {
            eligible_round,
            ..self
        }
    }

    #[must_use]
    pub fn with_weak_category_count(self, weak_category_count: usize) -> Self {
        Self {
            weak_category_count,
            ..self
        }
    }

    #[must_use]
    pub fn with_speech(self, speech: SpeechEstimate) -> Self {
        Self { speech, ..self }
    }
}

/// Serialized form of [`Settings`].
///
/// Every field is optional; missing fields keep their defaults and present
/// fields are clamped when converted into [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub category_count: Option<i64>,
    pub buzz_window_seconds: Option<f64>,
    pub blank_delay_ms: Option<i64>,
    pub value_ladder: Option<ValueLadder>,
    pub eligible_round: Option<Round>,
    pub weak_category_count: Option<usize>,
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let mut settings = Settings::default();
        if let Some(count) = file.category_count {
            settings = settings.with_category_count(count);
        }
        if let Some(secs) = file.buzz_window_seconds {
            settings = settings.with_buzz_window_secs(secs);
        }
        if let Some(ms) = file.blank_delay_ms {
            settings = settings.with_blank_delay_ms(ms);
        }
        if let Some(ladder) = file.value_ladder {
            settings = settings.with_value_ladder(ladder);
        }
        if let Some(round) = file.eligible_round {
            settings = settings.with_eligible_round(round);
        }
        if let Some(count) = file.weak_category_count {
            settings = settings.with_weak_category_count(count);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let settings = Settings::default();
        assert!(CATEGORY_COUNT_RANGE.contains(&settings.category_count()));
        assert!(BUZZ_WINDOW_SECS_RANGE.contains(&settings.buzz_window().as_secs_f64()));
        let blank_ms = u64::try_from(settings.blank_delay().as_millis()).unwrap();
        assert!(BLANK_DELAY_MS_RANGE.contains(&blank_ms));
    }

    #[test]
    fn test_category_count_clamped() {
        assert_eq!(clamp_category_count(1), 3);
        assert_eq!(clamp_category_count(-7), 3);
        assert_eq!(clamp_category_count(5), 5);
        assert_eq!(clamp_category_count(60), 6);
    }

    #[test]
    fn test_buzz_window_clamped() {
        assert_eq!(clamp_buzz_window(0.2), Duration::from_secs(1));
        assert_eq!(clamp_buzz_window(7.5), Duration::from_millis(7500));
        assert_eq!(clamp_buzz_window(99.0), Duration::from_secs(15));
        assert_eq!(clamp_buzz_window(f64::INFINITY), Duration::from_secs(15));
        assert_eq!(clamp_buzz_window(f64::NAN), DEFAULT_BUZZ_WINDOW);
    }

    #[test]
    fn test_blank_delay_clamped() {
        assert_eq!(clamp_blank_delay(10), Duration::from_millis(250));
        assert_eq!(clamp_blank_delay(-10), Duration::from_millis(250));
        assert_eq!(clamp_blank_delay(1500), Duration::from_millis(1500));
        assert_eq!(clamp_blank_delay(60_000), Duration::from_millis(5000));
    }

    #[test]
    fn test_settings_file_overrides_and_clamps() {
        let file: SettingsFile = serde_json::from_str(
            r#"{ "category_count": 9, "buzz_window_seconds": 3, "value_ladder": [100, 200, 300] }"#,
        )
        .unwrap();
        let settings = Settings::from(file);
        assert_eq!(settings.category_count(), 6);
        assert_eq!(settings.buzz_window(), Duration::from_secs(3));
        assert_eq!(settings.blank_delay(), DEFAULT_BLANK_DELAY);
        assert_eq!(settings.value_ladder().values(), [100, 200, 300]);
    }

    #[test]
    fn test_settings_file_rejects_unknown_fields() {
        let result = serde_json::from_str::<SettingsFile>(r#"{ "categories": 4 }"#);
        assert!(result.is_err());
    }
}
