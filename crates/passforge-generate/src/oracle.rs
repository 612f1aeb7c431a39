//! Strength oracle seam.
//!
//! The validator only depends on [`StrengthOracle`]. [`ZxcvbnOracle`] adapts
//! the `zxcvbn` estimator to the estimate shape used in password rows.

use serde::{Deserialize, Serialize};
use zxcvbn::matching::patterns::MatchPattern;
use zxcvbn::time_estimates::CrackTimeSeconds;

/// Pure password scorer: the same password always yields the same estimate.
pub trait StrengthOracle {
    fn estimate(&self, password: &str) -> StrengthEstimate;
}

impl<T: StrengthOracle + ?Sized> StrengthOracle for &T {
    fn estimate(&self, password: &str) -> StrengthEstimate {
        (**self).estimate(password)
    }
}

/// Detailed strength estimate returned by an oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthEstimate {
    /// 0 (weakest) to 4 (strongest).
    pub score: u8,
    pub guesses: f64,
    pub guesses_log10: f64,
    pub sequence: Vec<PatternMatch>,
    pub crack_times: CrackTimes,
    pub feedback: Feedback,
}

/// One matched pattern in the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: String,
    pub token: String,
    pub i: usize,
    pub j: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackTimes {
    /// 1e10 guesses per second.
    pub offline_fast_hashing: CrackTime,
    /// 1e4 guesses per second.
    pub offline_slow_hashing: CrackTime,
    /// 10 guesses per second.
    pub online_no_throttling: CrackTime,
    /// 100 guesses per hour.
    pub online_throttled: CrackTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackTime {
    pub seconds: f64,
    pub display: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub warning: Option<String>,
    pub suggestions: Vec<String>,
}

/// Oracle backed by the `zxcvbn` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZxcvbnOracle;

impl StrengthOracle for ZxcvbnOracle {
    fn estimate(&self, password: &str) -> StrengthEstimate {
        let entropy = zxcvbn::zxcvbn(password, &[]);
        let crack_times = entropy.crack_times();

        StrengthEstimate {
            score: u8::from(entropy.score()),
            guesses: entropy.guesses() as f64,
            guesses_log10: entropy.guesses_log10(),
            sequence: entropy
                .sequence()
                .iter()
                .map(|item| PatternMatch {
                    pattern: pattern_name(&item.pattern).to_string(),
                    token: item.token.clone(),
                    i: item.i,
                    j: item.j,
                })
                .collect(),
            crack_times: CrackTimes {
                offline_fast_hashing: crack_time(crack_times.offline_fast_hashing_1e10_per_second()),
                offline_slow_hashing: crack_time(crack_times.offline_slow_hashing_1e4_per_second()),
                online_no_throttling: crack_time(crack_times.online_no_throttling_10_per_second()),
                online_throttled: crack_time(crack_times.online_throttling_100_per_hour()),
            },
            feedback: entropy
                .feedback()
                .map(|feedback| Feedback {
                    warning: feedback.warning().map(|warning| warning.to_string()),
                    suggestions: feedback
                        .suggestions()
                        .iter()
                        .map(|suggestion| suggestion.to_string())
                        .collect(),
                })
                .unwrap_or_default(),
        }
    }
}

fn crack_time(value: CrackTimeSeconds) -> CrackTime {
    let seconds = match value {
        CrackTimeSeconds::Integer(seconds) => seconds as f64,
        CrackTimeSeconds::Float(seconds) => seconds,
    };
    CrackTime {
        seconds,
        display: value.to_string(),
    }
}

fn pattern_name(pattern: &MatchPattern) -> &'static str {
    match pattern {
        MatchPattern::Dictionary(_) => "dictionary",
        MatchPattern::Spatial(_) => "spatial",
        MatchPattern::Repeat(_) => "repeat",
        MatchPattern::Sequence(_) => "sequence",
        MatchPattern::Regex(_) => "regex",
        MatchPattern::Date(_) => "date",
        MatchPattern::BruteForce => "bruteforce",
    }
}
