//! Password validation.
//!
//! Four independent checks run on every password: oracle strength, character
//! variety, banned substrings and consecutive same-class runs. Only the
//! strength check decides `success` and `score`; every failing check
//! contributes to `message`.

use serde::{Deserialize, Serialize};

use crate::oracle::{StrengthEstimate, StrengthOracle, ZxcvbnOracle};
use crate::synth::SYMBOLS;

pub const DEFAULT_BANNED: [&str; 3] = ["password", "123456", "qwerty"];
pub const DEFAULT_CONSECUTIVE_LIMIT: usize = 3;
pub const DEFAULT_MIN_VARIETY: usize = 3;
/// Minimum oracle score for the strength check to pass.
pub const SUFFICIENT_SCORE: u8 = 3;
pub const STRONG_PASSWORD_MESSAGE: &str =
    "Password is strong! It meets all the criteria to resist attacks.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Substrings rejected case-insensitively.
    pub banned: Vec<String>,
    pub consecutive_limit: usize,
    pub min_variety: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            banned: DEFAULT_BANNED.iter().map(|entry| entry.to_string()).collect(),
            consecutive_limit: DEFAULT_CONSECUTIVE_LIMIT,
            min_variety: DEFAULT_MIN_VARIETY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Digit,
    Lowercase,
    Uppercase,
    Symbol,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Uppercase,
        CharClass::Lowercase,
        CharClass::Digit,
        CharClass::Symbol,
    ];

    /// Class of `c`, or `None` for characters outside the four classes.
    pub fn of(c: char) -> Option<Self> {
        if c.is_ascii_digit() {
            Some(CharClass::Digit)
        } else if c.is_ascii_lowercase() {
            Some(CharClass::Lowercase)
        } else if c.is_ascii_uppercase() {
            Some(CharClass::Uppercase)
        } else if SYMBOLS.contains(c) {
            Some(CharClass::Symbol)
        } else {
            None
        }
    }

    fn run_label(self) -> &'static str {
        match self {
            CharClass::Digit => "digits",
            CharClass::Lowercase => "lowercase letters",
            CharClass::Uppercase => "uppercase letters",
            CharClass::Symbol => "symbols",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Strength,
    Variety,
    Banned,
    Patterns,
}

/// A maximal run of same-class characters at or above the limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFinding {
    pub class: CharClass,
    pub run: String,
    /// Character offset of the run.
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub kind: CheckKind,
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<RunFinding>,
}

impl CheckReport {
    fn new(kind: CheckKind, passed: bool, message: String) -> Self {
        Self {
            kind,
            passed,
            message,
            banned: None,
            runs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub success: bool,
    pub score: Option<u8>,
    pub detailed_score: Option<StrengthEstimate>,
    pub message: Vec<String>,
    pub checks: Vec<CheckReport>,
}

/// Runs the four checks against a configured banned list and run limit.
#[derive(Debug, Clone)]
pub struct PasswordValidator<O = ZxcvbnOracle> {
    config: ValidatorConfig,
    oracle: O,
}

impl Default for PasswordValidator<ZxcvbnOracle> {
    fn default() -> Self {
        Self::new(ValidatorConfig::default(), ZxcvbnOracle)
    }
}

impl<O: StrengthOracle> PasswordValidator<O> {
    pub fn new(config: ValidatorConfig, oracle: O) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn validate(&self, password: &str) -> ValidationResult {
        self.validate_with_variety(password, self.config.min_variety)
    }

    pub fn validate_with_variety(&self, password: &str, min_variety: usize) -> ValidationResult {
        let estimate = self.oracle.estimate(password);
        let strength = check_strength(estimate.score);
        let checks = vec![
            strength,
            check_variety(password, min_variety),
            self.check_banned(password),
            self.check_patterns(password),
        ];

        let mut message: Vec<String> = checks
            .iter()
            .filter(|check| !check.passed)
            .map(|check| check.message.clone())
            .collect();
        if message.is_empty() {
            message.push(STRONG_PASSWORD_MESSAGE.to_string());
        }

        ValidationResult {
            success: checks[0].passed,
            score: Some(estimate.score),
            detailed_score: Some(estimate),
            message,
            checks,
        }
    }

    fn check_banned(&self, password: &str) -> CheckReport {
        let lowered = password.to_lowercase();
        let found = self
            .config
            .banned
            .iter()
            .filter(|entry| !entry.is_empty())
            .find(|entry| lowered.contains(&entry.to_lowercase()));

        match found {
            Some(entry) => {
                let mut report = CheckReport::new(
                    CheckKind::Banned,
                    false,
                    format!(
                        "Password is a common or easily guessable password. Found in banned passwords: '{entry}'."
                    ),
                );
                report.banned = Some(entry.clone());
                report
            }
            None => CheckReport::new(
                CheckKind::Banned,
                true,
                "Password is not a common or easily guessable password.".to_string(),
            ),
        }
    }

    fn check_patterns(&self, password: &str) -> CheckReport {
        let limit = self.config.consecutive_limit.max(1);
        let runs = consecutive_runs(password, limit);
        if runs.is_empty() {
            return CheckReport::new(
                CheckKind::Patterns,
                true,
                "Password does not contain common patterns.".to_string(),
            );
        }

        let mut message = String::from("Password contains common patterns:");
        for finding in &runs {
            message.push_str(&format!(
                "\nrepeated {limit} consecutive {}: '{}' found.",
                finding.class.run_label(),
                finding.run
            ));
        }
        let mut report = CheckReport::new(CheckKind::Patterns, false, message);
        report.runs = runs;
        report
    }
}

fn check_strength(score: u8) -> CheckReport {
    if score >= SUFFICIENT_SCORE {
        CheckReport::new(
            CheckKind::Strength,
            true,
            "Password strength is sufficient.".to_string(),
        )
    } else {
        CheckReport::new(
            CheckKind::Strength,
            false,
            "Password strength is not sufficient.".to_string(),
        )
    }
}

fn check_variety(password: &str, min_variety: usize) -> CheckReport {
    let variety = character_variety(password);
    if variety >= min_variety {
        CheckReport::new(
            CheckKind::Variety,
            true,
            format!(
                "Password contains at least {min_variety} character types (uppercase, lowercase, digits, symbols)."
            ),
        )
    } else {
        CheckReport::new(
            CheckKind::Variety,
            false,
            format!(
                "Password should include at least {min_variety} character types (uppercase, lowercase, digits, symbols)."
            ),
        )
    }
}

/// Number of character classes present in `password`.
pub fn character_variety(password: &str) -> usize {
    CharClass::ALL
        .iter()
        .filter(|class| password.chars().any(|c| CharClass::of(c) == Some(**class)))
        .count()
}

/// Maximal same-class runs of at least `limit` characters, in order of appearance.
pub fn consecutive_runs(password: &str, limit: usize) -> Vec<RunFinding> {
    let mut findings = Vec::new();
    let mut current: Option<(CharClass, usize, String)> = None;

    for (offset, c) in password.chars().enumerate() {
        let class = CharClass::of(c);
        if let Some((run_class, _, run)) = current.as_mut()
            && class == Some(*run_class)
        {
            run.push(c);
            continue;
        }
        if let Some(finished) = current.take() {
            push_run(&mut findings, finished, limit);
        }
        current = class.map(|class| (class, offset, c.to_string()));
    }
    if let Some(finished) = current {
        push_run(&mut findings, finished, limit);
    }
    findings
}

fn push_run(findings: &mut Vec<RunFinding>, (class, start, run): (CharClass, usize, String), limit: usize) {
    if run.chars().count() >= limit {
        findings.push(RunFinding { class, run, start });
    }
}

/// Human label for an oracle score.
pub fn strength_label(score: Option<u8>) -> &'static str {
    match score {
        Some(2) => "Fair",
        Some(3) => "Good",
        Some(4) => "Strong",
        _ => "Weak",
    }
}
