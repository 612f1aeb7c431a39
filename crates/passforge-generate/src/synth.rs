use rand::Rng;
use serde::{Deserialize, Serialize};

use passforge_core::{FieldValue, GeneratedObject};

use crate::errors::SynthesisError;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Characters removed by `easy_to_read`.
pub const HARD_TO_READ: [char; 3] = ['o', 'O', '0'];

pub const FIELD_PASSWORD_LENGTH: &str = "passwordLength";
pub const FIELD_EASY_TO_SAY: &str = "easyToSay";
pub const FIELD_EASY_TO_READ: &str = "easyToRead";
pub const FIELD_ALL_CHARACTERS: &str = "allCharacters";
pub const FIELD_UPPER_CASE: &str = "upperCase";
pub const FIELD_LOWER_CASE: &str = "lowerCase";
pub const FIELD_NUMBERS: &str = "numbers";
pub const FIELD_SYMBOLS: &str = "symbols";

pub const DEFAULT_PASSWORD_LENGTH: usize = 12;
pub const DEFAULT_MIN_LENGTH: usize = 6;
pub const DEFAULT_MAX_LENGTH: usize = 700;

/// Toggles and length for one synthesized password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    pub length: usize,
    pub easy_to_say: bool,
    pub easy_to_read: bool,
    pub all_characters: bool,
    pub upper_case: bool,
    pub lower_case: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_PASSWORD_LENGTH,
            easy_to_say: true,
            easy_to_read: true,
            all_characters: true,
            upper_case: true,
            lower_case: true,
            numbers: true,
            symbols: true,
        }
    }
}

impl SynthesisOptions {
    /// Read options from a sampled object. Missing fields keep their defaults.
    pub fn from_object(object: &GeneratedObject) -> Result<Self, SynthesisError> {
        let defaults = Self::default();
        let length = match object.get(FIELD_PASSWORD_LENGTH) {
            None => defaults.length,
            // Negative lengths saturate to 0 so the length check rejects them.
            Some(value) => value
                .as_i64()
                .map(|length| usize::try_from(length).unwrap_or(0))
                .ok_or_else(|| invalid_option(FIELD_PASSWORD_LENGTH, "an integer", value))?,
        };

        Ok(Self {
            length,
            easy_to_say: read_flag(object, FIELD_EASY_TO_SAY, defaults.easy_to_say)?,
            easy_to_read: read_flag(object, FIELD_EASY_TO_READ, defaults.easy_to_read)?,
            all_characters: read_flag(object, FIELD_ALL_CHARACTERS, defaults.all_characters)?,
            upper_case: read_flag(object, FIELD_UPPER_CASE, defaults.upper_case)?,
            lower_case: read_flag(object, FIELD_LOWER_CASE, defaults.lower_case)?,
            numbers: read_flag(object, FIELD_NUMBERS, defaults.numbers)?,
            symbols: read_flag(object, FIELD_SYMBOLS, defaults.symbols)?,
        })
    }
}

fn read_flag(object: &GeneratedObject, name: &str, default: bool) -> Result<bool, SynthesisError> {
    match object.get(name) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| invalid_option(name, "a boolean", value)),
    }
}

fn invalid_option(name: &str, expected: &'static str, found: &FieldValue) -> SynthesisError {
    SynthesisError::InvalidOption {
        name: name.to_string(),
        expected,
        found: found.canonical(),
    }
}

/// Inclusive password length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthLimits {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for LengthLimits {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Assemble the character pool for a set of toggles.
///
/// Rules are additive and evaluated in order:
/// 1. `easy_to_say` adds both alphabets with `l` rewritten to `I`;
///    otherwise `lower_case`/`upper_case` add their alphabet.
/// 2. `easy_to_read` strips `o`, `O` and `0` from the pool built so far;
///    otherwise `numbers`/`symbols` add their sets.
/// 3. `all_characters` appends every letter, digit and symbol regardless of
///    the other toggles, so stripped characters can come back.
///
/// Duplicate entries are kept and weight the draw.
pub fn character_pool(options: &SynthesisOptions) -> Vec<char> {
    let mut pool: Vec<char> = Vec::new();

    if options.easy_to_say {
        pool.extend(
            LOWERCASE
                .chars()
                .chain(UPPERCASE.chars())
                .map(|c| if c == 'l' || c == 'I' { 'I' } else { c }),
        );
    } else {
        if options.lower_case {
            pool.extend(LOWERCASE.chars());
        }
        if options.upper_case {
            pool.extend(UPPERCASE.chars());
        }
    }

    if options.easy_to_read {
        pool.retain(|c| !HARD_TO_READ.contains(c));
    } else {
        if options.numbers {
            pool.extend(DIGITS.chars());
        }
        if options.symbols {
            pool.extend(SYMBOLS.chars());
        }
    }

    if options.all_characters {
        pool.extend(
            LOWERCASE
                .chars()
                .chain(UPPERCASE.chars())
                .chain(DIGITS.chars())
                .chain(SYMBOLS.chars()),
        );
    }

    pool
}

/// Draws passwords from the pool implied by the toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordSynthesizer {
    limits: LengthLimits,
}

impl PasswordSynthesizer {
    pub fn new(limits: LengthLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> LengthLimits {
        self.limits
    }

    /// Validate the options and return the pool without drawing.
    pub fn prepare(&self, options: &SynthesisOptions) -> Result<Vec<char>, SynthesisError> {
        if options.length < self.limits.min_length || options.length > self.limits.max_length {
            return Err(SynthesisError::LengthOutOfRange {
                length: options.length,
                min: self.limits.min_length,
                max: self.limits.max_length,
            });
        }

        let pool = character_pool(options);
        if pool.is_empty() {
            return Err(SynthesisError::EmptyPool);
        }
        Ok(pool)
    }

    /// Draw `length` characters uniformly from the pool, with replacement.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        options: &SynthesisOptions,
        rng: &mut R,
    ) -> Result<String, SynthesisError> {
        let pool = self.prepare(options)?;
        Ok((0..options.length)
            .map(|_| pool[rng.random_range(0..pool.len())])
            .collect())
    }
}
