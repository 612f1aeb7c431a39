use serde::{Deserialize, Serialize};

use passforge_core::{ExpandLimits, FieldSchema, FieldsSchema};

use crate::combinator::CombinatorLimits;
use crate::synth::{
    FIELD_ALL_CHARACTERS, FIELD_EASY_TO_READ, FIELD_EASY_TO_SAY, FIELD_LOWER_CASE, FIELD_NUMBERS,
    FIELD_PASSWORD_LENGTH, FIELD_SYMBOLS, FIELD_UPPER_CASE, LengthLimits,
};
use crate::validate::ValidatorConfig;

/// How sampled combinations are picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Independent uniform draws per field.
    #[default]
    Random,
    /// Every distinct combination once, in shuffled order.
    Exhaustive,
}

/// Settings for one generation run, loadable from TOML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationProfile {
    pub length_min: usize,
    pub length_max: usize,
    /// Copies appended for every drawn combination.
    pub copies_per_length: u64,
    /// Reject repeated combinations while sampling.
    pub unique: bool,
    /// Seed for the run RNG. A fresh seed is drawn and reported when absent.
    pub seed: Option<u64>,
    /// Number of draws. Defaults to the distinct combination count.
    pub count: Option<u64>,
    pub strategy: SamplingStrategy,
    pub easy_to_say: bool,
    pub easy_to_read: bool,
    pub all_characters: bool,
    pub upper_case: bool,
    pub lower_case: bool,
    pub numbers: bool,
    pub symbols: bool,
    pub limits: LengthLimits,
    pub validator: ValidatorConfig,
    pub combinator: CombinatorLimits,
    pub expand: ExpandLimits,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            length_min: 10,
            length_max: 20,
            copies_per_length: 1,
            unique: false,
            seed: None,
            count: None,
            strategy: SamplingStrategy::Random,
            easy_to_say: true,
            easy_to_read: true,
            all_characters: true,
            upper_case: true,
            lower_case: true,
            numbers: true,
            symbols: true,
            limits: LengthLimits::default(),
            validator: ValidatorConfig::default(),
            combinator: CombinatorLimits::default(),
            expand: ExpandLimits::default(),
        }
    }
}

impl GenerationProfile {
    /// Schema sampled by the run: the length range plus one pinned boolean
    /// per toggle.
    pub fn fields_schema(&self) -> FieldsSchema {
        let length_min = i64::try_from(self.length_min).unwrap_or(i64::MAX);
        let length_max = i64::try_from(self.length_max).unwrap_or(i64::MAX);

        FieldsSchema::new()
            .with_field(FIELD_PASSWORD_LENGTH, FieldSchema::number(length_min, length_max))
            .with_field(FIELD_EASY_TO_SAY, FieldSchema::fixed_boolean(self.easy_to_say))
            .with_field(FIELD_EASY_TO_READ, FieldSchema::fixed_boolean(self.easy_to_read))
            .with_field(FIELD_ALL_CHARACTERS, FieldSchema::fixed_boolean(self.all_characters))
            .with_field(FIELD_UPPER_CASE, FieldSchema::fixed_boolean(self.upper_case))
            .with_field(FIELD_LOWER_CASE, FieldSchema::fixed_boolean(self.lower_case))
            .with_field(FIELD_NUMBERS, FieldSchema::fixed_boolean(self.numbers))
            .with_field(FIELD_SYMBOLS, FieldSchema::fixed_boolean(self.symbols))
    }
}
