use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use passforge_core::{FieldsSchema, GeneratedObject, SchemaEngine};

use crate::combinator::{Combinator, SampleRequest};
use crate::errors::{GenerationError, SynthesisError};
use crate::model::{GenerationOutcome, GenerationReport, ItemFailure, PasswordRow};
use crate::oracle::{StrengthOracle, ZxcvbnOracle};
use crate::profile::{GenerationProfile, SamplingStrategy};
use crate::synth::{PasswordSynthesizer, SynthesisOptions};
use crate::validate::PasswordValidator;

/// Schema engine, combinator, synthesizer and validator wired together.
#[derive(Debug, Clone)]
pub struct GenerationDriver<O = ZxcvbnOracle> {
    engine: SchemaEngine,
    combinator: Combinator,
    synthesizer: PasswordSynthesizer,
    validator: PasswordValidator<O>,
}

impl GenerationDriver<ZxcvbnOracle> {
    pub fn from_profile(profile: &GenerationProfile) -> Self {
        Self::with_oracle(profile, ZxcvbnOracle)
    }
}

impl<O: StrengthOracle> GenerationDriver<O> {
    pub fn new(
        engine: SchemaEngine,
        combinator: Combinator,
        synthesizer: PasswordSynthesizer,
        validator: PasswordValidator<O>,
    ) -> Self {
        Self {
            engine,
            combinator,
            synthesizer,
            validator,
        }
    }

    /// Driver configured from a profile, scoring with `oracle`.
    pub fn with_oracle(profile: &GenerationProfile, oracle: O) -> Self {
        Self::new(
            SchemaEngine::new(profile.expand),
            Combinator::new(profile.combinator),
            PasswordSynthesizer::new(profile.limits),
            PasswordValidator::new(profile.validator.clone(), oracle),
        )
    }

    /// Run the profile end to end.
    ///
    /// Schema and sampling errors abort the run. Per-item errors are
    /// collected in `failures` and the remaining items still produce rows.
    pub fn run(&self, profile: &GenerationProfile) -> Result<GenerationOutcome, GenerationError> {
        self.run_as(&uuid::Uuid::new_v4().to_string(), profile)
    }

    /// Same as [`GenerationDriver::run`] under a caller-chosen run id.
    pub fn run_as(
        &self,
        run_id: &str,
        profile: &GenerationProfile,
    ) -> Result<GenerationOutcome, GenerationError> {
        let start = Instant::now();
        let seed = profile.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut report = GenerationReport::new(run_id.to_string(), seed);

        info!(
            run_id = %run_id,
            seed,
            unique = profile.unique,
            copies = profile.copies_per_length,
            "generation started"
        );

        let schema = profile.fields_schema();
        let (objects, distinct) = match self.generate(&schema, profile, &mut rng) {
            Ok(generated) => generated,
            Err(err) => {
                warn!(run_id = %run_id, error = %err, "generation failed");
                return Err(err);
            }
        };
        report.distinct_combinations = distinct;
        report.objects_requested = objects.len() as u64;

        let (rows, failures) = self.drive(&objects, &mut rng);
        for row in &rows {
            report.record_row(row);
        }
        for _ in &failures {
            report.record_failure();
        }
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            rows = report.rows_generated,
            failed = report.items_failed,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationOutcome {
            rows,
            failures,
            report,
        })
    }

    /// Expand `schema` and sample the objects requested by `profile`.
    ///
    /// Returns the objects and the distinct combination count.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        schema: &FieldsSchema,
        profile: &GenerationProfile,
        rng: &mut R,
    ) -> Result<(Vec<GeneratedObject>, u64), GenerationError> {
        let candidates = self.engine.expand_resolved(schema)?;
        let distinct = self.combinator.count_combinations(&candidates)?;
        let target = match profile.count {
            Some(count) => count,
            None => {
                let limit = self.combinator.limits().max_product;
                if distinct > limit {
                    return Err(GenerationError::CombinationLimit {
                        size: u128::from(distinct),
                        limit,
                    });
                }
                distinct
            }
        };
        debug!(distinct, target, "combinations counted");

        let objects = match profile.strategy {
            SamplingStrategy::Random => self.combinator.sample(
                &candidates,
                &SampleRequest {
                    target,
                    enforce_uniqueness: profile.unique,
                    copies_per_draw: profile.copies_per_length,
                },
                rng,
            )?,
            SamplingStrategy::Exhaustive => {
                let drawn = self.combinator.enumerate_shuffled(&candidates, target, rng)?;
                let copies = profile.copies_per_length as usize;
                drawn
                    .into_iter()
                    .flat_map(|object| std::iter::repeat_n(object, copies))
                    .collect()
            }
        };
        Ok((objects, distinct))
    }

    /// Synthesize and validate every object. One failing item never stops
    /// the batch.
    pub fn drive<R: Rng + ?Sized>(
        &self,
        objects: &[GeneratedObject],
        rng: &mut R,
    ) -> (Vec<PasswordRow>, Vec<ItemFailure>) {
        let mut rows = Vec::with_capacity(objects.len());
        let mut failures = Vec::new();

        for object in objects {
            match self.process(object, rng) {
                Ok(row) => rows.push(row),
                Err(err) => {
                    warn!(values = %object.canonical_key(), error = %err, "item failed");
                    failures.push(ItemFailure {
                        values: object.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        (rows, failures)
    }

    /// Turn one sampled object into a validated row.
    pub fn process<R: Rng + ?Sized>(
        &self,
        object: &GeneratedObject,
        rng: &mut R,
    ) -> Result<PasswordRow, SynthesisError> {
        let options = SynthesisOptions::from_object(object)?;
        let password = self.synthesizer.synthesize(&options, rng)?;
        let validation = self.validator.validate(&password);
        Ok(PasswordRow::new(random_uuid(rng), password, object.clone(), validation))
    }
}

fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> uuid::Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}
