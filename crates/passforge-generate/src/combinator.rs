use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use passforge_core::{FieldValue, GeneratedObject, ResolvedCandidates};

use crate::errors::GenerationError;

/// Default bound on the raw cartesian product walked by exhaustive sampling.
pub const DEFAULT_MAX_PRODUCT: u64 = 1_000_000;

const ATTEMPTS_PER_OBJECT: u64 = 50;
const MIN_ATTEMPTS: u64 = 1_000;

/// Bounds for counting and sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinatorLimits {
    /// Maximum raw product size enumerated by exhaustive sampling.
    pub max_product: u64,
    /// Maximum draws for a sampling run. `None` derives it from the request.
    pub max_attempts: Option<u64>,
}

impl Default for CombinatorLimits {
    fn default() -> Self {
        Self {
            max_product: DEFAULT_MAX_PRODUCT,
            max_attempts: None,
        }
    }
}

/// Parameters of a sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRequest {
    pub target: u64,
    pub enforce_uniqueness: bool,
    pub copies_per_draw: u64,
}

impl SampleRequest {
    /// Total number of objects the run must accept.
    pub fn requested(&self) -> Result<u64, GenerationError> {
        self.target.checked_mul(self.copies_per_draw).ok_or_else(|| {
            GenerationError::InvalidOptions(format!(
                "{} draws x {} copies overflows",
                self.target, self.copies_per_draw
            ))
        })
    }
}

/// Counts and samples combinations of resolved candidate lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct Combinator {
    limits: CombinatorLimits,
}

/// Count distinct combinations with default limits.
pub fn count_combinations(candidates: &ResolvedCandidates) -> Result<u64, GenerationError> {
    Combinator::default().count_combinations(candidates)
}

impl Combinator {
    pub fn new(limits: CombinatorLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> CombinatorLimits {
        self.limits
    }

    /// Number of distinct value tuples in the cartesian product.
    ///
    /// Tuples differ exactly when one position differs, so the count is the
    /// product of the distinct values per list. Duplicate values inside one
    /// list do not inflate it and the product is never walked.
    pub fn count_combinations(&self, candidates: &ResolvedCandidates) -> Result<u64, GenerationError> {
        let mut size: u128 = 1;
        for (_, values) in candidates.fields() {
            let distinct: HashSet<String> = values.iter().map(FieldValue::canonical).collect();
            size = size.saturating_mul(distinct.len() as u128);
        }
        u64::try_from(size).map_err(|_| GenerationError::CombinationLimit {
            size,
            limit: u64::MAX,
        })
    }

    /// Draw random combinations, one uniform value per field per draw.
    ///
    /// Each draw is appended `copies_per_draw` times. Under uniqueness a copy
    /// is kept only when its canonical form is new; skipped copies are not
    /// redrawn. Runs that cannot finish within the attempt budget fail with
    /// `CombinationBudgetExceeded`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        candidates: &ResolvedCandidates,
        request: &SampleRequest,
        rng: &mut R,
    ) -> Result<Vec<GeneratedObject>, GenerationError> {
        let requested = request.requested()?;
        if requested == 0 {
            return Ok(Vec::new());
        }

        if let Some((name, _)) = candidates.fields().iter().find(|(_, values)| values.is_empty()) {
            return Err(GenerationError::EmptyCandidates(name.clone()));
        }

        if request.enforce_uniqueness {
            let distinct = self.count_combinations(candidates)?;
            if requested > distinct {
                return Err(GenerationError::CombinationBudgetExceeded {
                    requested,
                    accepted: 0,
                    attempts: 0,
                    distinct: Some(distinct),
                });
            }
        }

        let budget = self
            .limits
            .max_attempts
            .unwrap_or_else(|| requested.saturating_mul(ATTEMPTS_PER_OBJECT).max(MIN_ATTEMPTS));

        let mut generated = Vec::new();
        let mut seen = HashSet::new();
        let mut attempts = 0_u64;

        while (generated.len() as u64) < requested {
            if attempts >= budget {
                return Err(GenerationError::CombinationBudgetExceeded {
                    requested,
                    accepted: generated.len() as u64,
                    attempts,
                    distinct: None,
                });
            }
            attempts += 1;

            let object = draw(candidates, rng);
            for _ in 0..request.copies_per_draw {
                if generated.len() as u64 == requested {
                    break;
                }
                if request.enforce_uniqueness && !seen.insert(object.canonical_key()) {
                    continue;
                }
                generated.push(object.clone());
            }
        }

        debug!(requested, attempts, "sampling finished");
        Ok(generated)
    }

    /// Enumerate the distinct combinations, shuffle them and keep `target`.
    pub fn enumerate_shuffled<R: Rng + ?Sized>(
        &self,
        candidates: &ResolvedCandidates,
        target: u64,
        rng: &mut R,
    ) -> Result<Vec<GeneratedObject>, GenerationError> {
        let lists = self.checked_lists(candidates)?;
        let mut seen = HashSet::new();
        let mut objects = Vec::new();
        walk_product(&lists, |indices| {
            if seen.insert(tuple_key(&lists, indices)) {
                objects.push(build_object(candidates, indices));
            }
        });

        let distinct = objects.len() as u64;
        if target > distinct {
            return Err(GenerationError::CombinationBudgetExceeded {
                requested: target,
                accepted: distinct,
                attempts: 0,
                distinct: Some(distinct),
            });
        }

        objects.shuffle(rng);
        objects.truncate(target as usize);
        Ok(objects)
    }

    fn checked_lists<'a>(
        &self,
        candidates: &'a ResolvedCandidates,
    ) -> Result<Vec<&'a [FieldValue]>, GenerationError> {
        let lists: Vec<&[FieldValue]> = candidates
            .fields()
            .iter()
            .map(|(_, values)| values.as_slice())
            .collect();

        let mut size: u128 = 1;
        for list in &lists {
            size = size.saturating_mul(list.len() as u128);
        }
        if size > self.limits.max_product as u128 {
            return Err(GenerationError::CombinationLimit {
                size,
                limit: self.limits.max_product,
            });
        }
        Ok(lists)
    }
}

/// Visit every index tuple of the product, last field varying fastest.
fn walk_product<F: FnMut(&[usize])>(lists: &[&[FieldValue]], mut visit: F) {
    if lists.iter().any(|list| list.is_empty()) {
        return;
    }

    let mut indices = vec![0_usize; lists.len()];
    loop {
        visit(&indices);

        let mut position = lists.len();
        loop {
            if position == 0 {
                return;
            }
            position -= 1;
            indices[position] += 1;
            if indices[position] < lists[position].len() {
                break;
            }
            indices[position] = 0;
        }
    }
}

fn tuple_key(lists: &[&[FieldValue]], indices: &[usize]) -> String {
    Value::Array(
        lists
            .iter()
            .zip(indices)
            .map(|(list, index)| list[*index].to_json())
            .collect(),
    )
    .to_string()
}

fn build_object(candidates: &ResolvedCandidates, indices: &[usize]) -> GeneratedObject {
    candidates
        .fields()
        .iter()
        .zip(indices)
        .map(|((name, values), index)| (name.clone(), values[*index].clone()))
        .collect()
}

fn draw<R: Rng + ?Sized>(candidates: &ResolvedCandidates, rng: &mut R) -> GeneratedObject {
    candidates
        .fields()
        .iter()
        .map(|(name, values)| {
            let index = rng.random_range(0..values.len());
            (name.clone(), values[index].clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_product_visits_single_empty_tuple_without_fields() {
        let mut visits = 0;
        walk_product(&[], |indices| {
            assert!(indices.is_empty());
            visits += 1;
        });
        assert_eq!(visits, 1);
    }

    #[test]
    fn walk_product_varies_last_field_fastest() {
        let a = [FieldValue::Int(1), FieldValue::Int(2)];
        let b = [FieldValue::Bool(true), FieldValue::Bool(false)];
        let mut seen = Vec::new();
        walk_product(&[&a, &b], |indices| seen.push(indices.to_vec()));
        assert_eq!(seen, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
    }
}
