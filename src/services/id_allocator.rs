use std::sync::{Mutex, PoisonError};

use rand::{rngs::StdRng, SeedableRng};

use crate::config::ShortenerConfig;
use crate::errors::ShortenError;
use crate::utils::id_generator::generate_short_id;
use crate::validations::{describe, validate_custom_alias};

/// Hands out candidate short ids.
///
/// Candidates are not checked for uniqueness here; the store's atomic
/// insert decides whether a candidate is actually free.
pub struct IdAllocator {
    rng: Mutex<StdRng>,
    length: usize,
}

impl IdAllocator {
    /// Random candidates from an OS-seeded generator
    pub fn new(length: usize) -> Self {
        Self::with_rng(length, StdRng::from_os_rng())
    }

    /// Reproducible candidate sequence
    pub fn seeded(length: usize, seed: u64) -> Self {
        Self::with_rng(length, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(length: usize, rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            length,
        }
    }

    pub fn from_config(config: &ShortenerConfig) -> Self {
        match config.id_seed {
            Some(seed) => Self::seeded(config.id_length, seed),
            None => Self::new(config.id_length),
        }
    }

    /// Returns the trimmed alias when one is given, otherwise a random candidate
    pub fn allocate(&self, requested_alias: Option<&str>) -> Result<String, ShortenError> {
        match requested_alias.map(str::trim).filter(|alias| !alias.is_empty()) {
            Some(alias) => {
                validate_custom_alias(alias)
                    .map_err(|e| ShortenError::InvalidAlias(describe(&e)))?;
                Ok(alias.to_string())
            }
            None => Ok(self.random_candidate()),
        }
    }

    fn random_candidate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        generate_short_id(&mut *rng, self.length)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn alias_is_trimmed_and_returned() {
        let allocator = IdAllocator::seeded(6, 1);
        assert_eq!(allocator.allocate(Some("  my-link ")).unwrap(), "my-link");
    }

    #[test]
    fn blank_alias_falls_back_to_random() {
        let allocator = IdAllocator::seeded(6, 1);
        let id = allocator.allocate(Some("   ")).unwrap();
        assert_eq!(id.len(), 6);
    }

    #[test]
    fn path_unsafe_alias_is_rejected() {
        let allocator = IdAllocator::seeded(6, 1);
        for alias in ["a/b", "a?b", "a#b", "a b", "..", "%2F"] {
            assert!(
                matches!(
                    allocator.allocate(Some(alias)),
                    Err(ShortenError::InvalidAlias(_))
                ),
                "alias {:?} should be rejected",
                alias
            );
        }
    }

    #[test]
    fn random_candidates_are_distinct() {
        let allocator = IdAllocator::seeded(6, 2024);
        let ids: HashSet<String> = (0..500).map(|_| allocator.allocate(None).unwrap()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn seeded_allocators_agree() {
        let a = IdAllocator::seeded(8, 99);
        let b = IdAllocator::seeded(8, 99);
        for _ in 0..20 {
            assert_eq!(a.allocate(None).unwrap(), b.allocate(None).unwrap());
        }
    }

    #[test]
    fn length_comes_from_config() {
        let config = ShortenerConfig {
            public_host: None,
            id_length: 10,
            max_attempts: 5,
            id_seed: Some(3),
        };
        assert_eq!(IdAllocator::from_config(&config).allocate(None).unwrap().len(), 10);
    }
}
