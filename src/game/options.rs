//! Option set construction for multiple-choice questions.
//!
//! Given the correct destination for a question, assemble a fixed-size,
//! shuffled list of answer options: the correct name plus distinct
//! distractors drawn from the rest of the catalog.

use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::RngCore;

/// Supplier of distractor candidates, backed by the destination catalog.
///
/// `sample_distractors` must exclude `exclude` at the source; it may return
/// fewer names than requested and may repeat entries.
pub trait DistractorSource {
    /// Total number of known destination names, including the excluded one.
    fn known_count(&self) -> usize;

    /// Draw up to `count` candidate names, never equal to `exclude`.
    fn sample_distractors(&self, exclude: &str, count: usize, rng: &mut dyn RngCore)
        -> Vec<String>;
}

/// Error constructing an option set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSetError {
    /// Target size below the two-option minimum.
    InvalidTargetSize(usize),
    /// Target size exceeds the number of known destinations; rejected
    /// before any sampling occurs.
    PoolTooSmall { target_size: usize, known: usize },
    /// The pool could not supply enough distinct incorrect names even
    /// after the bounded extra draw.
    InsufficientPool { needed: usize, available: usize },
}

impl fmt::Display for OptionSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSetError::InvalidTargetSize(size) => {
                write!(f, "option set target size must be at least 2, got {}", size)
            }
            OptionSetError::PoolTooSmall { target_size, known } => write!(
                f,
                "option set target size {} exceeds the {} known destinations",
                target_size, known
            ),
            OptionSetError::InsufficientPool { needed, available } => write!(
                f,
                "pool supplied only {} distinct distractors, {} needed",
                available, needed
            ),
        }
    }
}

impl std::error::Error for OptionSetError {}

/// A shuffled, fixed-size set of answer options.
///
/// Contains the correct name exactly once, all entries distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet(Vec<String>);

impl OptionSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

/// Builds option sets of a fixed target size.
pub struct OptionSetBuilder {
    target_size: usize,
}

impl OptionSetBuilder {
    /// Create a builder producing option sets of `target_size` entries.
    ///
    /// Fails if `target_size < 2` (a question needs the correct answer and
    /// at least one distractor).
    pub fn new(target_size: usize) -> Result<Self, OptionSetError> {
        if target_size < 2 {
            return Err(OptionSetError::InvalidTargetSize(target_size));
        }
        Ok(Self { target_size })
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Build a shuffled option set containing `correct` exactly once.
    ///
    /// Distractors come from `pool`, excluded-at-source and deduplicated
    /// here; the correct name is seeded into the dedup set so a misbehaving
    /// source can never reintroduce it. The first draw oversamples by one to
    /// absorb duplicates; if it comes up short, exactly one extra draw is
    /// made before giving up with `InsufficientPool`.
    pub fn build(
        &self,
        correct: &str,
        pool: &dyn DistractorSource,
        rng: &mut dyn RngCore,
    ) -> Result<OptionSet, OptionSetError> {
        let known = pool.known_count();
        if self.target_size > known {
            return Err(OptionSetError::PoolTooSmall {
                target_size: self.target_size,
                known,
            });
        }

        let needed = self.target_size - 1;
        let mut seen: HashSet<String> = HashSet::with_capacity(self.target_size);
        seen.insert(correct.to_string());
        let mut distractors: Vec<String> = Vec::with_capacity(needed);

        // Oversample on the first draw, then one bounded re-draw.
        for request in [needed + 1, needed] {
            if distractors.len() >= needed {
                break;
            }
            for name in pool.sample_distractors(correct, request, rng) {
                if distractors.len() >= needed {
                    break;
                }
                if seen.insert(name.clone()) {
                    distractors.push(name);
                }
            }
        }

        if distractors.len() < needed {
            return Err(OptionSetError::InsufficientPool {
                needed,
                available: distractors.len(),
            });
        }

        let mut options = distractors;
        options.push(correct.to_string());
        // Fisher-Yates via rand; a uniform permutation is a correctness
        // requirement so the correct answer's position carries no information.
        options.shuffle(rng);

        Ok(OptionSet(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Pool that replays a fixed candidate list, duplicates and all, but
    /// honours the exclusion rule like a real source.
    struct FixedPool {
        candidates: Vec<&'static str>,
        known: usize,
    }

    impl DistractorSource for FixedPool {
        fn known_count(&self) -> usize {
            self.known
        }

        fn sample_distractors(
            &self,
            exclude: &str,
            count: usize,
            _rng: &mut dyn RngCore,
        ) -> Vec<String> {
            self.candidates
                .iter()
                .filter(|n| **n != exclude)
                .take(count)
                .map(|n| n.to_string())
                .collect()
        }
    }

    /// Pool that ignores both the exclusion rule and the requested count,
    /// echoing its whole candidate list every draw.
    struct MisbehavingPool {
        candidates: Vec<&'static str>,
    }

    impl DistractorSource for MisbehavingPool {
        fn known_count(&self) -> usize {
            self.candidates.len() + 1
        }

        fn sample_distractors(
            &self,
            _exclude: &str,
            _count: usize,
            _rng: &mut dyn RngCore,
        ) -> Vec<String> {
            self.candidates.iter().map(|n| n.to_string()).collect()
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn rejects_target_size_below_two() {
        assert!(matches!(
            OptionSetBuilder::new(0),
            Err(OptionSetError::InvalidTargetSize(0))
        ));
        assert!(matches!(
            OptionSetBuilder::new(1),
            Err(OptionSetError::InvalidTargetSize(1))
        ));
        assert!(OptionSetBuilder::new(2).is_ok());
    }

    #[test]
    fn rejects_target_size_exceeding_known_destinations() {
        let pool = FixedPool {
            candidates: vec!["Rome", "Tokyo"],
            known: 3,
        };
        let builder = OptionSetBuilder::new(4).unwrap();
        let err = builder.build("Paris", &pool, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            OptionSetError::PoolTooSmall {
                target_size: 4,
                known: 3
            }
        );
    }

    #[test]
    fn builds_distinct_set_containing_correct_once() {
        // Pool echoes the correct answer and repeats entries; 4 usable
        // uniques remain after dedup and self-exclusion.
        let pool = MisbehavingPool {
            candidates: vec!["Paris", "Rome", "Tokyo", "Rome", "Cairo", "Lima"],
        };
        let builder = OptionSetBuilder::new(4).unwrap();
        let options = builder.build("Paris", &pool, &mut rng()).unwrap();

        assert_eq!(options.len(), 4);
        assert_eq!(
            options.as_slice().iter().filter(|n| *n == "Paris").count(),
            1
        );
        let unique: HashSet<_> = options.as_slice().iter().collect();
        assert_eq!(unique.len(), 4);
        for name in options.as_slice() {
            assert!(["Paris", "Rome", "Tokyo", "Cairo", "Lima"].contains(&name.as_str()));
        }
    }

    /// Pool whose draws advance through the candidate list, so the extra
    /// draw surfaces names the first one missed.
    struct RotatingPool {
        candidates: Vec<&'static str>,
        cursor: std::cell::Cell<usize>,
    }

    impl DistractorSource for RotatingPool {
        fn known_count(&self) -> usize {
            self.candidates.len() + 1
        }

        fn sample_distractors(
            &self,
            exclude: &str,
            count: usize,
            _rng: &mut dyn RngCore,
        ) -> Vec<String> {
            let start = self.cursor.get();
            self.cursor.set(start + count);
            self.candidates
                .iter()
                .cycle()
                .skip(start)
                .filter(|n| **n != exclude)
                .take(count)
                .map(|n| n.to_string())
                .collect()
        }
    }

    #[test]
    fn short_first_draw_is_rescued_by_the_extra_draw() {
        // First draw of 4 lands on [Rome, Rome, Rome, Tokyo]; the extra
        // draw picks up Cairo.
        let pool = RotatingPool {
            candidates: vec!["Rome", "Rome", "Rome", "Tokyo", "Cairo", "Lima"],
            cursor: std::cell::Cell::new(0),
        };
        let builder = OptionSetBuilder::new(4).unwrap();
        let options = builder.build("Paris", &pool, &mut rng()).unwrap();

        assert_eq!(options.len(), 4);
        assert!(options.contains("Paris"));
        assert!(options.contains("Rome"));
        assert!(options.contains("Tokyo"));
        assert!(options.contains("Cairo"));
    }

    #[test]
    fn starved_pool_fails_with_no_partial_result() {
        let pool = FixedPool {
            candidates: vec!["Rome"],
            known: 10,
        };
        let builder = OptionSetBuilder::new(4).unwrap();
        let err = builder.build("Paris", &pool, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            OptionSetError::InsufficientPool {
                needed: 3,
                available: 1
            }
        );
    }

    #[test]
    fn duplicates_collapse_to_single_distractor() {
        // Only "Rome" after dedup; exactly enough for target size 2.
        let pool = FixedPool {
            candidates: vec!["Rome", "Rome", "Rome"],
            known: 2,
        };
        let builder = OptionSetBuilder::new(2).unwrap();
        let options = builder.build("Paris", &pool, &mut rng()).unwrap();

        let mut sorted: Vec<_> = options.as_slice().to_vec();
        sorted.sort();
        assert_eq!(sorted, vec!["Paris".to_string(), "Rome".to_string()]);
    }

    #[test]
    fn correct_position_is_roughly_uniform() {
        let pool = FixedPool {
            candidates: vec!["Rome", "Tokyo", "Cairo", "Lima", "Oslo", "Quito"],
            known: 7,
        };
        let builder = OptionSetBuilder::new(4).unwrap();
        let mut rng = rng();

        let iterations = 4000;
        let mut position_counts = [0usize; 4];
        for _ in 0..iterations {
            let options = builder.build("Paris", &pool, &mut rng).unwrap();
            let pos = options
                .as_slice()
                .iter()
                .position(|n| n == "Paris")
                .unwrap();
            position_counts[pos] += 1;
        }

        // Expected 1000 per position; allow a generous band for a seeded run.
        for count in position_counts {
            assert!(
                (800..=1200).contains(&count),
                "position counts skewed: {:?}",
                position_counts
            );
        }
    }

    #[test]
    fn repeated_builds_share_no_state() {
        let pool = FixedPool {
            candidates: vec!["Rome", "Tokyo", "Cairo"],
            known: 4,
        };
        let builder = OptionSetBuilder::new(4).unwrap();
        let mut rng = rng();

        for _ in 0..100 {
            let options = builder.build("Paris", &pool, &mut rng).unwrap();
            assert_eq!(options.len(), 4);
            assert!(options.contains("Paris"));
        }
    }
}
