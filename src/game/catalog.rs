//! In-memory index over the loaded destinations.

use std::collections::HashMap;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::RngCore;

use crate::models::Destination;

use super::options::DistractorSource;

/// The destination reference data, indexed by name.
pub struct DestinationCatalog {
    destinations: Vec<Destination>,
    by_name: HashMap<String, usize>,
}

impl DestinationCatalog {
    /// Build a catalog. Assumes names are unique (the loader enforces it).
    pub fn new(destinations: Vec<Destination>) -> Self {
        let by_name = destinations
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        Self {
            destinations,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Uniformly pick the destination for the next question.
    pub fn pick_random(&self, rng: &mut dyn RngCore) -> Option<&Destination> {
        self.destinations.choose(rng)
    }

    pub fn get(&self, name: &str) -> Option<&Destination> {
        self.by_name.get(name).map(|&i| &self.destinations[i])
    }

    /// First fun fact for a destination, if it has any.
    pub fn fun_fact(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|d| d.fun_facts.first())
            .map(String::as_str)
    }
}

impl DistractorSource for DestinationCatalog {
    fn known_count(&self) -> usize {
        self.destinations.len()
    }

    fn sample_distractors(
        &self,
        exclude: &str,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<String> {
        let candidates: Vec<&str> = self
            .destinations
            .iter()
            .map(|d| d.name.as_str())
            .filter(|name| *name != exclude)
            .collect();

        let mut drawn: Vec<String> = candidates
            .choose_multiple(rng, count)
            .map(|name| name.to_string())
            .collect();
        // choose_multiple picks in element order; the caller only needs a
        // set, but keep the draw order unbiased anyway.
        drawn.shuffle(rng);
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dest(name: &str) -> Destination {
        Destination {
            name: name.to_string(),
            clues: vec![format!("clue for {}", name)],
            fun_facts: vec![format!("fact about {}", name)],
        }
    }

    fn catalog() -> DestinationCatalog {
        DestinationCatalog::new(vec![
            dest("Paris"),
            dest("Rome"),
            dest("Tokyo"),
            dest("Cairo"),
            dest("Lima"),
        ])
    }

    #[test]
    fn lookup_by_name() {
        let catalog = catalog();
        assert!(catalog.get("Rome").is_some());
        assert!(catalog.get("Atlantis").is_none());
        assert_eq!(catalog.fun_fact("Lima"), Some("fact about Lima"));
    }

    #[test]
    fn fun_fact_missing_when_destination_has_none() {
        let mut bare = dest("Oslo");
        bare.fun_facts.clear();
        let catalog = DestinationCatalog::new(vec![bare]);
        assert_eq!(catalog.fun_fact("Oslo"), None);
    }

    #[test]
    fn pick_random_covers_the_catalog() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(catalog.pick_random(&mut rng).unwrap().name.clone());
        }
        assert_eq!(seen.len(), catalog.len());
    }

    #[test]
    fn pick_random_empty_catalog() {
        let catalog = DestinationCatalog::new(Vec::new());
        let mut rng = StdRng::seed_from_u64(7);
        assert!(catalog.pick_random(&mut rng).is_none());
    }

    #[test]
    fn sampled_distractors_are_distinct_and_exclude_the_answer() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let drawn = catalog.sample_distractors("Paris", 3, &mut rng);
            assert_eq!(drawn.len(), 3);
            assert!(!drawn.contains(&"Paris".to_string()));
            let unique: std::collections::HashSet<_> = drawn.iter().collect();
            assert_eq!(unique.len(), 3);
        }
    }

    #[test]
    fn catalog_backs_the_option_set_builder() {
        use crate::game::{OptionSetBuilder, OPTION_SET_SIZE};

        let catalog = catalog();
        let builder = OptionSetBuilder::new(OPTION_SET_SIZE).unwrap();
        let mut rng = StdRng::seed_from_u64(23);

        let options = builder.build("Tokyo", &catalog, &mut rng).unwrap();
        assert_eq!(options.len(), OPTION_SET_SIZE);
        assert!(options.contains("Tokyo"));
        for name in options.as_slice() {
            assert!(catalog.get(name).is_some());
        }
    }

    #[test]
    fn sampling_more_than_available_returns_what_exists() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(3);
        let drawn = catalog.sample_distractors("Paris", 10, &mut rng);
        // 4 names other than Paris exist
        assert_eq!(drawn.len(), 4);
    }
}
