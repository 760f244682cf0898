use serde::Deserialize;

/// Reference data for one guessable destination.
#[derive(Clone, Deserialize)]
pub struct Destination {
    pub name: String,
    pub clues: Vec<String>,
    #[serde(alias = "funFacts")]
    pub fun_facts: Vec<String>,
}
