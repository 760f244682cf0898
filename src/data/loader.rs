use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::models::Destination;

/// Error loading destination data from disk.
#[derive(Debug)]
pub enum LoadError {
    /// Failed to read the file.
    Io(io::Error),
    /// File contents are not valid JSON.
    Parse(serde_json::Error),
    /// JSON parsed but the data is unusable (empty, blank names, duplicates).
    Invalid(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read destination file: {}", e),
            LoadError::Parse(e) => write!(f, "failed to parse destination file: {}", e),
            LoadError::Invalid(msg) => write!(f, "invalid destination data: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

/// Load destinations from a JSON file.
///
/// The file must contain a JSON array of destinations, each with a unique
/// non-blank name and at least one clue.
pub fn load_destinations_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Destination>, LoadError> {
    let json_content = fs::read_to_string(path.as_ref())?;
    parse_destinations(&json_content)
}

/// Parse and validate destinations from a JSON string.
pub fn parse_destinations(json: &str) -> Result<Vec<Destination>, LoadError> {
    let destinations: Vec<Destination> = serde_json::from_str(json)?;

    if destinations.is_empty() {
        return Err(LoadError::Invalid(
            "at least one destination is required".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for dest in &destinations {
        if dest.name.trim().is_empty() {
            return Err(LoadError::Invalid(
                "destination names must not be blank".to_string(),
            ));
        }
        if !seen.insert(dest.name.as_str()) {
            return Err(LoadError::Invalid(format!(
                "duplicate destination name: {}",
                dest.name
            )));
        }
        if dest.clues.is_empty() {
            return Err(LoadError::Invalid(format!(
                "destination {} has no clues",
                dest.name
            )));
        }
    }

    Ok(destinations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_destinations() {
        let json = r#"[
            {"name": "Paris", "clues": ["City of lights"], "fun_facts": ["The Eiffel Tower grows in summer"]},
            {"name": "Tokyo", "clues": ["Largest metro area"], "funFacts": ["Has the busiest station on earth"]}
        ]"#;

        let dests = parse_destinations(json).unwrap();
        assert_eq!(dests.len(), 2);
        assert_eq!(dests[0].name, "Paris");
        // camelCase alias accepted for data exported from other tools
        assert_eq!(dests[1].fun_facts.len(), 1);
    }

    #[test]
    fn rejects_empty_list() {
        assert!(matches!(
            parse_destinations("[]"),
            Err(LoadError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let json = r#"[
            {"name": "Rome", "clues": ["a"], "fun_facts": []},
            {"name": "Rome", "clues": ["b"], "fun_facts": []}
        ]"#;
        assert!(matches!(
            parse_destinations(json),
            Err(LoadError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_blank_name() {
        let json = r#"[{"name": "  ", "clues": ["a"], "fun_facts": []}]"#;
        assert!(matches!(
            parse_destinations(json),
            Err(LoadError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_destination_without_clues() {
        let json = r#"[{"name": "Cairo", "clues": [], "fun_facts": []}]"#;
        assert!(matches!(
            parse_destinations(json),
            Err(LoadError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_destinations("not json"),
            Err(LoadError::Parse(_))
        ));
    }
}
