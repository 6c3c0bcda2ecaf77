// src/retention/policy.rs
//
// Name-list policies and the match strategies they use.

use crate::similarity::similarity;
use serde::Deserialize;

/// How a candidate string is compared against a list of protected names.
///
/// Deserialized from the `method` key, ignoring case; any other value is
/// rejected while the configuration is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawMatchMethod")]
pub enum MatchMethod {
    /// Some protected name contains the candidate (case-insensitive).
    Contains,
    /// Some protected name scores at least `threshold` similarity (0-100).
    Levenshtein { threshold: f64 },
    /// Either of the above; containment is checked first.
    Both { threshold: f64 },
}

/// `method` and `threshold` as written in the policy table.
#[derive(Debug, Deserialize)]
struct RawMatchMethod {
    method: String,
    threshold: Option<f64>,
}

impl TryFrom<RawMatchMethod> for MatchMethod {
    type Error = String;

    fn try_from(raw: RawMatchMethod) -> Result<Self, Self::Error> {
        let threshold = || {
            raw.threshold
                .ok_or_else(|| format!("method `{}` requires a threshold", raw.method))
        };
        match raw.method.to_lowercase().as_str() {
            "contains" => Ok(MatchMethod::Contains),
            "levenshtein" => Ok(MatchMethod::Levenshtein {
                threshold: threshold()?,
            }),
            "both" => Ok(MatchMethod::Both {
                threshold: threshold()?,
            }),
            _ => Err(format!(
                "unknown match method `{}`, expected one of contains, levenshtein, both",
                raw.method
            )),
        }
    }
}

impl MatchMethod {
    pub fn matches(&self, candidate: &str, names: &[String]) -> bool {
        match *self {
            MatchMethod::Contains => matches_contains(candidate, names),
            MatchMethod::Levenshtein { threshold } => {
                matches_levenshtein(candidate, names, threshold)
            }
            MatchMethod::Both { threshold } => {
                matches_contains(candidate, names)
                    || matches_levenshtein(candidate, names, threshold)
            }
        }
    }

    pub fn threshold(&self) -> Option<f64> {
        match *self {
            MatchMethod::Contains => None,
            MatchMethod::Levenshtein { threshold } | MatchMethod::Both { threshold } => {
                Some(threshold)
            }
        }
    }
}

/// True if any name, lowercased, contains the lowercased candidate.
///
/// The direction is name-contains-candidate: "Team Fortress 2" in the list
/// protects the candidate "fortress", but "Fortress" in the list does not
/// protect the candidate "Team Fortress 2".
pub fn matches_contains(candidate: &str, names: &[String]) -> bool {
    let candidate = candidate.to_lowercase();
    names
        .iter()
        .any(|name| name.to_lowercase().contains(&candidate))
}

/// True if any name is at least `threshold` similar to the candidate.
pub fn matches_levenshtein(candidate: &str, names: &[String], threshold: f64) -> bool {
    names
        .iter()
        .any(|name| similarity(name, candidate) >= threshold)
}

/// Protects items by the name of the game they belong to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GamePolicy {
    #[serde(flatten)]
    pub method: MatchMethod,
    #[serde(default)]
    pub names: Vec<String>,
}

impl GamePolicy {
    pub fn new(method: MatchMethod, names: Vec<String>) -> Self {
        Self { method, names }
    }

    pub fn matches(&self, game_name: &str) -> bool {
        self.method.matches(game_name, &self.names)
    }
}

/// Protects items by display name, and optionally by long type line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemPolicy {
    #[serde(flatten)]
    pub method: MatchMethod,
    #[serde(default)]
    pub names: Vec<String>,
    /// Also match the policy against the item's long type line
    #[serde(default)]
    pub include_type_search: bool,
}

impl ItemPolicy {
    pub fn new(method: MatchMethod, names: Vec<String>, include_type_search: bool) -> Self {
        Self {
            method,
            names,
            include_type_search,
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.method.matches(candidate, &self.names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_contains_direction_is_name_contains_candidate() {
        let protected = names(&["Team Fortress 2"]);
        assert!(matches_contains("fortress", &protected));
        assert!(matches_contains("TEAM FORTRESS 2", &protected));

        // The reverse direction does not match
        let protected = names(&["Fortress"]);
        assert!(!matches_contains("Team Fortress 2", &protected));
    }

    #[test]
    fn test_contains_empty_list() {
        assert!(!matches_contains("anything", &[]));
    }

    #[test]
    fn test_levenshtein_threshold() {
        let protected = names(&["Team Fortress 2"]);
        let method = MatchMethod::Levenshtein { threshold: 90.0 };
        assert!(method.matches("Team Fortress2", &protected));

        let protected = names(&["Bar"]);
        assert!(!method.matches("Foo", &protected));
    }

    #[test]
    fn test_levenshtein_threshold_is_inclusive() {
        let protected = names(&["abcd"]);
        // 1 edit over 4 chars = 75
        assert!(matches_levenshtein("abce", &protected, 75.0));
        assert!(!matches_levenshtein("abce", &protected, 75.1));
    }

    #[test]
    fn test_both_is_either() {
        let protected = names(&["Portal 2", "Half-Life"]);
        let threshold = 80.0;
        let both = MatchMethod::Both { threshold };

        for candidate in ["portal", "Half Life", "Portal 3", "Dota 2", "Half-Life", "x"] {
            let either = matches_contains(candidate, &protected)
                || matches_levenshtein(candidate, &protected, threshold);
            assert_eq!(both.matches(candidate, &protected), either, "{}", candidate);
        }
    }

    #[test]
    fn test_threshold_accessor() {
        assert_eq!(MatchMethod::Contains.threshold(), None);
        assert_eq!(MatchMethod::Both { threshold: 42.0 }.threshold(), Some(42.0));
    }

    #[test]
    fn test_deserialize_policies() {
        let game: GamePolicy = toml::from_str(
            r#"
            method = "levenshtein"
            threshold = 85
            names = ["Dota 2"]
            "#,
        )
        .unwrap();
        assert_eq!(game.method, MatchMethod::Levenshtein { threshold: 85.0 });
        assert_eq!(game.names, vec!["Dota 2"]);

        let item: ItemPolicy = toml::from_str(
            r#"
            method = "contains"
            names = ["Gems"]
            include_type_search = true
            "#,
        )
        .unwrap();
        assert_eq!(item.method, MatchMethod::Contains);
        assert!(item.include_type_search);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let parsed: Result<GamePolicy, _> = toml::from_str(
            r#"
            method = "fuzzy"
            names = ["Dota 2"]
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_levenshtein_requires_threshold() {
        let parsed: Result<GamePolicy, _> = toml::from_str(
            r#"
            method = "both"
            names = ["Dota 2"]
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_method_names_ignore_case() {
        let game: GamePolicy = toml::from_str(
            r#"
            method = "Both"
            threshold = 90
            names = ["Dota 2"]
            "#,
        )
        .unwrap();
        assert_eq!(game.method, MatchMethod::Both { threshold: 90.0 });

        let game: GamePolicy = toml::from_str(
            r#"
            method = "Levenshtein"
            threshold = 75.5
            "#,
        )
        .unwrap();
        assert_eq!(game.method, MatchMethod::Levenshtein { threshold: 75.5 });
        assert!(game.names.is_empty());

        let item: ItemPolicy = toml::from_str(r#"method = "CONTAINS""#).unwrap();
        assert_eq!(item.method, MatchMethod::Contains);
    }
}
