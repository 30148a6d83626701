//! First-match-wins rule evaluation.
//!
//! Every rule document is an ordered list. A candidate name is tested against
//! each rule in order and the first rule that matches is applied; later rules
//! are never consulted, even if they would also match.

use crate::models::{KeyRule, Rule};

/// How keys are compared against a candidate name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-sensitive substring.
    Contains,
    /// Case-insensitive substring.
    ContainsIgnoreCase,
    /// Whole-string equality.
    Exact,
}

impl MatchMode {
    fn test(self, candidate: &str, key: &str) -> bool {
        match self {
            MatchMode::Contains => candidate.contains(key),
            MatchMode::ContainsIgnoreCase => {
                candidate.to_lowercase().contains(&key.to_lowercase())
            }
            MatchMode::Exact => candidate == key,
        }
    }
}

impl KeyRule {
    /// True iff `candidate` satisfies at least one key and no forbidden key.
    ///
    /// Empty `keys` never match; empty `forbidden_keys` never exclude.
    pub fn matches(&self, candidate: &str, mode: MatchMode) -> bool {
        self.keys.iter().any(|key| mode.test(candidate, key)) && !self.is_forbidden(candidate, mode)
    }

    /// True iff `candidate` contains any forbidden key.
    pub fn is_forbidden(&self, candidate: &str, mode: MatchMode) -> bool {
        self.forbidden_keys
            .iter()
            .any(|key| mode.test(candidate, key))
    }
}

/// First rule matching `candidate`, in configured order.
pub fn first_match<'r, R: Rule>(rules: &'r [R], candidate: &str, mode: MatchMode) -> Option<&'r R> {
    rules
        .iter()
        .find(|rule| rule.key_rule().matches(candidate, mode))
}

/// First match over several candidate names (factions, location keywords).
///
/// Candidates are tried in order; for each one the rules are scanned in
/// order. The first candidate with any matching rule decides.
pub fn first_match_any<'r, 'c, R, I>(rules: &'r [R], candidates: I, mode: MatchMode) -> Option<&'r R>
where
    R: Rule,
    I: IntoIterator<Item = &'c str>,
{
    candidates
        .into_iter()
        .find_map(|candidate| first_match(rules, candidate, mode))
}

/// True when any rule in the document matches.
pub fn any_match<R: Rule>(rules: &[R], candidate: &str, mode: MatchMode) -> bool {
    first_match(rules, candidate, mode).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NpcLevelRule;

    fn bandit_rule() -> KeyRule {
        KeyRule::new(["Bandit"], ["BanditChief"])
    }

    #[test]
    fn test_forbidden_key_wins() {
        let rule = bandit_rule();
        assert!(!rule.matches("BanditChief", MatchMode::Contains));
        assert!(rule.matches("BanditMarauder", MatchMode::Contains));
        assert!(rule.is_forbidden("EncBanditChief01", MatchMode::Contains));
        assert!(!rule.is_forbidden("BanditMarauder", MatchMode::Contains));
    }

    #[test]
    fn test_empty_keys_never_match() {
        let rule = KeyRule::new(Vec::<String>::new(), ["x"]);
        assert!(!rule.matches("anything", MatchMode::Contains));
        assert!(!rule.matches("", MatchMode::Exact));
    }

    #[test]
    fn test_empty_forbidden_never_excludes() {
        let rule = KeyRule::new(["Draugr"], Vec::<String>::new());
        assert!(rule.matches("EncDraugr01", MatchMode::Contains));
    }

    #[test]
    fn test_match_modes() {
        let rule = KeyRule::new(["bandit"], Vec::<String>::new());
        assert!(!rule.matches("EncBandit01", MatchMode::Contains));
        assert!(rule.matches("EncBandit01", MatchMode::ContainsIgnoreCase));
        assert!(!rule.matches("EncBandit01", MatchMode::Exact));
        assert!(rule.matches("bandit", MatchMode::Exact));

        let forbidden = KeyRule::new(["Bandit"], ["chief"]);
        assert!(!forbidden.matches("BanditChief", MatchMode::ContainsIgnoreCase));
        assert!(forbidden.matches("BanditChief", MatchMode::Contains));
    }

    #[test]
    fn test_first_match_wins() {
        let rules = vec![
            NpcLevelRule {
                rule: KeyRule::new(["Bandit"], Vec::<String>::new()),
                level: 10,
            },
            NpcLevelRule {
                rule: KeyRule::new(["BanditBoss"], Vec::<String>::new()),
                level: 30,
            },
        ];

        let hit = first_match(&rules, "EncBanditBoss", MatchMode::Contains).unwrap();
        assert_eq!(hit.level, 10);
        assert!(first_match(&rules, "EncDraugr", MatchMode::Contains).is_none());
    }

    #[test]
    fn test_first_match_any_is_candidate_major() {
        let rules = vec![
            KeyRule::new(["Dungeon"], Vec::<String>::new()),
            KeyRule::new(["City"], Vec::<String>::new()),
        ];

        let hit = first_match_any(&rules, ["LocTypeCity", "LocTypeDungeon"], MatchMode::Contains);
        assert_eq!(hit, Some(&rules[1]));
        assert!(first_match_any(&rules, ["LocTypeHold"], MatchMode::Contains).is_none());
        assert!(any_match(&rules, "LocTypeDungeon", MatchMode::Contains));
    }
}
