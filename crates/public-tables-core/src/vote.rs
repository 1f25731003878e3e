//! Tri-state permission votes.

/// The answer of a single permission voter.
///
/// `Abstain` lets the remaining voters, and ultimately the action default,
/// decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Vote {
    Grant,
    Deny,
    #[default]
    Abstain,
}

impl Vote {
    /// Map a plain boolean decision onto a vote.
    pub fn from_bool(allowed: bool) -> Self {
        if allowed {
            Vote::Grant
        } else {
            Vote::Deny
        }
    }

    /// Combine two votes for the same check. Deny beats Grant beats Abstain.
    pub fn combine(self, other: Vote) -> Vote {
        match (self, other) {
            (Vote::Deny, _) | (_, Vote::Deny) => Vote::Deny,
            (Vote::Grant, _) | (_, Vote::Grant) => Vote::Grant,
            _ => Vote::Abstain,
        }
    }

    /// Whether the vote settles the question.
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Vote::Abstain)
    }

    /// The decision, falling back to `default` on abstention.
    pub fn resolve(self, default: bool) -> bool {
        match self {
            Vote::Grant => true,
            Vote::Deny => false,
            Vote::Abstain => default,
        }
    }
}

impl FromIterator<Vote> for Vote {
    fn from_iter<I: IntoIterator<Item = Vote>>(iter: I) -> Self {
        iter.into_iter().fold(Vote::Abstain, Vote::combine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_vote() -> impl Strategy<Value = Vote> {
        prop_oneof![Just(Vote::Grant), Just(Vote::Deny), Just(Vote::Abstain)]
    }

    #[test]
    fn test_deny_beats_grant() {
        assert_eq!(Vote::Grant.combine(Vote::Deny), Vote::Deny);
        assert_eq!(Vote::Abstain.combine(Vote::Grant), Vote::Grant);
        assert_eq!(Vote::Abstain.combine(Vote::Abstain), Vote::Abstain);
    }

    #[test]
    fn test_resolve_uses_default_only_on_abstain() {
        assert!(Vote::Grant.resolve(false));
        assert!(!Vote::Deny.resolve(true));
        assert!(Vote::Abstain.resolve(true));
        assert!(!Vote::Abstain.resolve(false));
    }

    #[test]
    fn test_collect_votes() {
        let vote: Vote = vec![Vote::Abstain, Vote::Grant, Vote::Abstain]
            .into_iter()
            .collect();
        assert_eq!(vote, Vote::Grant);

        let empty: Vote = Vec::<Vote>::new().into_iter().collect();
        assert_eq!(empty, Vote::Abstain);
    }

    proptest! {
        #[test]
        fn combine_is_order_independent(a in any_vote(), b in any_vote(), c in any_vote()) {
            prop_assert_eq!(a.combine(b), b.combine(a));
            prop_assert_eq!(a.combine(b).combine(c), a.combine(b.combine(c)));
        }

        #[test]
        fn abstain_is_neutral(a in any_vote()) {
            prop_assert_eq!(a.combine(Vote::Abstain), a);
        }
    }
}
