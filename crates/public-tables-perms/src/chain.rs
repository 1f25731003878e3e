//! Combining several voters into a single vote.

use std::sync::Arc;

use async_trait::async_trait;

use public_tables_core::{Action, Actor, Resource, Vote};

use crate::error::Result;
use crate::voter::{PermissionChecker, PermissionVoter};

/// An ordered list of voters.
///
/// Votes combine with [`Vote::combine`]: a single deny settles the check and
/// the remaining voters are not consulted.
#[derive(Clone, Default)]
pub struct VoterChain {
    voters: Vec<Arc<dyn PermissionVoter>>,
}

impl VoterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a voter.
    pub fn push(&mut self, voter: Arc<dyn PermissionVoter>) {
        self.voters.push(voter);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, voter: Arc<dyn PermissionVoter>) -> Self {
        self.push(voter);
        self
    }
}

#[async_trait]
impl PermissionVoter for VoterChain {
    async fn vote(
        &self,
        checker: &dyn PermissionChecker,
        actor: Option<&Actor>,
        action: &Action,
        resource: &Resource,
    ) -> Result<Vote> {
        let mut combined = Vote::Abstain;
        for voter in &self.voters {
            let vote = voter.vote(checker, actor, action, resource).await?;
            combined = combined.combine(vote);
            if combined == Vote::Deny {
                break;
            }
        }
        Ok(combined)
    }
}
