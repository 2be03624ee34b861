use uuid::Uuid;

use crate::core::scoring::calculate_match_score;
use crate::models::{BuddyMatch, UserProfile};
use crate::services::store::{StoreError, UserStore};

/// Study buddy ranker
///
/// # Pipeline Stages
/// 1. Exclude the requesting user from the population
/// 2. Score every remaining candidate
/// 3. Drop candidates scoring zero ([`Matcher::select`])
/// 4. Stable sort by score, highest first
/// 5. Optionally truncate to `max_results`
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    max_results: Option<usize>,
}

impl Matcher {
    pub fn new(max_results: Option<usize>) -> Self {
        Self { max_results }
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// Rank `candidates` for `current`
    ///
    /// Candidates with equal scores keep their input order.
    pub fn rank(&self, current: &UserProfile, candidates: Vec<UserProfile>) -> Vec<BuddyMatch> {
        let total_candidates = candidates.len();

        let scored: Vec<BuddyMatch> = candidates
            .into_iter()
            .filter(|candidate| candidate.id != current.id)
            .map(|candidate| {
                let result = calculate_match_score(current, &candidate);
                BuddyMatch {
                    user: candidate,
                    score: result.score,
                    breakdown: result.breakdown,
                }
            })
            .collect();

        let matches = self.select(scored);

        tracing::debug!(
            "Ranked {} of {} candidates for user {}",
            matches.len(),
            total_candidates,
            current.id
        );

        matches
    }

    /// Keep positive scores, order them highest first, apply `max_results`
    pub fn select(&self, scored: Vec<BuddyMatch>) -> Vec<BuddyMatch> {
        let mut matches: Vec<BuddyMatch> = scored.into_iter().filter(|m| m.score > 0).collect();

        // Vec::sort_by is stable
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(limit) = self.max_results {
            matches.truncate(limit);
        }

        matches
    }

    /// Load the requesting user and the rest of the population, then rank
    ///
    /// Both reads are issued concurrently. A missing requesting user surfaces
    /// as `StoreError::NotFound`.
    pub async fn find_study_buddies<S>(&self, store: &S, user_id: Uuid) -> Result<Vec<BuddyMatch>, StoreError>
    where
        S: UserStore + ?Sized,
    {
        let (current, candidates) =
            tokio::try_join!(store.find_by_id(user_id), store.find_all_except(user_id))?;

        Ok(self.rank(&current, candidates))
    }
}
