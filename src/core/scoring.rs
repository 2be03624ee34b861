use crate::core::normalize::{intersection, normalize};
use crate::models::{MatchBreakdown, UserProfile};

/// Points for studying the same branch
pub const BRANCH_POINTS: f64 = 8.0;
/// Points for being in the same year; each year of gap costs `YEAR_GAP_PENALTY`
pub const YEAR_POINTS: f64 = 10.0;
pub const YEAR_GAP_PENALTY: f64 = 2.0;
/// Identical study preference
pub const PREFERENCE_MATCH_POINTS: f64 = 12.0;
/// Partial credit when preferences differ
pub const PREFERENCE_MISMATCH_POINTS: f64 = 4.0;
pub const SUBJECT_POINTS: f64 = 40.0;
pub const AVAILABILITY_POINTS: f64 = 20.0;
pub const SKILL_POINTS: f64 = 10.0;
pub const SKILL_MATCH_BONUS: f64 = 3.0;
pub const MAX_SCORE: u8 = 100;

/// The six weighted signal contributions behind a match score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubScores {
    pub branch: f64,
    pub year: f64,
    pub study_preference: f64,
    pub subjects: f64,
    pub availability: f64,
    pub skills: f64,
}

impl SubScores {
    pub fn total(&self) -> f64 {
        self.branch + self.year + self.study_preference + self.subjects + self.availability + self.skills
    }
}

/// Output of scoring one candidate against the requesting user
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub score: u8,
    pub breakdown: MatchBreakdown,
    pub sub_scores: SubScores,
}

/// Calculate the compatibility score (0-100) of `candidate` for `current`
///
/// Scoring formula:
/// score = round(
///     branch        # 8 on equal branch
///   + year          # 10 on same year, minus 2 per year of gap
///   + preference    # 12 on equal study preference, else 4
///   + subjects      # up to 40, share of current's subjects also held by candidate
///   + availability  # up to 20, shared slots over the longer availability list
///   + skills        # 3 per shared skill name, up to 10
/// )
///
/// The subject ratio is taken over the current user's list only, while the
/// availability ratio uses the larger of the two lists, so the score is not
/// symmetric in its arguments.
pub fn calculate_match_score(current: &UserProfile, candidate: &UserProfile) -> MatchScore {
    let common_subjects = intersection(
        current.subjects.iter().map(String::as_str),
        candidate.subjects.iter().map(String::as_str),
    );
    let common_availability = intersection(
        current.availability.iter().map(String::as_str),
        candidate.availability.iter().map(String::as_str),
    );
    let skill_overlap: Vec<String> = intersection(current.skill_names(), candidate.skill_names())
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect();

    let year_gap = u32::from(current.year.abs_diff(candidate.year));

    let sub_scores = SubScores {
        branch: calculate_branch_score(&current.branch, &candidate.branch),
        year: calculate_year_score(year_gap),
        study_preference: calculate_preference_score(
            current.study_preference_label(),
            candidate.study_preference_label(),
        ),
        subjects: calculate_subject_score(common_subjects.len(), current.subjects.len()),
        availability: calculate_availability_score(
            common_availability.len(),
            current.availability.len(),
            candidate.availability.len(),
        ),
        skills: calculate_skill_score(skill_overlap.len()),
    };

    let score = finalize_score(sub_scores.total());

    MatchScore {
        score,
        breakdown: MatchBreakdown {
            common_subjects,
            common_availability,
            skill_overlap,
            branch_match: sub_scores.branch > 0.0,
            year_gap,
            study_preference_match: sub_scores.study_preference > 8.0,
        },
        sub_scores,
    }
}

/// Round half-up and clamp to [0, 100]
#[inline]
fn finalize_score(raw: f64) -> u8 {
    let rounded = (raw + 0.5).floor();
    rounded.clamp(0.0, f64::from(MAX_SCORE)) as u8
}

#[inline]
fn calculate_branch_score(current: &str, candidate: &str) -> f64 {
    if normalize(current) == normalize(candidate) {
        BRANCH_POINTS
    } else {
        0.0
    }
}

#[inline]
fn calculate_year_score(year_gap: u32) -> f64 {
    if year_gap == 0 {
        return YEAR_POINTS;
    }
    (YEAR_POINTS - YEAR_GAP_PENALTY * f64::from(year_gap)).max(0.0)
}

#[inline]
fn calculate_preference_score(current: &str, candidate: &str) -> f64 {
    if normalize(current) == normalize(candidate) {
        PREFERENCE_MATCH_POINTS
    } else {
        PREFERENCE_MISMATCH_POINTS
    }
}

/// Share of the current user's subjects that the candidate also lists
#[inline]
fn calculate_subject_score(common: usize, current_len: usize) -> f64 {
    if common == 0 {
        return 0.0;
    }
    let ratio = common as f64 / current_len.max(1) as f64;
    (ratio * SUBJECT_POINTS).min(SUBJECT_POINTS)
}

#[inline]
fn calculate_availability_score(common: usize, current_len: usize, candidate_len: usize) -> f64 {
    if common == 0 {
        return 0.0;
    }
    let ratio = common as f64 / current_len.max(candidate_len).max(1) as f64;
    (ratio * AVAILABILITY_POINTS).min(AVAILABILITY_POINTS)
}

#[inline]
fn calculate_skill_score(common: usize) -> f64 {
    if common == 0 {
        return 0.0;
    }
    (common as f64 * SKILL_MATCH_BONUS).min(SKILL_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Skill, StudyPreference};
    use uuid::Uuid;

    fn create_test_profile(branch: &str, year: u8, preference: Option<StudyPreference>) -> UserProfile {
        let mut profile = UserProfile::new(Uuid::new_v4(), "Test User", "test@example.com");
        profile.branch = branch.to_string();
        profile.year = year;
        profile.study_preference = preference;
        profile
    }

    #[test]
    fn test_points_sum_to_max_score() {
        let total = BRANCH_POINTS
            + YEAR_POINTS
            + PREFERENCE_MATCH_POINTS
            + SUBJECT_POINTS
            + AVAILABILITY_POINTS
            + SKILL_POINTS;
        assert_eq!(total, f64::from(MAX_SCORE));
    }

    #[test]
    fn test_year_score() {
        assert_eq!(calculate_year_score(0), 10.0);
        assert_eq!(calculate_year_score(1), 8.0);
        assert_eq!(calculate_year_score(4), 2.0);
        assert_eq!(calculate_year_score(5), 0.0);
        assert_eq!(calculate_year_score(50), 0.0);
    }

    #[test]
    fn test_subject_score() {
        assert_eq!(calculate_subject_score(0, 3), 0.0);
        assert_eq!(calculate_subject_score(1, 2), 20.0);
        assert_eq!(calculate_subject_score(2, 2), 40.0);
        // raw list length counts duplicates
        assert_eq!(calculate_subject_score(1, 4), 10.0);
        assert_eq!(calculate_subject_score(1, 0), 40.0);
    }

    #[test]
    fn test_availability_score_uses_longer_list() {
        assert_eq!(calculate_availability_score(1, 1, 2), 10.0);
        assert_eq!(calculate_availability_score(1, 2, 1), 10.0);
        assert_eq!(calculate_availability_score(2, 2, 2), 20.0);
        assert_eq!(calculate_availability_score(0, 2, 2), 0.0);
    }

    #[test]
    fn test_skill_score_caps_at_ten() {
        assert_eq!(calculate_skill_score(0), 0.0);
        assert_eq!(calculate_skill_score(1), 3.0);
        assert_eq!(calculate_skill_score(3), 9.0);
        assert_eq!(calculate_skill_score(4), 10.0);
    }

    #[test]
    fn test_finalize_rounds_half_up_and_clamps() {
        assert_eq!(finalize_score(60.5), 61);
        assert_eq!(finalize_score(60.49), 60);
        assert_eq!(finalize_score(100.4), 100);
        assert_eq!(finalize_score(130.0), 100);
        assert_eq!(finalize_score(-3.0), 0);
    }

    #[test]
    fn test_preference_near_miss_is_not_a_match() {
        let current = create_test_profile("CS", 2, Some(StudyPreference::Group));
        let candidate = create_test_profile("CS", 2, Some(StudyPreference::DoubtHelp));

        let result = calculate_match_score(&current, &candidate);

        assert_eq!(result.sub_scores.study_preference, 4.0);
        assert!(!result.breakdown.study_preference_match);
    }

    #[test]
    fn test_blank_skill_names_never_overlap() {
        let mut current = create_test_profile("CS", 2, None);
        let mut candidate = create_test_profile("CS", 2, None);
        current.skills = vec![Skill::new("  ", None), Skill::new("Rust", None)];
        candidate.skills = vec![Skill::new("", None), Skill::new("rust ", None)];

        let result = calculate_match_score(&current, &candidate);

        assert_eq!(result.breakdown.skill_overlap, vec!["rust"]);
        assert_eq!(result.sub_scores.skills, 3.0);
    }

    #[test]
    fn test_missing_year_counts_as_zero() {
        let current = create_test_profile("CS", 0, None);
        let candidate = create_test_profile("CS", 4, None);

        let result = calculate_match_score(&current, &candidate);

        assert_eq!(result.breakdown.year_gap, 4);
        assert_eq!(result.sub_scores.year, 2.0);
    }
}
