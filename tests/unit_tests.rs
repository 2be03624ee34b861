// Unit tests for the match scorer

use study_buddy::core::{calculate_match_score, intersection};
use study_buddy::models::{Skill, SkillLevel, StudyPreference, UserProfile};
use uuid::Uuid;

fn create_profile(
    branch: &str,
    year: u8,
    subjects: &[&str],
    availability: &[&str],
    skills: &[&str],
    preference: Option<StudyPreference>,
) -> UserProfile {
    let mut profile = UserProfile::new(Uuid::new_v4(), "Student", "student@example.com");
    profile.branch = branch.to_string();
    profile.year = year;
    profile.subjects = subjects.iter().map(|s| s.to_string()).collect();
    profile.availability = availability.iter().map(|s| s.to_string()).collect();
    profile.skills = skills
        .iter()
        .map(|s| Skill::new(*s, Some(SkillLevel::Intermediate)))
        .collect();
    profile.study_preference = preference;
    profile
}

#[test]
fn test_concrete_example_scores_61() {
    let a = create_profile(
        "CS",
        2,
        &["Math", "Physics"],
        &["Mon Evening"],
        &["Python"],
        Some(StudyPreference::Group),
    );
    let b = create_profile(
        "cs",
        3,
        &["Math"],
        &["Mon Evening", "Tue Night"],
        &["python"],
        Some(StudyPreference::Group),
    );

    let result = calculate_match_score(&a, &b);

    assert_eq!(result.sub_scores.branch, 8.0);
    assert_eq!(result.sub_scores.year, 8.0);
    assert_eq!(result.sub_scores.study_preference, 12.0);
    assert_eq!(result.sub_scores.subjects, 20.0);
    assert_eq!(result.sub_scores.availability, 10.0);
    assert_eq!(result.sub_scores.skills, 3.0);
    assert_eq!(result.score, 61);

    let breakdown = result.breakdown;
    assert_eq!(breakdown.common_subjects, vec!["math"]);
    assert_eq!(breakdown.common_availability, vec!["mon evening"]);
    assert_eq!(breakdown.skill_overlap, vec!["python"]);
    assert!(breakdown.branch_match);
    assert_eq!(breakdown.year_gap, 1);
    assert!(breakdown.study_preference_match);
}

#[test]
fn test_self_comparison_reaches_maximum() {
    let a = create_profile(
        "IT",
        3,
        &["DBMS", "OS"],
        &["Sat Morning", "Sun Evening"],
        &["SQL", "C", "Linux", "Git"],
        Some(StudyPreference::OneOnOne),
    );

    let result = calculate_match_score(&a, &a);

    assert_eq!(result.sub_scores.subjects, 40.0);
    assert_eq!(result.sub_scores.availability, 20.0);
    assert_eq!(result.sub_scores.skills, 10.0);
    assert_eq!(result.score, 100);
}

#[test]
fn test_scores_always_within_bounds() {
    let branches = ["CS", "cs ", "ECE", ""];
    let subject_sets: [&[&str]; 4] = [&[], &["Math"], &["Math", "math", "MATH"], &["Math", "DSA", "OS"]];
    let preferences = [None, Some(StudyPreference::Group), Some(StudyPreference::DoubtHelp)];

    let mut profiles = Vec::new();
    for (i, branch) in branches.iter().enumerate() {
        for subjects in subject_sets.iter() {
            for preference in preferences.iter() {
                profiles.push(create_profile(
                    branch,
                    (i % 6) as u8,
                    subjects,
                    &["Mon Evening", " mon evening"],
                    &["Rust", "rust", "Go", "C", "Python"],
                    *preference,
                ));
            }
        }
    }

    for a in &profiles {
        for b in &profiles {
            let result = calculate_match_score(a, b);
            assert!(result.score <= 100, "Score {} is out of range", result.score);
            assert!(result.score >= 4, "Preference alone contributes at least 4");
        }
    }
}

#[test]
fn test_branch_normalization() {
    let a = create_profile("Computer Science", 1, &[], &[], &[], None);
    let b = create_profile("  computer science ", 1, &[], &[], &[], None);
    let exact = create_profile("Computer Science", 1, &[], &[], &[], None);

    let normalized = calculate_match_score(&a, &b);
    let identical = calculate_match_score(&a, &exact);

    assert_eq!(normalized.sub_scores.branch, identical.sub_scores.branch);
    assert!(normalized.breakdown.branch_match);
}

#[test]
fn test_subject_overlap_is_asymmetric() {
    let a = create_profile("CS", 2, &["Math"], &[], &[], None);
    let b = create_profile(
        "CS",
        2,
        &["Math", "Physics", "Chemistry", "Biology", "DSA", "OS", "DBMS", "CN", "TOC", "AI"],
        &[],
        &[],
        None,
    );

    let forward = calculate_match_score(&a, &b);
    let backward = calculate_match_score(&b, &a);

    assert_eq!(forward.sub_scores.subjects, 40.0);
    assert_eq!(backward.sub_scores.subjects, 4.0);
    assert_ne!(forward.score, backward.score);
}

#[test]
fn test_availability_overlap_is_symmetric() {
    let a = create_profile("CS", 2, &[], &["Mon Evening"], &[], None);
    let b = create_profile("CS", 2, &[], &["Mon Evening", "Tue Night", "Wed Night", "Thu Night"], &[], None);

    let forward = calculate_match_score(&a, &b);
    let backward = calculate_match_score(&b, &a);

    assert_eq!(forward.sub_scores.availability, 5.0);
    assert_eq!(backward.sub_scores.availability, 5.0);
}

#[test]
fn test_missing_availability_field_scores_zero() {
    let a = create_profile("CS", 2, &[], &["Mon Evening"], &[], None);
    let candidate: UserProfile = serde_json::from_value(serde_json::json!({
        "id": Uuid::new_v4(),
        "name": "Sparse",
        "branch": "CS",
        "year": 2,
    }))
    .unwrap();

    let result = calculate_match_score(&a, &candidate);

    assert_eq!(result.sub_scores.availability, 0.0);
    assert!(result.breakdown.common_availability.is_empty());
}

#[test]
fn test_missing_preferences_compare_equal() {
    let a = create_profile("CS", 2, &[], &[], &[], None);
    let b = create_profile("CS", 2, &[], &[], &[], None);

    let result = calculate_match_score(&a, &b);

    assert_eq!(result.sub_scores.study_preference, 12.0);
    assert!(result.breakdown.study_preference_match);
}

#[test]
fn test_year_gap_is_absolute() {
    let a = create_profile("CS", 1, &[], &[], &[], None);
    let b = create_profile("CS", 4, &[], &[], &[], None);

    assert_eq!(calculate_match_score(&a, &b).breakdown.year_gap, 3);
    assert_eq!(calculate_match_score(&b, &a).breakdown.year_gap, 3);
    assert_eq!(calculate_match_score(&a, &b).sub_scores.year, 4.0);
}

#[test]
fn test_skill_level_is_ignored() {
    let mut a = create_profile("CS", 2, &[], &[], &[], None);
    let mut b = create_profile("CS", 2, &[], &[], &[], None);
    a.skills = vec![Skill::new("Rust", Some(SkillLevel::Beginner))];
    b.skills = vec![Skill::new("RUST", Some(SkillLevel::Advanced))];

    let result = calculate_match_score(&a, &b);

    assert_eq!(result.breakdown.skill_overlap, vec!["rust"]);
}

#[test]
fn test_intersection_matches_breakdown_contract() {
    let common = intersection(
        ["  Mon Evening", "Tue Night", "mon evening"].iter().copied(),
        ["MON EVENING", "Fri Night"].iter().copied(),
    );
    assert_eq!(common, vec!["mon evening"]);
}
