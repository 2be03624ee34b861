//! Study Buddy - study-partner matchmaking service
//!
//! Students keep an academic profile (branch, year, subjects, skills,
//! availability, study preference), organise study groups, ask for help on a
//! shared help desk, and receive ranked study buddy recommendations computed
//! from profile similarity.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{calculate_match_score, Matcher, MatchScore};
pub use error::ApiError;
pub use models::{BuddyMatch, MatchBreakdown, UserProfile};
