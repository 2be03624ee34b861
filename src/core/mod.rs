// Core algorithm exports
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use matcher::Matcher;
pub use normalize::{intersection, normalize};
pub use scoring::{calculate_match_score, MatchScore, SubScores};
