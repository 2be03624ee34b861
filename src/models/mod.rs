// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BuddyMatch, Comment, GroupError, HelpPost, MatchBreakdown, ProfileUpdate, Role, Skill,
    SkillLevel, StudyGroup, StudyPreference, UserProfile,
};
pub use requests::{AddCommentRequest, CreateGroupRequest, CreateHelpPostRequest, UpdateProfileRequest};
pub use responses::{
    Author, BuddyMatchesResponse, CommentAddedResponse, CommentView, ErrorResponse, GroupView,
    HealthResponse, HelpPostView, MessageResponse, ProfileResponse, UpdateProfileResponse,
};
