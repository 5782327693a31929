pub mod admin;
pub mod club;
pub mod follow;
pub mod gamification;
pub mod media;
pub mod message;
pub mod notification;
pub mod post;
pub mod scouting;
pub mod session;
pub mod shop;
pub mod tournament;
pub mod user;

/// Columns of [`crate::dto::user::UserSummary`], for queries joining
/// `users u` with `profiles p`.
pub(crate) const USER_SUMMARY_COLUMNS: &str =
    "u.user_id, u.username, p.display_name, u.role, p.avatar_url, p.verified";
