pub mod bracket;
pub mod gamification;
pub mod password;
pub mod scouting;
pub mod slug;
pub mod token;
