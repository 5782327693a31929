pub mod admin;
pub mod auth;
pub mod clubs;
pub mod gamification;
pub mod media;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod realtime;
pub mod scouting;
pub mod shop;
pub mod tournaments;
pub mod users;
