pub mod admin;
pub mod auth;
pub mod club;
pub mod common;
pub mod gamification;
pub mod media;
pub mod message;
pub mod notification;
pub mod post;
pub mod scouting;
pub mod shop;
pub mod tournament;
pub mod user;
pub mod validation;
