/// Declares a closed set of values stored as TEXT columns.
///
/// The generated enum serializes to the same lowercase names the database
/// CHECK constraints accept.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($name), other)),
                }
            }
        }
    };
}

pub mod club;
pub mod conversation;
pub mod enums;
pub mod gamification;
pub mod media;
pub mod notification;
pub mod post;
pub mod profile;
pub mod shop;
pub mod tournament;
pub mod user;

pub use club::{ClubMembership, ClubStaffMember, NationalTeamCallup, Transfer};
pub use conversation::{Conversation, Message};
pub use enums::*;
pub use gamification::{Reward, RewardRedemption};
pub use media::{Stream, Video};
pub use notification::Notification;
pub use post::{Comment, Post};
pub use profile::Profile;
pub use shop::{Order, OrderItem, Product};
pub use tournament::{Match, Tournament, TournamentTeam};
pub use user::{Session, User};
