use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Actions that earn points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PointAction {
    PostCreated,
    CommentCreated,
    LikeReceived,
    FollowerGained,
    MatchWon,
    TournamentWin,
    VideoUploaded,
}

impl PointAction {
    pub fn points(&self) -> i32 {
        match self {
            Self::PostCreated => 10,
            Self::CommentCreated => 2,
            Self::LikeReceived => 1,
            Self::FollowerGained => 5,
            Self::MatchWon => 20,
            Self::TournamentWin => 100,
            Self::VideoUploaded => 15,
        }
    }

    /// Actions triggered by someone else that pay out once per actor and
    /// subject, however often the engagement is undone and repeated.
    pub fn once_per_actor(&self) -> bool {
        matches!(self, Self::LikeReceived | Self::FollowerGained)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostCreated => "post_created",
            Self::CommentCreated => "comment_created",
            Self::LikeReceived => "like_received",
            Self::FollowerGained => "follower_gained",
            Self::MatchWon => "match_won",
            Self::TournamentWin => "tournament_win",
            Self::VideoUploaded => "video_uploaded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstPost,
    Prolific,
    RisingStar,
    Champion,
    Centurion,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::FirstPost,
        Badge::Prolific,
        Badge::RisingStar,
        Badge::Champion,
        Badge::Centurion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPost => "first_post",
            Self::Prolific => "prolific",
            Self::RisingStar => "rising_star",
            Self::Champion => "champion",
            Self::Centurion => "centurion",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Badge> {
        Self::ALL.into_iter().find(|badge| badge.as_str() == value)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::FirstPost => "First Post",
            Self::Prolific => "Prolific",
            Self::RisingStar => "Rising Star",
            Self::Champion => "Champion",
            Self::Centurion => "Centurion",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstPost => "Published a first post",
            Self::Prolific => "Published 50 posts",
            Self::RisingStar => "Reached 100 followers",
            Self::Champion => "Won a tournament",
            Self::Centurion => "Earned 1000 points",
        }
    }

    fn is_earned(&self, stats: &BadgeStats) -> bool {
        match self {
            Self::FirstPost => stats.posts >= 1,
            Self::Prolific => stats.posts >= 50,
            Self::RisingStar => stats.followers >= 100,
            Self::Champion => stats.tournament_wins >= 1,
            Self::Centurion => stats.total_earned >= 1000,
        }
    }
}

/// Counters the badge thresholds are checked against.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeStats {
    pub posts: i64,
    pub followers: i64,
    pub tournament_wins: i64,
    pub total_earned: i64,
}

/// Every badge the stats qualify for, already-held ones included.
pub fn qualifying_badges(stats: &BadgeStats) -> Vec<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| badge.is_earned(stats))
        .collect()
}

/// Level curve: `floor(sqrt(earned / 100)) + 1`.
pub fn level_for(total_earned: i64) -> i64 {
    (total_earned.max(0) / 100).isqrt() + 1
}

/// Points still needed to reach the next level.
pub fn points_to_next_level(total_earned: i64) -> i64 {
    let level = level_for(total_earned);
    level * level * 100 - total_earned.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_curve() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(399), 2);
        assert_eq!(level_for(400), 3);
        assert_eq!(level_for(-50), 1);
    }

    #[test]
    fn next_level_distance() {
        assert_eq!(points_to_next_level(0), 100);
        assert_eq!(points_to_next_level(150), 250);
        assert_eq!(points_to_next_level(400), 500);
    }

    #[test]
    fn badges_follow_thresholds() {
        let stats = BadgeStats {
            posts: 1,
            followers: 120,
            tournament_wins: 0,
            total_earned: 999,
        };
        let badges = qualifying_badges(&stats);
        assert_eq!(badges, vec![Badge::FirstPost, Badge::RisingStar]);

        let stats = BadgeStats {
            posts: 50,
            followers: 0,
            tournament_wins: 2,
            total_earned: 1000,
        };
        let badges = qualifying_badges(&stats);
        assert!(badges.contains(&Badge::Prolific));
        assert!(badges.contains(&Badge::Champion));
        assert!(badges.contains(&Badge::Centurion));
    }

    #[test]
    fn badge_names_round_trip_through_storage() {
        for badge in Badge::ALL {
            assert_eq!(Badge::from_str_opt(badge.as_str()), Some(badge));
        }
        assert_eq!(Badge::from_str_opt("unknown"), None);
    }

    #[test]
    fn point_table() {
        assert_eq!(PointAction::TournamentWin.points(), 100);
        assert_eq!(PointAction::LikeReceived.points(), 1);
        assert_eq!(PointAction::VideoUploaded.as_str(), "video_uploaded");
    }

    #[test]
    fn only_received_engagement_is_deduplicated() {
        assert!(PointAction::LikeReceived.once_per_actor());
        assert!(PointAction::FollowerGained.once_per_actor());
        assert!(!PointAction::PostCreated.once_per_actor());
        assert!(!PointAction::MatchWon.once_per_actor());
    }
}
