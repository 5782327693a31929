use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::features::{
    admin, auth, clubs, gamification, media, messages, notifications, posts, realtime, scouting,
    shop, tournaments, users,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Pitchside API", description = "Football social network"),
    paths(
        admin::handlers::stats,
        admin::handlers::list_users,
        admin::handlers::suspend_user,
        admin::handlers::unsuspend_user,
        admin::handlers::verify_user,
        admin::handlers::delete_post,
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::me,
        auth::handlers::change_password,
        clubs::handlers::squad,
        clubs::handlers::staff,
        clubs::handlers::add_member,
        clubs::handlers::remove_member,
        clubs::handlers::add_staff,
        clubs::handlers::transfer,
        clubs::handlers::user_transfers,
        clubs::handlers::user_callups,
        clubs::handlers::call_up,
        gamification::handlers::my_summary,
        gamification::handlers::user_achievements,
        gamification::handlers::leaderboard,
        gamification::handlers::list_rewards,
        gamification::handlers::redeem_reward,
        gamification::handlers::admin_list_rewards,
        gamification::handlers::create_reward,
        gamification::handlers::update_reward,
        media::handlers::create_stream,
        media::handlers::list_streams,
        media::handlers::get_stream,
        media::handlers::start_stream,
        media::handlers::end_stream,
        media::handlers::upload_video,
        media::handlers::get_video,
        media::handlers::delete_video,
        media::handlers::user_videos,
        messages::handlers::start_conversation,
        messages::handlers::list_conversations,
        messages::handlers::list_messages,
        messages::handlers::send_message,
        messages::handlers::mark_read,
        notifications::handlers::list_notifications,
        notifications::handlers::unread_count,
        notifications::handlers::mark_read,
        notifications::handlers::mark_all_read,
        posts::handlers::create_post,
        posts::handlers::get_post,
        posts::handlers::delete_post,
        posts::handlers::feed,
        posts::handlers::user_posts,
        posts::handlers::list_comments,
        posts::handlers::add_comment,
        posts::handlers::delete_comment,
        posts::handlers::like_post,
        posts::handlers::unlike_post,
        realtime::handlers::connect,
        scouting::handlers::recommendations,
        scouting::handlers::get_shortlist,
        scouting::handlers::add_to_shortlist,
        scouting::handlers::remove_from_shortlist,
        shop::handlers::list_products,
        shop::handlers::get_product,
        shop::handlers::create_order,
        shop::handlers::list_orders,
        shop::handlers::get_order,
        shop::handlers::checkout,
        shop::handlers::cancel_order,
        shop::handlers::admin_list_products,
        shop::handlers::create_product,
        shop::handlers::update_product,
        shop::handlers::delete_product,
        shop::handlers::confirm_payment,
        tournaments::handlers::create_tournament,
        tournaments::handlers::list_tournaments,
        tournaments::handlers::get_tournament,
        tournaments::handlers::update_status,
        tournaments::handlers::register_team,
        tournaments::handlers::start_tournament,
        tournaments::handlers::standings,
        tournaments::handlers::record_result,
        users::handlers::search_users,
        users::handlers::get_profile,
        users::handlers::update_me,
        users::handlers::follow,
        users::handlers::unfollow,
        users::handlers::followers,
        users::handlers::following,
    ),
    components(
        schemas(
            storage::dto::admin::PlatformStats,
            storage::dto::admin::AdminUserEntry,
            storage::dto::auth::RegisterRequest,
            storage::dto::auth::LoginRequest,
            storage::dto::auth::ChangePasswordRequest,
            storage::dto::auth::AuthResponse,
            storage::dto::club::AddMemberRequest,
            storage::dto::club::AddStaffRequest,
            storage::dto::club::TransferRequest,
            storage::dto::club::CallupRequest,
            storage::dto::club::SquadMember,
            storage::dto::club::StaffEntry,
            storage::dto::club::TransferResponse,
            storage::dto::common::PaginationMeta,
            storage::dto::gamification::BadgeResponse,
            storage::dto::gamification::GamificationSummary,
            storage::dto::gamification::LeaderboardEntry,
            storage::dto::gamification::CreateRewardRequest,
            storage::dto::gamification::UpdateRewardRequest,
            storage::dto::gamification::RedemptionResponse,
            storage::dto::media::CreateStreamRequest,
            storage::dto::media::CreateVideoRequest,
            storage::dto::message::StartConversationRequest,
            storage::dto::message::SendMessageRequest,
            storage::dto::message::MessageResponse,
            storage::dto::message::ConversationResponse,
            storage::dto::message::MarkReadResponse,
            storage::dto::notification::UnreadCountResponse,
            storage::dto::post::CreatePostRequest,
            storage::dto::post::PostResponse,
            storage::dto::post::CreateCommentRequest,
            storage::dto::post::CommentResponse,
            storage::dto::post::LikeResponse,
            storage::dto::scouting::ScoreBreakdown,
            storage::dto::scouting::RecommendationEntry,
            storage::dto::scouting::ShortlistRequest,
            storage::dto::scouting::ShortlistEntry,
            storage::dto::shop::CreateProductRequest,
            storage::dto::shop::UpdateProductRequest,
            storage::dto::shop::OrderItemRequest,
            storage::dto::shop::CreateOrderRequest,
            storage::dto::shop::OrderLineResponse,
            storage::dto::shop::OrderResponse,
            storage::dto::shop::CheckoutResponse,
            storage::dto::tournament::CreateTournamentRequest,
            storage::dto::tournament::UpdateTournamentStatusRequest,
            storage::dto::tournament::RegisterTeamRequest,
            storage::dto::tournament::RecordResultRequest,
            storage::dto::tournament::TournamentDetailResponse,
            storage::dto::tournament::StandingsEntry,
            storage::dto::user::UserSummary,
            storage::dto::user::ProfileResponse,
            storage::dto::user::CurrentUserResponse,
            storage::dto::user::UpdateProfileRequest,
            storage::models::ClubMembership,
            storage::models::ClubStaffMember,
            storage::models::Transfer,
            storage::models::NationalTeamCallup,
            storage::models::Conversation,
            storage::models::Message,
            storage::models::Reward,
            storage::models::RewardRedemption,
            storage::models::Stream,
            storage::models::Video,
            storage::models::Notification,
            storage::models::Post,
            storage::models::Comment,
            storage::models::Profile,
            storage::models::Product,
            storage::models::Order,
            storage::models::OrderItem,
            storage::models::Tournament,
            storage::models::TournamentTeam,
            storage::models::Match,
            storage::models::UserRole,
            storage::models::Position,
            storage::models::PreferredFoot,
            storage::models::Visibility,
            storage::models::NotificationKind,
            storage::models::TournamentFormat,
            storage::models::TournamentStatus,
            storage::models::MatchStatus,
            storage::models::OrderStatus,
            storage::models::StreamStatus,
            storage::models::StaffRole,
            storage::services::gamification::PointAction,
            storage::services::gamification::Badge,
        )
    ),
    tags(
        (name = "auth", description = "Accounts and sessions"),
        (name = "users", description = "Profiles and the follow graph"),
        (name = "posts", description = "Feed, comments and likes"),
        (name = "messaging", description = "Direct conversations"),
        (name = "notifications", description = "Stored notifications"),
        (name = "realtime", description = "WebSocket events and call signaling"),
        (name = "tournaments", description = "Brackets, leagues and standings"),
        (name = "scouting", description = "Player recommendations and shortlists"),
        (name = "gamification", description = "Points, badges and rewards"),
        (name = "shop", description = "Products, orders and payments"),
        (name = "media", description = "Live streams and videos"),
        (name = "clubs", description = "Squads, staff, transfers and national teams"),
        (name = "admin", description = "Moderation and catalogue management"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_both_security_schemes() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.security_schemes.contains_key("api_key"));
    }

    #[test]
    fn documents_every_feature() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/tournaments/{slug}/start",
            "/api/matches/{id}/result",
            "/api/scouting/recommendations",
            "/api/orders/{id}/checkout",
            "/api/ws",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
