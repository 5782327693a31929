text_enum!(
    /// Account role; decides which features a user can reach.
    UserRole {
        Athlete => "athlete",
        Coach => "coach",
        Scout => "scout",
        Club => "club",
        Fan => "fan",
        Admin => "admin",
    }
);

impl UserRole {
    /// Roles a user may pick at registration.
    pub fn is_self_assignable(&self) -> bool {
        !matches!(self, UserRole::Admin)
    }

    /// Roles allowed to query scouting recommendations.
    pub fn can_scout(&self) -> bool {
        matches!(self, UserRole::Scout | UserRole::Coach | UserRole::Club)
    }
}

text_enum!(
    Position {
        Goalkeeper => "goalkeeper",
        Defender => "defender",
        Midfielder => "midfielder",
        Forward => "forward",
    }
);

text_enum!(
    PreferredFoot {
        Left => "left",
        Right => "right",
        Both => "both",
    }
);

text_enum!(
    Visibility {
        Public => "public",
        Followers => "followers",
    }
);

text_enum!(
    NotificationKind {
        Follow => "follow",
        Like => "like",
        Comment => "comment",
        Message => "message",
        Tournament => "tournament",
        Achievement => "achievement",
        Order => "order",
        System => "system",
    }
);

text_enum!(
    TournamentFormat {
        Knockout => "knockout",
        League => "league",
    }
);

text_enum!(
    /// Lifecycle: draft -> registration -> in_progress -> completed.
    TournamentStatus {
        Draft => "draft",
        Registration => "registration",
        InProgress => "in_progress",
        Completed => "completed",
    }
);

impl TournamentStatus {
    /// Status changes an organizer may request directly. `in_progress` is
    /// only reachable by starting the tournament and `completed` only by
    /// finishing its matches.
    pub fn can_move_to(&self, next: TournamentStatus) -> bool {
        matches!(
            (self, next),
            (TournamentStatus::Draft, TournamentStatus::Registration)
        )
    }

    /// Same rule as [`Self::can_move_to`], reported like every other
    /// lifecycle conflict.
    pub fn ensure_can_move_to(&self, next: TournamentStatus) -> crate::error::Result<()> {
        if self.can_move_to(next) {
            Ok(())
        } else {
            Err(crate::error::StorageError::InvalidState(format!(
                "Cannot move a tournament from {} to {}",
                self, next
            )))
        }
    }
}

text_enum!(
    MatchStatus {
        Pending => "pending",
        Completed => "completed",
        Bye => "bye",
    }
);

text_enum!(
    OrderStatus {
        Pending => "pending",
        Paid => "paid",
        Cancelled => "cancelled",
    }
);

text_enum!(
    StreamStatus {
        Scheduled => "scheduled",
        Live => "live",
        Ended => "ended",
    }
);

text_enum!(
    StaffRole {
        HeadCoach => "head_coach",
        AssistantCoach => "assistant_coach",
        GoalkeepingCoach => "goalkeeping_coach",
        Physio => "physio",
        Analyst => "analyst",
        Scout => "scout",
        Director => "director",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_stored_names() {
        for status in TournamentStatus::ALL {
            let parsed: TournamentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, *status);
        }
        assert_eq!(TournamentStatus::InProgress.to_string(), "in_progress");
        assert_eq!(StaffRole::HeadCoach.as_str(), "head_coach");
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "striker".parse::<Position>().unwrap_err();
        assert!(err.contains("Position"));
    }

    #[test]
    fn admin_cannot_be_self_assigned() {
        assert!(!UserRole::Admin.is_self_assignable());
        assert!(UserRole::Scout.is_self_assignable());
    }

    #[test]
    fn only_talent_roles_can_scout() {
        assert!(UserRole::Scout.can_scout());
        assert!(UserRole::Club.can_scout());
        assert!(!UserRole::Athlete.can_scout());
        assert!(!UserRole::Fan.can_scout());
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&TournamentStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn organizer_transitions_only_open_registration() {
        assert!(TournamentStatus::Draft.can_move_to(TournamentStatus::Registration));
        assert!(!TournamentStatus::Registration.can_move_to(TournamentStatus::Draft));
        assert!(!TournamentStatus::Registration.can_move_to(TournamentStatus::InProgress));
        assert!(!TournamentStatus::InProgress.can_move_to(TournamentStatus::Completed));
    }

    #[test]
    fn illegal_status_moves_are_state_conflicts() {
        assert!(TournamentStatus::Draft
            .ensure_can_move_to(TournamentStatus::Registration)
            .is_ok());
        assert!(matches!(
            TournamentStatus::Completed.ensure_can_move_to(TournamentStatus::Registration),
            Err(crate::error::StorageError::InvalidState(_))
        ));
    }
}
