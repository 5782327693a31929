//! Tournament progression: knockout seeding, round robin scheduling,
//! winner advancement and league standings.
//!
//! Everything here works on already-fetched rows and plain indices so the
//! repository can apply the resulting plan inside one transaction.

use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use crate::dto::tournament::StandingsEntry;

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

/// Side of a match a team is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Home,
    Away,
}

/// A match to insert when a tournament starts. Team values are indices into
/// the seeded team list (0 = top seed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMatch {
    pub round: u16,
    pub position: u16,
    pub home: Option<usize>,
    pub away: Option<usize>,
    /// Set for first-round byes: the team that advances without playing.
    pub walkover: Option<usize>,
}

/// Smallest power of two that holds every team.
pub fn bracket_size(team_count: usize) -> usize {
    team_count.max(2).next_power_of_two()
}

pub fn knockout_rounds(team_count: usize) -> u16 {
    bracket_size(team_count).trailing_zeros() as u16
}

/// Seed numbers (1-based) in bracket slot order, e.g. `[1, 8, 4, 5, 2, 7, 3, 6]`
/// for eight slots. Adjacent slots meet in the first round and seeds 1 and 2
/// sit in opposite halves.
pub fn seeding_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let mirror = order.len() * 2 + 1;
        order = order.iter().flat_map(|&seed| [seed, mirror - seed]).collect();
    }
    order
}

/// Full knockout bracket for `team_count` seeded teams.
///
/// Missing seeds become byes: the paired top seed is recorded as a walkover
/// and already placed into its second-round slot. Later rounds are created
/// empty and filled by [`next_slot`] as results come in.
pub fn plan_knockout(team_count: usize) -> Vec<PlannedMatch> {
    let size = bracket_size(team_count);
    let rounds = knockout_rounds(team_count);
    let slots: Vec<Option<usize>> = seeding_order(size)
        .into_iter()
        .map(|seed| (seed <= team_count).then(|| seed - 1))
        .collect();

    let mut matches: Vec<PlannedMatch> = Vec::with_capacity(size - 1);

    for (position, pair) in slots.chunks(2).enumerate() {
        let (home, away) = (pair[0], pair[1]);
        let walkover = match (home, away) {
            (Some(team), None) | (None, Some(team)) => Some(team),
            _ => None,
        };
        matches.push(PlannedMatch {
            round: 1,
            position: position as u16,
            home,
            away,
            walkover,
        });
    }

    for round in 2..=rounds {
        let count = size >> round;
        for position in 0..count {
            matches.push(PlannedMatch {
                round,
                position: position as u16,
                home: None,
                away: None,
                walkover: None,
            });
        }
    }

    let byes: Vec<(u16, u16, usize)> = matches
        .iter()
        .filter_map(|m| m.walkover.map(|team| (m.round, m.position, team)))
        .collect();

    for (round, position, team) in byes {
        let (next_round, next_position, slot) = next_slot(round, position);
        if let Some(target) = matches
            .iter_mut()
            .find(|m| m.round == next_round && m.position == next_position)
        {
            match slot {
                Slot::Home => target.home = Some(team),
                Slot::Away => target.away = Some(team),
            }
        }
    }

    matches
}

/// Where the winner of `(round, position)` plays next.
pub fn next_slot(round: u16, position: u16) -> (u16, u16, Slot) {
    let slot = if position % 2 == 0 {
        Slot::Home
    } else {
        Slot::Away
    };
    (round + 1, position / 2, slot)
}

/// Both teams of a match that can still take a result. Byes and decided
/// matches are rejected, as are knockout slots still waiting for a winner.
pub fn playable_teams<T: Copy>(
    completed: bool,
    bye: bool,
    home: Option<T>,
    away: Option<T>,
) -> Result<(T, T), String> {
    if bye {
        return Err("Byes do not take results".to_string());
    }
    if completed {
        return Err("Match already has a result".to_string());
    }
    match (home, away) {
        (Some(home), Some(away)) => Ok((home, away)),
        _ => Err("Both teams must be known before recording a result".to_string()),
    }
}

/// Where a tournament stands after one more result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress<T> {
    /// Knockout: the winner moves into this slot of the next round.
    Advance { round: u16, position: u16, slot: Slot, team: T },
    /// League still has matches to play.
    Continue,
    Champion(T),
}

/// Knockout progression: the final crowns its winner, every other winner
/// moves on.
pub fn knockout_progress<T>(round: u16, position: u16, final_round: u16, winner: T) -> Progress<T> {
    if round >= final_round {
        return Progress::Champion(winner);
    }
    let (round, position, slot) = next_slot(round, position);
    Progress::Advance {
        round,
        position,
        slot,
        team: winner,
    }
}

/// League progression: once nothing is pending the table leader wins.
pub fn league_progress(pending: i64, standings: &[StandingsEntry]) -> Progress<Uuid> {
    if pending > 0 {
        return Progress::Continue;
    }
    match standings.first() {
        Some(leader) => Progress::Champion(leader.team_id),
        None => Progress::Continue,
    }
}

/// Single round robin using the circle method.
///
/// Returns one list of `(home, away)` index pairs per round. Every pair of
/// teams meets exactly once; with an odd count one team rests each round.
pub fn round_robin(team_count: usize) -> Vec<Vec<(usize, usize)>> {
    if team_count < 2 {
        return Vec::new();
    }

    let ghost = team_count;
    let mut ring: Vec<usize> = (0..team_count).collect();
    if team_count % 2 == 1 {
        ring.push(ghost);
    }
    let size = ring.len();

    let mut rounds = Vec::with_capacity(size - 1);
    for round in 0..size - 1 {
        let mut fixtures = Vec::with_capacity(size / 2);
        for i in 0..size / 2 {
            let (a, b) = (ring[i], ring[size - 1 - i]);
            if a == ghost || b == ghost {
                continue;
            }
            // Alternate the fixed team's venue so it is not always at home.
            if i == 0 && round % 2 == 1 {
                fixtures.push((b, a));
            } else {
                fixtures.push((a, b));
            }
        }
        rounds.push(fixtures);

        if let Some(last) = ring.pop() {
            ring.insert(1, last);
        }
    }

    rounds
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

/// Decides a match. Knockout ties must be settled on penalties.
pub fn decide_outcome(
    home_score: i16,
    away_score: i16,
    penalties: Option<(i16, i16)>,
    allow_draw: bool,
) -> Result<Outcome, String> {
    if home_score < 0 || away_score < 0 {
        return Err("scores cannot be negative".to_string());
    }

    match home_score.cmp(&away_score) {
        Ordering::Greater => Ok(Outcome::HomeWin),
        Ordering::Less => Ok(Outcome::AwayWin),
        Ordering::Equal if allow_draw => Ok(Outcome::Draw),
        Ordering::Equal => match penalties {
            Some((home, away)) if home > away => Ok(Outcome::HomeWin),
            Some((home, away)) if away > home => Ok(Outcome::AwayWin),
            Some(_) => Err("penalty shootout must produce a winner".to_string()),
            None => Err("knockout draws require penalty scores".to_string()),
        },
    }
}

/// A completed league result.
#[derive(Debug, Clone, Copy)]
pub struct MatchScore {
    pub home: Uuid,
    pub away: Uuid,
    pub home_score: i16,
    pub away_score: i16,
}

/// League table: 3 points a win, 1 a draw, ordered by points, goal
/// difference, goals scored and finally team name.
pub fn compute_standings(teams: &[(Uuid, String)], results: &[MatchScore]) -> Vec<StandingsEntry> {
    let mut table: HashMap<Uuid, StandingsEntry> = teams
        .iter()
        .map(|(team_id, name)| {
            (
                *team_id,
                StandingsEntry {
                    rank: 0,
                    team_id: *team_id,
                    team_name: name.clone(),
                    played: 0,
                    won: 0,
                    drawn: 0,
                    lost: 0,
                    goals_for: 0,
                    goals_against: 0,
                    goal_difference: 0,
                    points: 0,
                },
            )
        })
        .collect();

    for result in results {
        let home_goals = i32::from(result.home_score);
        let away_goals = i32::from(result.away_score);

        if let Some(home) = table.get_mut(&result.home) {
            home.record(home_goals, away_goals);
        }
        if let Some(away) = table.get_mut(&result.away) {
            away.record(away_goals, home_goals);
        }
    }

    let mut standings: Vec<StandingsEntry> = table.into_values().collect();
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.team_name.cmp(&b.team_name))
    });

    for (index, entry) in standings.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }

    standings
}

impl StandingsEntry {
    fn record(&mut self, scored: i32, conceded: i32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = self.goals_for - self.goals_against;

        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
            }
            Ordering::Equal => {
                self.drawn += 1;
                self.points += POINTS_FOR_DRAW;
            }
            Ordering::Less => self.lost += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bracket_size_rounds_up_to_power_of_two() {
        assert_eq!(bracket_size(2), 2);
        assert_eq!(bracket_size(5), 8);
        assert_eq!(bracket_size(8), 8);
        assert_eq!(bracket_size(9), 16);
        assert_eq!(knockout_rounds(6), 3);
    }

    #[test]
    fn seeding_keeps_top_seeds_apart() {
        let order = seeding_order(8);
        assert_eq!(order, vec![1, 8, 4, 5, 2, 7, 3, 6]);

        let first_half = &order[..4];
        assert!(first_half.contains(&1));
        assert!(!first_half.contains(&2));
    }

    #[test]
    fn seeded_pairs_sum_to_size_plus_one() {
        let order = seeding_order(16);
        for pair in order.chunks(2) {
            assert_eq!(pair[0] + pair[1], 17);
        }
    }

    #[test]
    fn full_bracket_has_no_byes() {
        let plan = plan_knockout(4);
        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|m| m.walkover.is_none()));

        let first = &plan[0];
        assert_eq!((first.home, first.away), (Some(0), Some(3)));
    }

    #[test]
    fn byes_go_to_top_seeds_and_prefill_round_two() {
        let plan = plan_knockout(6);
        assert_eq!(plan.len(), 7);

        let byes: Vec<usize> = plan.iter().filter_map(|m| m.walkover).collect();
        assert_eq!(byes.len(), 2);
        assert!(byes.contains(&0));
        assert!(byes.contains(&1));

        for m in plan.iter().filter(|m| m.round == 1) {
            assert!(m.home.is_some() || m.away.is_some());
        }

        let round_two: Vec<&PlannedMatch> = plan.iter().filter(|m| m.round == 2).collect();
        let placed: Vec<usize> = round_two
            .iter()
            .flat_map(|m| [m.home, m.away])
            .flatten()
            .collect();
        assert_eq!(placed.len(), 2);
        assert!(placed.contains(&0) && placed.contains(&1));
    }

    #[test]
    fn three_teams_give_top_seed_a_bye_into_the_final() {
        let plan = plan_knockout(3);
        let final_match = plan.iter().find(|m| m.round == 2).unwrap();
        assert_eq!(final_match.home, Some(0));
        assert_eq!(final_match.away, None);
    }

    #[test]
    fn winners_advance_to_half_position() {
        assert_eq!(next_slot(1, 0), (2, 0, Slot::Home));
        assert_eq!(next_slot(1, 1), (2, 0, Slot::Away));
        assert_eq!(next_slot(2, 3), (3, 1, Slot::Away));
    }

    /// Plays a planned knockout to the end, home side always winning, and
    /// returns every champion the progression produced.
    fn play_knockout(team_count: usize) -> Vec<usize> {
        let mut plan = plan_knockout(team_count);
        let final_round = knockout_rounds(team_count);
        let mut champions = Vec::new();

        for round in 1..=final_round {
            let positions: Vec<u16> = plan
                .iter()
                .filter(|m| m.round == round && m.walkover.is_none())
                .map(|m| m.position)
                .collect();

            for position in positions {
                let game = plan
                    .iter()
                    .find(|m| m.round == round && m.position == position)
                    .unwrap()
                    .clone();
                let (home, _away) = playable_teams(false, false, game.home, game.away).unwrap();

                match knockout_progress(round, position, final_round, home) {
                    Progress::Champion(team) => champions.push(team),
                    Progress::Advance { round, position, slot, team } => {
                        let target = plan
                            .iter_mut()
                            .find(|m| m.round == round && m.position == position)
                            .unwrap();
                        match slot {
                            Slot::Home => target.home = Some(team),
                            Slot::Away => target.away = Some(team),
                        }
                    }
                    Progress::Continue => panic!("knockouts never stall"),
                }
            }
        }

        champions
    }

    #[test]
    fn knockouts_with_byes_crown_exactly_one_champion() {
        for teams in [2, 3, 5, 6, 8] {
            assert_eq!(play_knockout(teams), vec![0], "teams: {}", teams);
        }
    }

    #[test]
    fn winners_fill_the_next_round_before_the_final() {
        assert_eq!(
            knockout_progress(1, 3, 3, 'x'),
            Progress::Advance { round: 2, position: 1, slot: Slot::Away, team: 'x' }
        );
        assert_eq!(knockout_progress(3, 0, 3, 'x'), Progress::Champion('x'));
    }

    #[test]
    fn byes_and_decided_matches_take_no_result() {
        assert!(playable_teams(false, true, Some(1), None).is_err());
        assert!(playable_teams(true, false, Some(1), Some(2)).is_err());
        assert!(playable_teams(false, false, Some(1), None).is_err());
        assert_eq!(playable_teams(false, false, Some(1), Some(2)), Ok((1, 2)));
    }

    #[test]
    fn league_ends_with_the_table_leader() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let teams = vec![(a, "Athletic".to_string()), (b, "Borough".to_string())];
        let results = vec![MatchScore { home: b, away: a, home_score: 2, away_score: 0 }];
        let table = compute_standings(&teams, &results);

        assert_eq!(league_progress(1, &table), Progress::Continue);
        assert_eq!(league_progress(0, &table), Progress::Champion(b));
        assert_eq!(league_progress(0, &[]), Progress::Continue);
    }

    #[test]
    fn round_robin_pairs_everyone_once() {
        for n in 2..=9 {
            let rounds = round_robin(n);
            let expected_rounds = if n % 2 == 0 { n - 1 } else { n };
            assert_eq!(rounds.len(), expected_rounds, "teams: {}", n);

            let mut seen = HashSet::new();
            for fixtures in &rounds {
                let mut playing = HashSet::new();
                for &(a, b) in fixtures {
                    assert!(playing.insert(a) && playing.insert(b));
                    assert!(seen.insert((a.min(b), a.max(b))));
                }
            }
            assert_eq!(seen.len(), n * (n - 1) / 2);
        }
    }

    #[test]
    fn knockout_draw_needs_penalties() {
        assert_eq!(decide_outcome(2, 1, None, false), Ok(Outcome::HomeWin));
        assert!(decide_outcome(1, 1, None, false).is_err());
        assert!(decide_outcome(1, 1, Some((3, 3)), false).is_err());
        assert_eq!(decide_outcome(1, 1, Some((4, 5)), false), Ok(Outcome::AwayWin));
        assert_eq!(decide_outcome(0, 0, None, true), Ok(Outcome::Draw));
        assert!(decide_outcome(-1, 0, None, true).is_err());
    }

    #[test]
    fn standings_order_by_points_then_goal_difference() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let teams = vec![
            (a, "Athletic".to_string()),
            (b, "Borough".to_string()),
            (c, "City".to_string()),
        ];
        let results = vec![
            MatchScore { home: a, away: b, home_score: 1, away_score: 0 },
            MatchScore { home: b, away: c, home_score: 4, away_score: 0 },
            MatchScore { home: c, away: a, home_score: 1, away_score: 1 },
        ];

        let table = compute_standings(&teams, &results);
        assert_eq!(table[0].team_id, a);
        assert_eq!(table[0].points, 4);
        assert_eq!(table[1].team_id, b);
        assert_eq!(table[1].goal_difference, 3);
        assert_eq!(table[2].team_id, c);
        assert_eq!(table[2].points, 1);
        assert_eq!(
            table.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn level_tables_fall_back_to_name() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let teams = vec![(b, "Zebras".to_string()), (a, "Albion".to_string())];

        let table = compute_standings(&teams, &[]);
        assert_eq!(table[0].team_name, "Albion");
        assert_eq!(table[0].played, 0);
    }
}
