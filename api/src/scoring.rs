//! Partial (live) scoring for a fielded roster.
//!
//! A pass walks the starters in position order, copies each one's live
//! update from the feed, lets a benched reserve of the same position cover a
//! starter who never entered play once that starter's match is over, and
//! applies the captain multiplier to the captain's own points.

use crate::client::{ApiError, ApiResult};
use crate::{Club, Match, Player, Position, Roster};
use log::debug;
use std::collections::{HashMap, HashSet};

pub const CAPTAIN_MULTIPLIER: f64 = 1.5;

/// A reserve needs at least this many points to take a starter's place.
pub const MIN_SUBSTITUTE_POINTS: f64 = 0.1;

/// Live updates for the round, keyed by player id.
#[derive(Debug, Clone, Default)]
pub struct LiveFeed {
    players: HashMap<u64, Player>,
}

impl LiveFeed {
    pub fn new(players: HashMap<u64, Player>) -> Self {
        Self { players }
    }

    /// Parse a saved `/atletas/pontuados` payload.
    pub fn from_json(json: &str) -> ApiResult<Self> {
        let raw: crate::wire::LiveFeedResponse = serde_json::from_str(json)
            .map_err(|e| ApiError::InvalidInput(format!("invalid live feed snapshot: {e}")))?;
        crate::client::map_live_feed(raw)
    }

    pub fn get(&self, player_id: u64) -> Option<&Player> {
        self.players.get(&player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Every entry must be keyed by a positive id matching its record, with
    /// finite points.
    pub fn validate(&self) -> ApiResult<()> {
        for (&id, player) in &self.players {
            if id == 0 || player.id != id {
                return Err(ApiError::InvalidInput(format!(
                    "live feed key {id} does not match player record {}",
                    player.id
                )));
            }
            if !player.points.is_finite() {
                return Err(ApiError::InvalidInput(format!(
                    "live feed entry {id} has non-finite points"
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<Player> for LiveFeed {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self { players: iter.into_iter().map(|p| (p.id, p)).collect() }
    }
}

/// Points a reserve contributes in place of a starter, and the position it
/// consumed (if any).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    pub points: f64,
    pub position: Option<Position>,
    pub reserve_id: Option<u64>,
}

/// Whether `club`'s match in `matches` is over. An unresolved club, or one
/// with no match in the list, is never finished. If a club appears in more
/// than one match the last one decides.
pub fn is_match_finished(club: Option<&Club>, matches: &[Match]) -> bool {
    let Some(club) = club.filter(|c| c.id != 0) else {
        return false;
    };
    matches
        .iter()
        .filter(|m| m.involves(club))
        .last()
        .map(Match::is_finished)
        .unwrap_or(false)
}

/// First-fit reserve lookup for a starter who did not enter play.
///
/// Reserves are scanned in stored order. When the starter is the captain,
/// every same-position reserve reached by the scan is credited once as
/// captain cover; the first same-position reserve with at least
/// [`MIN_SUBSTITUTE_POINTS`] is then credited (again) and consumes the
/// position. Nothing happens before the starter's match is over or once the
/// position has already been consumed in this pass.
pub fn resolve_substitution(
    starter: &Player,
    reserves: &[Player],
    match_finished: bool,
    substituted: &HashSet<Position>,
) -> Substitution {
    let mut credit = Substitution::default();
    if starter.entered_play || !match_finished || substituted.contains(&starter.position) {
        return credit;
    }

    for reserve in reserves.iter().filter(|r| r.position == starter.position) {
        if starter.is_captain {
            credit.points += reserve.points;
        }
        if reserve.points >= MIN_SUBSTITUTE_POINTS {
            credit.points += reserve.points;
            credit.position = Some(starter.position);
            credit.reserve_id = Some(reserve.id);
            break;
        }
    }
    credit
}

/// Recompute `roster.points` and `roster.played` from the live feed.
///
/// Inputs are checked before anything is touched; on error the roster is left
/// as it was.
pub fn compute_team_score<'r>(
    roster: &'r mut Roster,
    feed: &LiveFeed,
    matches: &[Match],
) -> ApiResult<&'r mut Roster> {
    feed.validate()?;
    validate_roster(roster)?;

    roster.points = 0.0;
    roster.played = 0;

    for reserve in roster.reserves.iter_mut().flatten() {
        match feed.get(reserve.id) {
            Some(live) => {
                reserve.points = live.points;
                reserve.scout = live.scout.clone();
            }
            None => {
                reserve.points = 0.0;
                reserve.scout.clear();
            }
        }
    }

    let reserves: &[Player] = roster.reserves.as_deref().unwrap_or_default();
    let mut substituted: HashSet<Position> = HashSet::new();

    for starter in roster.starters.iter_mut() {
        match feed.get(starter.id) {
            Some(live) => {
                starter.nickname = live.nickname.clone();
                starter.points = live.points;
                starter.scout = live.scout.clone();
                starter.entered_play = live.entered_play;
                roster.played += 1;
            }
            None => {
                starter.nickname.clear();
                starter.points = 0.0;
                starter.scout.clear();
                starter.entered_play = false;
            }
        }

        if !starter.entered_play {
            let finished = is_match_finished(starter.club.as_ref(), matches);
            let sub = resolve_substitution(starter, reserves, finished, &substituted);
            if let Some(position) = sub.position {
                debug!(
                    "reserve {:?} covers starter {} at {}: {:.2}",
                    sub.reserve_id,
                    starter.id,
                    position.abbreviation(),
                    sub.points
                );
                substituted.insert(position);
            }
            roster.points += sub.points;
        }

        if starter.is_captain {
            starter.points *= CAPTAIN_MULTIPLIER;
        }
        roster.points += starter.points;
    }

    Ok(roster)
}

fn validate_roster(roster: &Roster) -> ApiResult<()> {
    if let Some(player) = roster.entries().map(|e| e.player).find(|p| p.id == 0) {
        return Err(ApiError::InvalidInput(format!(
            "roster entry without a player id ({})",
            player.nickname
        )));
    }
    let captains = roster.starters.iter().filter(|p| p.is_captain).count();
    if captains > 1 {
        return Err(ApiError::InvalidInput(format!("roster has {captains} captains")));
    }
    if let Some(captain_id) = roster.captain_id {
        let flagged = roster.captain().map(|p| p.id);
        if !roster.starters.iter().any(|p| p.id == captain_id) || flagged.is_some_and(|id| id != captain_id) {
            return Err(ApiError::InvalidInput(format!(
                "captain {captain_id} is not the roster's flagged starter"
            )));
        }
    }
    Ok(())
}
