pub mod cache;
pub mod client;
pub mod scoring;
pub mod wire;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub use scoring::{LiveFeed, compute_team_score};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the Cartola wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: u32,
    pub name: String,         // "Flamengo"
    pub abbreviation: String, // "FLA"
    pub shield: Option<String>, // 60x60 shield url
}

/// Pitch position. Ordered by the provider's numeric id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Goalkeeper = 1,
    Fullback = 2,
    Defender = 3,
    Midfielder = 4,
    Forward = 5,
    Coach = 6,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Goalkeeper,
        Position::Fullback,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
        Position::Coach,
    ];

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goleiro",
            Position::Fullback => "Lateral",
            Position::Defender => "Zagueiro",
            Position::Midfielder => "Meia",
            Position::Forward => "Atacante",
            Position::Coach => "Técnico",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GOL",
            Position::Fullback => "LAT",
            Position::Defender => "ZAG",
            Position::Midfielder => "MEI",
            Position::Forward => "ATA",
            Position::Coach => "TEC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Doubtful = 2,
    Suspended = 3,
    Injured = 5,
    Null = 6,
    Probable = 7,
}

impl PlayerStatus {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            2 => Some(PlayerStatus::Doubtful),
            3 => Some(PlayerStatus::Suspended),
            5 => Some(PlayerStatus::Injured),
            6 => Some(PlayerStatus::Null),
            7 => Some(PlayerStatus::Probable),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerStatus::Doubtful => "Dúvida",
            PlayerStatus::Suspended => "Suspenso",
            PlayerStatus::Injured => "Contundido",
            PlayerStatus::Null => "Nulo",
            PlayerStatus::Probable => "Provável",
        }
    }
}

/// A player (or coach). `points` and `scout` hold the live values for the
/// round once a scoring pass has run; a player without a live update scores 0
/// and has not entered play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub nickname: String,
    pub photo: String,
    pub points: f64,
    pub scout: BTreeMap<String, i32>,
    pub position: Position,
    pub games: Option<u32>,
    pub average: Option<f64>,
    pub entered_play: bool,
    pub club: Option<Club>, // None = free agent / unresolved
    pub min_to_appreciate: f64,
    pub status: Option<PlayerStatus>,
    /// Relative to the roster the player was loaded from.
    pub is_captain: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub kickoff: Option<NaiveDateTime>,
    pub venue: String,
    pub valid: bool,
    pub home: Club,
    pub away: Club,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub broadcast_label: String,  // "veja como foi" once the match is over
    pub broadcast_status: String, // "ENCERRADA" once the match is over
    pub home_table_position: Option<u32>,
    pub away_table_position: Option<u32>,
    pub round: Option<u32>,
}

pub const BROADCAST_LABEL_ENDED: &str = "veja como foi";
pub const BROADCAST_STATUS_ENDED: &str = "ENCERRADA";

impl Match {
    /// An invalidated match counts as finished: it will never produce more points.
    pub fn is_finished(&self) -> bool {
        self.broadcast_label == BROADCAST_LABEL_ENDED
            || self.broadcast_status == BROADCAST_STATUS_ENDED
            || !self.valid
    }

    pub fn involves(&self, club: &Club) -> bool {
        self.home.id == club.id || self.away.id == club.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Starter,
    Reserve,
}

#[derive(Debug, Clone, Copy)]
pub struct RosterEntry<'a> {
    pub player: &'a Player,
    pub role: Role,
}

/// A fielded team for one round. `points` and `played` are derived and
/// rebuilt from scratch by every scoring pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub patrimony: f64,
    pub team_value: f64,
    pub last_round_points: f64,
    pub starters: Vec<Player>,         // sorted by position id
    pub reserves: Option<Vec<Player>>, // sorted by position id
    pub info: TeamInfo,
    pub points: f64,
    pub played: u32,
    pub round: u32,
    pub captain_id: Option<u64>,
}

impl Roster {
    pub fn captain(&self) -> Option<&Player> {
        self.starters.iter().find(|p| p.is_captain)
    }

    pub fn entries(&self) -> impl Iterator<Item = RosterEntry<'_>> {
        let starters = self.starters.iter().map(|player| RosterEntry { player, role: Role::Starter });
        let reserves = self
            .reserves
            .iter()
            .flatten()
            .map(|player| RosterEntry { player, role: Role::Reserve });
        starters.chain(reserves)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: u64,
    pub name: String,
    pub owner_name: String,
    pub slug: String,
    pub subscriber: bool,
    pub points: Option<f64>,       // for the requested ranking order
    pub round_points: Option<f64>, // only set alongside a ranking order
    pub shield: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketStatus {
    #[default]
    Open = 1,
    Closed = 2,
    Updating = 3,
    Maintenance = 4,
    SeasonOver = 6,
}

impl MarketStatus {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(MarketStatus::Open),
            2 => Some(MarketStatus::Closed),
            3 => Some(MarketStatus::Updating),
            4 => Some(MarketStatus::Maintenance),
            6 => Some(MarketStatus::SeasonOver),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketStatus::Open => "Mercado aberto",
            MarketStatus::Closed => "Mercado fechado",
            MarketStatus::Updating => "Mercado em atualização",
            MarketStatus::Maintenance => "Mercado em manutenção",
            MarketStatus::SeasonOver => "Final de temporada",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub current_round: u32,
    pub status: MarketStatus,
    pub teams_lined_up: u64,
    pub closes_at: Option<NaiveDateTime>,
}

/// Sort order for league standings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingOrder {
    #[default]
    Championship,
    Turn,
    Month,
    Round,
    Patrimony,
}

impl RankingOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingOrder::Championship => "campeonato",
            RankingOrder::Turn => "turno",
            RankingOrder::Month => "mes",
            RankingOrder::Round => "rodada",
            RankingOrder::Patrimony => "patrimonio",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub teams: Option<Vec<TeamInfo>>,
    pub pennant: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSponsor {
    pub id: u64,
    pub name: String,
    pub url: String,
}

/// One round of a player's scoring history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsHistory {
    pub player_id: u64,
    pub round: u32,
    pub points: Option<f64>,
    pub price: f64,
    pub variation: f64,
    pub average: f64,
}

/// Post-round summary, only published while the market is open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundHighlight {
    pub average_price: f64,
    pub average_points: f64,
    pub best_team: TeamInfo,
}

/// Most-picked players in the market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketHighlight {
    pub position: String,
    pub club_name: String,
    pub club_shield: String,
    pub selections: u64,
    pub player: HashMap<String, serde_json::Value>,
}

/// Most-picked captains or reserves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionPick {
    pub position: String,
    pub club_id: u32,
    pub club_shield: String,
    pub selections: u64,
    pub player: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club(id: u32) -> Club {
        Club { id, name: format!("Club {id}"), ..Default::default() }
    }

    #[test]
    fn position_lookup_round_trips_ids() {
        for p in Position::ALL {
            assert_eq!(Position::from_id(p.id()), Some(p));
        }
        assert_eq!(Position::from_id(0), None);
        assert_eq!(Position::from_id(7), None);
        assert_eq!(Position::Forward.abbreviation(), "ATA");
    }

    #[test]
    fn match_finished_by_label_status_or_invalidation() {
        let base = Match { valid: true, home: club(1), away: club(2), ..Default::default() };
        assert!(!base.is_finished());

        let by_label = Match { broadcast_label: BROADCAST_LABEL_ENDED.into(), ..base.clone() };
        assert!(by_label.is_finished());

        let by_status = Match { broadcast_status: BROADCAST_STATUS_ENDED.into(), ..base.clone() };
        assert!(by_status.is_finished());

        let invalid = Match { valid: false, ..base };
        assert!(invalid.is_finished());
    }

    #[test]
    fn roster_entries_list_starters_then_reserves() {
        let roster = Roster {
            starters: vec![Player { id: 1, ..Default::default() }],
            reserves: Some(vec![Player { id: 2, ..Default::default() }]),
            ..Default::default()
        };
        let roles: Vec<(u64, Role)> = roster.entries().map(|e| (e.player.id, e.role)).collect();
        assert_eq!(roles, vec![(1, Role::Starter), (2, Role::Reserve)]);
    }

    #[test]
    fn market_status_ids() {
        assert_eq!(MarketStatus::from_id(2), Some(MarketStatus::Closed));
        assert_eq!(MarketStatus::from_id(5), None);
        assert_eq!(RankingOrder::Patrimony.as_str(), "patrimonio");
    }
}
