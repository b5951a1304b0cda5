use cartola_api::{Club, League, LiveFeed, Market, Match, Roster, TeamInfo};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadMarket,
    LoadClubs,
    /// `None` means the current round.
    LoadMatches { round: Option<u32> },
    LoadTeam { team_id: u64, round: Option<u32> },
    /// Score every team against one feed; `feed_path` loads a saved snapshot
    /// instead of the live one.
    LoadPartials { team_ids: Vec<u64>, feed_path: Option<PathBuf> },
    LoadLiveFeed { save_to: Option<PathBuf> },
    Search { term: String },
}

/// Outcome of scoring one requested team.
#[derive(Debug)]
pub struct TeamPartial {
    pub team_id: u64,
    pub outcome: Result<Roster, String>,
}

#[derive(Debug)]
pub enum NetworkResponse {
    MarketLoaded { market: Market },
    ClubsLoaded { clubs: Vec<Club> },
    MatchesLoaded { round: u32, matches: Vec<Match> },
    TeamLoaded { roster: Roster },
    /// In the order the teams were requested.
    PartialsLoaded { round: u32, partials: Vec<TeamPartial> },
    LiveFeedLoaded { feed: LiveFeed, saved_to: Option<PathBuf> },
    SearchResults { teams: Vec<TeamInfo>, leagues: Vec<League> },
    Error { message: String },
}
