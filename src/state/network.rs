use crate::state::messages::{NetworkRequest, NetworkResponse, TeamPartial};
use cartola_api::client::{ApiError, ApiResult, CartolaApi};
use cartola_api::{LiveFeed, MarketStatus, Match, Roster, compute_team_score};
use futures_util::{StreamExt, stream};
use log::{debug, error};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

pub struct NetworkWorker {
    client: CartolaApi,
    concurrency: usize,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        client: CartolaApi,
        concurrency: usize,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client, concurrency: concurrency.max(1), requests, responses }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let result = match request {
                NetworkRequest::LoadMarket => self.handle_load_market().await,
                NetworkRequest::LoadClubs => self.handle_load_clubs().await,
                NetworkRequest::LoadMatches { round } => self.handle_load_matches(round).await,
                NetworkRequest::LoadTeam { team_id, round } => {
                    self.handle_load_team(team_id, round).await
                }
                NetworkRequest::LoadPartials { team_ids, feed_path } => {
                    self.handle_load_partials(team_ids, feed_path).await
                }
                NetworkRequest::LoadLiveFeed { save_to } => self.handle_load_live_feed(save_to).await,
                NetworkRequest::Search { term } => self.handle_search(term).await,
            };

            debug!("network request complete");

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_market(&self) -> ApiResult<NetworkResponse> {
        let market = self.client.fetch_market().await?;
        Ok(NetworkResponse::MarketLoaded { market })
    }

    async fn handle_load_clubs(&self) -> ApiResult<NetworkResponse> {
        let mut clubs: Vec<_> = self.client.fetch_clubs().await?.into_values().collect();
        clubs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(NetworkResponse::ClubsLoaded { clubs })
    }

    async fn handle_load_matches(&self, round: Option<u32>) -> ApiResult<NetworkResponse> {
        let round = match round {
            Some(round) => round,
            None => self.client.fetch_market().await?.current_round,
        };
        debug!("loading matches for round {round}");
        let matches = self.client.fetch_matches(round).await?;
        Ok(NetworkResponse::MatchesLoaded { round, matches })
    }

    async fn handle_load_team(&self, team_id: u64, round: Option<u32>) -> ApiResult<NetworkResponse> {
        let roster = self.client.fetch_team(team_id, round).await?;
        Ok(NetworkResponse::TeamLoaded { roster })
    }

    /// Market, feed and matches are fetched once; teams go through a bounded
    /// pool and are then scored one after another.
    async fn handle_load_partials(
        &self,
        team_ids: Vec<u64>,
        feed_path: Option<PathBuf>,
    ) -> ApiResult<NetworkResponse> {
        let market = self.client.fetch_market().await?;
        let feed = match feed_path {
            Some(path) => load_feed_snapshot(&path).await?,
            None => {
                if market.status != MarketStatus::Closed {
                    return Err(ApiError::MarketNotClosed);
                }
                self.client.fetch_live_feed(None).await?
            }
        };
        let matches = self.client.fetch_matches(market.current_round).await?;
        debug!(
            "scoring {} teams against {} live entries and {} matches",
            team_ids.len(),
            feed.len(),
            matches.len()
        );

        let client = &self.client;
        let mut fetched: Vec<(usize, u64, ApiResult<Roster>)> = stream::iter(team_ids.into_iter().enumerate())
            .map(|(index, team_id)| async move { (index, team_id, client.fetch_team(team_id, None).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        fetched.sort_by_key(|(index, _, _)| *index);

        let partials = score_teams(
            fetched.into_iter().map(|(_, team_id, roster)| (team_id, roster)),
            &feed,
            &matches,
        );
        Ok(NetworkResponse::PartialsLoaded { round: market.current_round, partials })
    }

    async fn handle_load_live_feed(&self, save_to: Option<PathBuf>) -> ApiResult<NetworkResponse> {
        let raw = self.client.fetch_live_feed_raw(None).await?;
        let body = raw.to_string();
        if let Some(path) = &save_to {
            tokio::fs::write(path, &body).await.map_err(|e| {
                ApiError::Other(format!("cannot write live feed to {}: {e}", path.display()))
            })?;
            debug!("live feed saved to {}", path.display());
        }
        let feed = LiveFeed::from_json(&body)?;
        Ok(NetworkResponse::LiveFeedLoaded { feed, saved_to: save_to })
    }

    async fn handle_search(&self, term: String) -> ApiResult<NetworkResponse> {
        let (teams, leagues) =
            tokio::join!(self.client.search_teams(&term), self.client.search_leagues(&term));
        Ok(NetworkResponse::SearchResults { teams: teams?, leagues: leagues? })
    }
}

async fn load_feed_snapshot(path: &Path) -> ApiResult<LiveFeed> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        ApiError::InvalidInput(format!("cannot read live feed snapshot {}: {e}", path.display()))
    })?;
    LiveFeed::from_json(&json)
}

/// Score each fetched roster in turn. A team that failed to load or score
/// is reported without affecting the others.
fn score_teams(
    rosters: impl IntoIterator<Item = (u64, ApiResult<Roster>)>,
    feed: &LiveFeed,
    matches: &[Match],
) -> Vec<TeamPartial> {
    rosters
        .into_iter()
        .map(|(team_id, roster)| {
            let outcome = roster
                .and_then(|mut roster| {
                    compute_team_score(&mut roster, feed, matches)?;
                    Ok(roster)
                })
                .map_err(|e| e.to_string());
            TeamPartial { team_id, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartola_api::{Club, Player, Position};

    fn roster(team_id: u64, player_id: u64) -> Roster {
        let mut roster = Roster::default();
        roster.info.id = team_id;
        roster.starters = vec![Player {
            id: player_id,
            position: Position::Forward,
            club: Some(Club { id: 262, ..Default::default() }),
            ..Default::default()
        }];
        roster
    }

    #[test]
    fn teams_are_scored_in_request_order_and_failures_isolated() {
        let feed: LiveFeed = vec![
            Player { id: 1, points: 4.5, entered_play: true, ..Default::default() },
            Player { id: 2, points: 7.0, entered_play: true, ..Default::default() },
        ]
        .into_iter()
        .collect();

        let partials = score_teams(
            vec![
                (20, Ok(roster(20, 2))),
                (30, Err(ApiError::NotFound("/time/id/30".into()))),
                (10, Ok(roster(10, 1))),
            ],
            &feed,
            &[],
        );

        let ids: Vec<u64> = partials.iter().map(|p| p.team_id).collect();
        assert_eq!(ids, vec![20, 30, 10]);
        assert_eq!(partials[0].outcome.as_ref().map(|r| r.points).ok(), Some(7.0));
        assert!(partials[1].outcome.is_err());
        assert_eq!(partials[2].outcome.as_ref().map(|r| r.played).ok(), Some(1));
    }

    #[test]
    fn invalid_roster_is_reported_per_team() {
        let partials = score_teams(vec![(5, Ok(roster(5, 0)))], &LiveFeed::default(), &[]);
        let message = partials[0].outcome.as_ref().unwrap_err();
        assert!(message.contains("Invalid input"));
    }

    #[tokio::test]
    async fn missing_snapshot_is_invalid_input() {
        let err = load_feed_snapshot(Path::new("/nonexistent/feed.json")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
