use crate::state::messages::{NetworkResponse, TeamPartial};
use cartola_api::{Club, League, LiveFeed, Market, Match, Player, Roster, TeamInfo};
use std::fmt::Write as _;
use std::io::{self, Write};

const TOP_SCORERS: usize = 10;

pub fn draw<W: Write>(out: &mut W, response: &NetworkResponse) -> io::Result<()> {
    out.write_all(render(response).as_bytes())?;
    out.flush()
}

pub fn render(response: &NetworkResponse) -> String {
    match response {
        NetworkResponse::MarketLoaded { market } => render_market(market),
        NetworkResponse::ClubsLoaded { clubs } => render_clubs(clubs),
        NetworkResponse::MatchesLoaded { round, matches } => render_matches(*round, matches),
        NetworkResponse::TeamLoaded { roster } => render_roster(roster),
        NetworkResponse::PartialsLoaded { round, partials } => render_partials(*round, partials),
        NetworkResponse::LiveFeedLoaded { feed, saved_to } => {
            let mut text = render_live_feed(feed);
            if let Some(path) = saved_to {
                let _ = writeln!(text, "Saved to {}", path.display());
            }
            text
        }
        NetworkResponse::SearchResults { teams, leagues } => render_search(teams, leagues),
        NetworkResponse::Error { message } => format!("{message}\n"),
    }
}

fn render_market(market: &Market) -> String {
    let mut text = format!(
        "Round {} · {} · {} teams lined up\n",
        market.current_round,
        market.status.label(),
        market.teams_lined_up
    );
    if let Some(closes_at) = market.closes_at {
        let _ = writeln!(text, "Market closes {}", closes_at.format("%d/%m %H:%M"));
    }
    text
}

fn render_clubs(clubs: &[Club]) -> String {
    clubs
        .iter()
        .map(|c| format!("{:>5}  {:<4} {}\n", c.id, c.abbreviation, c.name))
        .collect()
}

fn render_matches(round: u32, matches: &[Match]) -> String {
    let mut text = format!("Round {round}\n");
    for m in matches {
        let kickoff = m
            .kickoff
            .map(|k| k.format("%d/%m %H:%M").to_string())
            .unwrap_or_else(|| "--/-- --:--".into());
        let score = match (m.home_score, m.away_score) {
            (Some(h), Some(a)) => format!("{h} x {a}"),
            _ => "x".into(),
        };
        let state = if !m.valid {
            " (invalid)"
        } else if m.is_finished() {
            " (final)"
        } else {
            ""
        };
        let _ = writeln!(
            text,
            "{kickoff}  {:>18} {score:^7} {:<18} {}{state}",
            m.home.name, m.away.name, m.venue
        );
    }
    text
}

fn player_line(player: &Player, captain: bool) -> String {
    let club = player.club.as_ref().map_or("---", |c| c.abbreviation.as_str());
    let marker = if captain { " (C)" } else { "" };
    let played = if player.entered_play { "" } else { " *" };
    format!(
        "  {}  {:<20} {:<4} {:>7.2}{marker}{played}\n",
        player.position.abbreviation(),
        player.nickname,
        club,
        player.points
    )
}

fn render_roster(roster: &Roster) -> String {
    let info = &roster.info;
    let mut text = format!("{} ({}) · round {}\n", info.name, info.owner_name, roster.round);
    for player in &roster.starters {
        text.push_str(&player_line(player, player.is_captain));
    }
    if let Some(reserves) = roster.reserves.as_ref().filter(|r| !r.is_empty()) {
        text.push_str("  Reserves\n");
        for player in reserves {
            text.push_str(&player_line(player, false));
        }
    }
    let _ = writeln!(
        text,
        "  Points {:.2} · team value {:.2} · patrimony {:.2}",
        roster.points, roster.team_value, roster.patrimony
    );
    text
}

fn render_partials(round: u32, partials: &[TeamPartial]) -> String {
    let mut text = format!("Partial scores · round {round}\n");
    for partial in partials {
        match &partial.outcome {
            Ok(roster) => {
                let _ = writeln!(
                    text,
                    "{:<28} {:>8.2}  {}/{} played",
                    roster.info.name,
                    roster.points,
                    roster.played,
                    roster.starters.len()
                );
            }
            Err(message) => {
                let _ = writeln!(text, "team {:<23} error: {message}", partial.team_id);
            }
        }
    }
    text
}

fn render_live_feed(feed: &LiveFeed) -> String {
    let mut scorers: Vec<&Player> = feed.players().collect();
    scorers.sort_by(|a, b| b.points.total_cmp(&a.points).then(a.id.cmp(&b.id)));

    let mut text = format!("{} players scored\n", feed.len());
    for player in scorers.into_iter().take(TOP_SCORERS) {
        text.push_str(&player_line(player, false));
    }
    text
}

fn render_search(teams: &[TeamInfo], leagues: &[League]) -> String {
    let mut text = String::new();
    if teams.is_empty() && leagues.is_empty() {
        return "No results\n".into();
    }
    if !teams.is_empty() {
        text.push_str("Teams\n");
        for team in teams {
            let _ = writeln!(text, "  {:>10}  {} ({})", team.id, team.name, team.owner_name);
        }
    }
    if !leagues.is_empty() {
        text.push_str("Leagues\n");
        for league in leagues {
            let _ = writeln!(text, "  {:>10}  {} [{}]", league.id, league.name, league.slug);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartola_api::{MarketStatus, Position};

    fn forward(id: u64, points: f64) -> Player {
        Player {
            id,
            nickname: format!("Atacante {id}"),
            points,
            position: Position::Forward,
            entered_play: true,
            club: Some(Club { id: 262, abbreviation: "FLA".into(), ..Default::default() }),
            ..Default::default()
        }
    }

    #[test]
    fn market_line_shows_round_and_status() {
        let market = Market { current_round: 9, status: MarketStatus::Closed, ..Default::default() };
        let text = render(&NetworkResponse::MarketLoaded { market });
        assert!(text.starts_with("Round 9 · Mercado fechado"));
    }

    #[test]
    fn partials_keep_request_order_and_show_errors() {
        let mut roster = Roster { points: 16.0, played: 2, ..Default::default() };
        roster.info.name = "Os Boleiros".into();
        roster.starters = vec![forward(1, 8.0), forward(2, 8.0)];
        let partials = vec![
            TeamPartial { team_id: 30, outcome: Err("Not found: /time/id/30".into()) },
            TeamPartial { team_id: 77, outcome: Ok(roster) },
        ];

        let text = render(&NetworkResponse::PartialsLoaded { round: 9, partials });
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Partial scores · round 9");
        assert!(lines[1].starts_with("team 30") && lines[1].contains("Not found"));
        assert!(lines[2].starts_with("Os Boleiros") && lines[2].contains("16.00  2/2 played"));
    }

    #[test]
    fn roster_marks_captain_and_absent_players() {
        let mut captain = forward(1, 12.0);
        captain.is_captain = true;
        let mut absent = forward(2, 0.0);
        absent.entered_play = false;
        let roster = Roster { starters: vec![captain, absent], reserves: Some(vec![]), ..Default::default() };

        let text = render(&NetworkResponse::TeamLoaded { roster });

        assert!(text.contains("12.00 (C)"));
        assert!(text.contains("0.00 *"));
        assert!(!text.contains("Reserves"));
    }

    #[test]
    fn live_feed_lists_top_scorers_first() {
        let feed: LiveFeed = (1..=12).map(|id| forward(id, id as f64)).collect();
        let text = render(&NetworkResponse::LiveFeedLoaded { feed, saved_to: None });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "12 players scored");
        assert!(lines[1].contains("Atacante 12"));
        assert_eq!(lines.len(), 1 + TOP_SCORERS);
    }

    #[test]
    fn empty_search() {
        let text = render(&NetworkResponse::SearchResults { teams: vec![], leagues: vec![] });
        assert_eq!(text, "No results\n");
    }
}
