mod draw;
mod state;

use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::state::network::NetworkWorker;
use env_logger::Env;
use log::debug;
use std::io;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, PartialEq)]
enum CliAction {
    Help,
    Version,
    Run(NetworkRequest),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let request = match parse_args(std::env::args().skip(1)) {
        Ok(CliAction::Run(request)) => request,
        Ok(CliAction::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliAction::Version) => {
            println!("cartola {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    let settings = AppSettings::load()?;
    let default_level = settings.log_level.unwrap_or(log::LevelFilter::Warn).to_string();
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let client = settings.build_client().await?;

    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(8);
    let (network_resp_tx, mut network_resp_rx) = mpsc::channel::<NetworkResponse>(8);

    let network_worker = NetworkWorker::new(client, settings.concurrency, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    debug!("sending {request:?}");
    network_req_tx.send(request).await?;
    drop(network_req_tx);

    let mut stdout = io::stdout();
    while let Some(response) = network_resp_rx.recv().await {
        if let NetworkResponse::Error { message } = response {
            anyhow::bail!(message);
        }
        draw::draw(&mut stdout, &response)?;
    }

    network_task.await?;
    Ok(())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliAction, String> {
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Err("Missing command".into());
    };
    let rest: Vec<String> = args.collect();

    let request = match command.as_str() {
        "-h" | "--help" => return Ok(CliAction::Help),
        "-V" | "--version" => return Ok(CliAction::Version),
        "market" => {
            no_more_args(&rest)?;
            NetworkRequest::LoadMarket
        }
        "clubs" => {
            no_more_args(&rest)?;
            NetworkRequest::LoadClubs
        }
        "matches" => {
            let round = optional_number(&rest, 0, "round")?;
            no_more_args(rest.get(1..).unwrap_or_default())?;
            NetworkRequest::LoadMatches { round }
        }
        "team" => {
            let team_id = optional_number(&rest, 0, "team id")?
                .ok_or_else(|| "team requires a TEAM_ID".to_string())?;
            let round = optional_number(&rest, 1, "round")?;
            no_more_args(rest.get(2..).unwrap_or_default())?;
            NetworkRequest::LoadTeam { team_id, round }
        }
        "partial" => {
            let mut team_ids = Vec::new();
            let mut feed_path = None;
            let mut rest = rest.into_iter();
            while let Some(arg) = rest.next() {
                if arg == "--feed" {
                    let path = rest.next().ok_or("--feed requires a PATH")?;
                    feed_path = Some(PathBuf::from(path));
                } else {
                    team_ids.push(parse_number(&arg, "team id")?);
                }
            }
            if team_ids.is_empty() {
                return Err("partial requires at least one TEAM_ID".into());
            }
            NetworkRequest::LoadPartials { team_ids, feed_path }
        }
        "live" => match rest.as_slice() {
            [] => NetworkRequest::LoadLiveFeed { save_to: None },
            [flag, path] if flag == "--save" => {
                NetworkRequest::LoadLiveFeed { save_to: Some(PathBuf::from(path)) }
            }
            _ => return Err("usage: cartola live [--save PATH]".into()),
        },
        "search" => {
            let term = rest.join(" ");
            if term.trim().is_empty() {
                return Err("search requires a TERM".into());
            }
            NetworkRequest::Search { term }
        }
        other => return Err(format!("Unknown command: {other}")),
    };
    Ok(CliAction::Run(request))
}

fn parse_number<T: std::str::FromStr>(arg: &str, what: &str) -> Result<T, String> {
    arg.parse().map_err(|_| format!("Invalid {what}: {arg}"))
}

fn optional_number<T: std::str::FromStr>(args: &[String], index: usize, what: &str) -> Result<Option<T>, String> {
    args.get(index).map(|arg| parse_number(arg, what)).transpose()
}

fn no_more_args(args: &[String]) -> Result<(), String> {
    match args.first() {
        Some(arg) => Err(format!("Unexpected argument: {arg}")),
        None => Ok(()),
    }
}

fn usage_text() -> &'static str {
    "cartola - Cartola FC client with live partial scores

Usage:
  cartola market                       Round and market status
  cartola clubs                        Clubs of the championship
  cartola matches [ROUND]              Matches of a round (default: current)
  cartola team TEAM_ID [ROUND]         A team's lineup
  cartola partial TEAM_ID... [--feed PATH]
                                       Live partial scores for one or more teams
  cartola live [--save PATH]           Live feed top scorers, optionally saved
  cartola search TERM                  Search teams and leagues
  cartola --help
  cartola --version

Environment:
  CARTOLA_BEARER_TOKEN   Bearer token for authenticated endpoints
  CARTOLA_GLB_ID         Globo session id
  CARTOLA_EMAIL          Account e-mail (requires CARTOLA_PASSWORD)
  CARTOLA_PASSWORD       Account password (requires CARTOLA_EMAIL)
  CARTOLA_ATTEMPTS       Tries per request while Cartola is overloaded (default 1)
  CARTOLA_CACHE_TTL      Cache responses for this many seconds (default off)
  CARTOLA_API_URL        API base url (default https://api.cartolafc.globo.com)
  CARTOLA_LOG            Log level (default warn)
  CARTOLA_CONCURRENCY    Teams fetched at once by `partial` (default 4)"
}
