use crate::cache::{DEFAULT_TTL, ResponseCache};
use crate::scoring::{LiveFeed, compute_team_score};
use crate::wire::{
    AuthResponse, FriendsResponse, LeagueResponse, LiveFeedResponse, MarketPlayersResponse,
    MarketResponse, MatchesResponse, RoundHighlightResponse, SelectionResponse, TeamResponse,
    WireClubs, WireHighlight, WireLeague, WireMatch, WirePlayer, WirePointsHistory, WireSponsor,
    WireTeamInfo,
};
use crate::{
    Club, League, LeagueSponsor, Market, MarketHighlight, MarketStatus, Match, Player,
    PlayerStatus, PointsHistory, Position, RankingOrder, Roster, RoundHighlight, SelectionPick,
    TeamInfo,
};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, error, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const CARTOLA_API: &str = "https://api.cartolafc.globo.com";
const GLOBO_AUTH: &str = "https://login.globo.com/api/authentication";
const AUTH_SERVICE_ID: u32 = 4728;
/// Placeholder club the provider assigns to players without one.
const FREE_AGENT_CLUB_ID: i64 = 1;
const KICKOFF_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cartola FC API client.
#[derive(Clone)]
pub struct CartolaApi {
    client: Client,
    base_url: String,
    auth_url: String,
    timeout: Duration,
    attempts: u32,
    bearer_token: Option<String>,
    glb_id: Option<String>,
    cache: Option<Arc<dyn ResponseCache>>,
    cache_ttl: Duration,
}

impl Default for CartolaApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("cartola/0.1 (partial score client)")
                .build()
                .unwrap_or_default(),
            base_url: CARTOLA_API.to_owned(),
            auth_url: GLOBO_AUTH.to_owned(),
            timeout: Duration::from_secs(10),
            attempts: 1,
            bearer_token: None,
            glb_id: None,
            cache: None,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

impl fmt::Debug for CartolaApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartolaApi")
            .field("base_url", &self.base_url)
            .field("attempts", &self.attempts)
            .field("authenticated", &self.bearer_token.is_some())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(String, String),
    Parsing(serde_json::Error, String),
    /// The provider answered with something that is not JSON; retry exhausted.
    Overload(String),
    GameOver,
    Unauthenticated,
    Auth(String),
    /// Partial scores are only published while the market is closed.
    MarketNotClosed,
    InvalidInput(String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(msg, url) => write!(f, "API error for {url}: {msg}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Overload(url) => write!(f, "Cartola is overloaded, gave up on {url}"),
            ApiError::GameOver => write!(f, "The season is over, no more data is published"),
            ApiError::Unauthenticated => write!(f, "This request requires authentication"),
            ApiError::Auth(msg) => write!(f, "Authentication failed: {msg}"),
            ApiError::MarketNotClosed => {
                write!(f, "Partial scores are only available while the market is closed")
            }
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl CartolaApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// How many times a request is tried while the provider is overloaded.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_glb_id(mut self, glb_id: impl Into<String>) -> Self {
        self.glb_id = Some(glb_id.into());
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    pub fn glb_id(&self) -> Option<&str> {
        self.glb_id.as_deref()
    }

    /// Log in against the Globo identity provider. Empty credentials are a
    /// no-op; supplying only one of them is an error.
    pub async fn authenticate(&mut self, email: &str, password: &str) -> ApiResult<()> {
        match (email.is_empty(), password.is_empty()) {
            (true, true) => return Ok(()),
            (false, false) => {}
            _ => return Err(ApiError::Auth("missing e-mail or password".into())),
        }

        let payload = json!({
            "payload": {
                "email": email,
                "password": password,
                "serviceId": AUTH_SERVICE_ID,
            }
        });
        let response = self
            .client
            .post(&self.auth_url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, self.auth_url.clone()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, self.auth_url.clone()))?;
        let raw: AuthResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Parsing(e, self.auth_url.clone()))?;

        if status != StatusCode::OK {
            return Err(ApiError::Auth(
                raw.user_message
                    .unwrap_or_else(|| format!("identity provider answered {status}")),
            ));
        }

        let token = raw
            .bearer_token
            .ok_or_else(|| ApiError::Auth("no bearer token in response".into()))?;
        debug!("authenticated against the Globo identity provider");
        self.bearer_token = Some(token);
        self.glb_id = raw.glb_id;
        Ok(())
    }

    /// Current round and market state.
    pub async fn fetch_market(&self) -> ApiResult<Market> {
        let url = format!("{}/mercado/status", self.base_url);
        let raw: MarketResponse = self.get(&url, false).await?;
        map_market(raw)
    }

    pub async fn fetch_clubs(&self) -> ApiResult<HashMap<u32, Club>> {
        let url = format!("{}/clubes", self.base_url);
        let raw: WireClubs = self.get(&url, false).await?;
        Ok(map_clubs(&raw))
    }

    pub async fn fetch_market_players(&self) -> ApiResult<Vec<Player>> {
        let url = format!("{}/atletas/mercado", self.base_url);
        let raw: MarketPlayersResponse = self.get(&url, false).await?;
        let clubs = map_clubs(&raw.clubes);
        raw.atletas
            .iter()
            .map(|p| map_player(p, &clubs, None, None))
            .collect()
    }

    /// Live scores for the round. With the market closed this is the round in
    /// progress; with the market open only a different (past) round may be
    /// requested, `None` meaning the last one scored.
    pub async fn fetch_live_feed(&self, round: Option<u32>) -> ApiResult<LiveFeed> {
        let raw = self.fetch_live_feed_raw(round).await?;
        let url = format!("{}/atletas/pontuados", self.base_url);
        let raw: LiveFeedResponse =
            serde_json::from_value(raw).map_err(|e| ApiError::Parsing(e, url))?;
        map_live_feed(raw)
    }

    /// The unparsed live feed payload, suitable for saving as a snapshot and
    /// loading back with [`LiveFeed::from_json`].
    pub async fn fetch_live_feed_raw(&self, round: Option<u32>) -> ApiResult<Value> {
        let market = self.fetch_market().await?;
        let url = self.live_feed_url(&market, round)?;
        self.request(&url, false).await
    }

    fn live_feed_url(&self, market: &Market, round: Option<u32>) -> ApiResult<String> {
        let available = match market.status {
            MarketStatus::Closed => true,
            MarketStatus::Open => round.unwrap_or(0) != market.current_round,
            _ => false,
        };
        if !available {
            return Err(ApiError::MarketNotClosed);
        }
        Ok(match round {
            Some(r) if r > 0 => format!("{}/atletas/pontuados/{r}", self.base_url),
            _ => format!("{}/atletas/pontuados", self.base_url),
        })
    }

    /// Matches of a round, earliest kickoff first.
    pub async fn fetch_matches(&self, round: u32) -> ApiResult<Vec<Match>> {
        let url = format!("{}/partidas/{round}", self.base_url);
        let raw: MatchesResponse = self.get(&url, false).await?;
        let clubs = map_clubs(&raw.clubes);
        let round = raw.rodada.unwrap_or(round);
        let mut matches: Vec<Match> = raw
            .partidas
            .iter()
            .map(|m| map_match(m, &clubs, round))
            .collect();
        matches.sort_by_key(|m| m.kickoff);
        Ok(matches)
    }

    pub async fn fetch_team(&self, team_id: u64, round: Option<u32>) -> ApiResult<Roster> {
        let url = match round {
            Some(r) if r > 0 => format!("{}/time/id/{team_id}/{r}", self.base_url),
            _ => format!("{}/time/id/{team_id}", self.base_url),
        };
        let raw: TeamResponse = self.get(&url, false).await?;
        self.roster_from(raw).await
    }

    /// Fetch a team and score it against the live feed of the round in
    /// progress.
    pub async fn fetch_team_partial(&self, team_id: u64) -> ApiResult<Roster> {
        let market = self.fetch_market().await?;
        if market.status != MarketStatus::Closed {
            return Err(ApiError::MarketNotClosed);
        }
        let url = self.live_feed_url(&market, None)?;
        let raw: LiveFeedResponse = self.get(&url, false).await?;
        let feed = map_live_feed(raw)?;
        let matches = self.fetch_matches(market.current_round).await?;
        let mut roster = self.fetch_team(team_id, None).await?;
        compute_team_score(&mut roster, &feed, &matches)?;
        Ok(roster)
    }

    pub async fn search_teams(&self, query: &str) -> ApiResult<Vec<TeamInfo>> {
        let url = self.url_with_params("/times", &[("q", query)])?;
        let raw: Vec<WireTeamInfo> = self.get(&url, false).await?;
        Ok(raw.iter().map(|t| map_team_info(t, None)).collect())
    }

    pub async fn search_leagues(&self, query: &str) -> ApiResult<Vec<League>> {
        let url = self.url_with_params("/ligas", &[("q", query)])?;
        let raw: Vec<WireLeague> = self.get(&url, false).await?;
        Ok(raw.iter().map(|l| map_league(l, None, None)).collect())
    }

    pub async fn fetch_sponsors(&self) -> ApiResult<HashMap<u64, LeagueSponsor>> {
        let url = format!("{}/patrocinadores", self.base_url);
        let raw: HashMap<String, WireSponsor> = self.get(&url, false).await?;
        Ok(raw
            .into_values()
            .map(|s| (s.liga_id, LeagueSponsor { id: s.liga_id, name: s.nome, url: s.url_link }))
            .collect())
    }

    /// Best team and averages of the last round; only published while the
    /// market is open.
    pub async fn fetch_round_highlights(&self) -> ApiResult<RoundHighlight> {
        let market = self.fetch_market().await?;
        if market.status != MarketStatus::Open {
            return Err(ApiError::Other(
                "round highlights are only available while the market is open".into(),
            ));
        }
        let url = format!("{}/pos-rodada/destaques", self.base_url);
        let raw: RoundHighlightResponse = self.get(&url, false).await?;
        Ok(RoundHighlight {
            average_price: raw.media_cartoletas,
            average_points: raw.media_pontos,
            best_team: map_team_info(&raw.mito_rodada, None),
        })
    }

    pub async fn fetch_market_highlights(&self) -> ApiResult<Vec<MarketHighlight>> {
        let url = format!("{}/mercado/destaques", self.base_url);
        let raw: Vec<WireHighlight> = self.get(&url, false).await?;
        Ok(raw
            .into_iter()
            .map(|h| MarketHighlight {
                position: h.posicao,
                club_name: h.clube_nome,
                club_shield: h.escudo_clube,
                selections: h.escalacoes,
                player: h.atleta,
            })
            .collect())
    }

    /// Most-picked captains, most selections first.
    pub async fn fetch_captain_picks(&self) -> ApiResult<Vec<SelectionPick>> {
        let raw = self.fetch_selection().await?;
        Ok(map_selection(raw.capitaes))
    }

    /// Most-picked reserves, most selections first.
    pub async fn fetch_reserve_picks(&self) -> ApiResult<Vec<SelectionPick>> {
        let raw = self.fetch_selection().await?;
        Ok(map_selection(raw.reservas))
    }

    async fn fetch_selection(&self) -> ApiResult<SelectionResponse> {
        let url = format!("{}/mercado/selecao", self.base_url);
        self.get(&url, false).await
    }

    /// A league's standings page (20 teams per page). `slug` wins over `name`.
    pub async fn fetch_league(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        page: u32,
        order: RankingOrder,
    ) -> ApiResult<League> {
        let slug = resolve_slug(name, slug)?;
        self.fetch_standings(&format!("/auth/liga/{slug}"), page, order).await
    }

    /// A head-to-head ("pontos corridos") league's standings page.
    pub async fn fetch_points_league(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        page: u32,
        order: RankingOrder,
    ) -> ApiResult<League> {
        let slug = resolve_slug(name, slug)?;
        let path = format!("/auth/competicoes/pontoscorridos/slug/{slug}");
        self.fetch_standings(&path, page, order).await
    }

    async fn fetch_standings(&self, path: &str, page: u32, order: RankingOrder) -> ApiResult<League> {
        let page = page.max(1).to_string();
        let url = self.url_with_params(path, &[("page", page.as_str()), ("orderBy", order.as_str())])?;
        let raw: LeagueResponse = self.get(&url, true).await?;
        Ok(map_league(&raw.liga, raw.times.as_deref(), Some(order)))
    }

    /// The logged-in user's team.
    pub async fn fetch_my_team(&self) -> ApiResult<Roster> {
        let url = format!("{}/auth/time", self.base_url);
        let raw: TeamResponse = self.get(&url, true).await?;
        self.roster_from(raw).await
    }

    pub async fn fetch_friends(&self) -> ApiResult<Vec<TeamInfo>> {
        let url = format!("{}/auth/amigos", self.base_url);
        let raw: FriendsResponse = self.get(&url, true).await?;
        Ok(raw.times.iter().map(|t| map_team_info(t, None)).collect())
    }

    pub async fn fetch_player_history(&self, player_id: u64) -> ApiResult<Vec<PointsHistory>> {
        let url = format!("{}/auth/mercado/atleta/{player_id}/pontuacao", self.base_url);
        let raw: Vec<WirePointsHistory> = self.get(&url, true).await?;
        Ok(raw
            .into_iter()
            .map(|h| PointsHistory {
                player_id: h.atleta_id,
                round: h.rodada_id,
                points: h.pontos,
                price: h.preco,
                variation: h.variacao,
                average: h.media,
            })
            .collect())
    }

    async fn roster_from(&self, raw: TeamResponse) -> ApiResult<Roster> {
        let clubs = match &raw.clubes {
            Some(clubs) => map_clubs(clubs),
            None => {
                debug!("team payload without clubs, fetching them");
                self.fetch_clubs().await?
            }
        };
        map_roster(raw, &clubs)
    }

    fn url_with_params(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<String> {
        let base = format!("{}{path}", self.base_url);
        Url::parse_with_params(&base, params)
            .map(String::from)
            .map_err(|e| ApiError::Other(format!("invalid url {base}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, authenticated: bool) -> ApiResult<T> {
        let value = self.request(url, authenticated).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }

    /// Cache lookup, then up to `attempts` tries while the provider is
    /// overloaded. Successful bodies are cached under the request url.
    async fn request(&self, url: &str, authenticated: bool) -> ApiResult<Value> {
        if authenticated && self.bearer_token.is_none() {
            return Err(ApiError::Unauthenticated);
        }

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(url)) {
            match serde_json::from_str(&cached) {
                Ok(value) => {
                    debug!("cache hit for {url}");
                    return Ok(value);
                }
                Err(e) => warn!("discarding unreadable cache entry for {url}: {e}"),
            }
        }

        let mut remaining = self.attempts;
        loop {
            match self.fetch_once(url).await {
                Ok(value) => {
                    if let Some(cache) = &self.cache {
                        cache.set(url, value.to_string(), self.cache_ttl);
                    }
                    return Ok(value);
                }
                Err(ApiError::Overload(_)) if remaining > 1 => {
                    remaining -= 1;
                    warn!("Cartola overloaded, retrying {url} ({remaining} attempts left)");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> ApiResult<Value> {
        debug!("GET {url}");
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(token) = &self.bearer_token {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .header(AUTHORIZATION, authorization_value(token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ApiError::Auth(format!("session rejected for {url}")));
            }
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound(url.to_owned())),
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        let value = check_body(&body, url)?;
        if !status.is_success() {
            return Err(ApiError::Api(format!("HTTP {status}"), url.to_owned()));
        }
        Ok(value)
    }
}

/// Validate a provider body: anything that is not JSON is the overload page,
/// `game_over` ends the season, and a non-empty `mensagem` is an error.
fn check_body(body: &str, url: &str) -> ApiResult<Value> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| ApiError::Overload(url.to_owned()))?;

    if value.get("game_over").and_then(Value::as_bool) == Some(true) {
        return Err(ApiError::GameOver);
    }
    if let Some(message) = value
        .get("mensagem")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
    {
        error!("Cartola error for {url}: {message}");
        return Err(ApiError::Api(message.to_owned(), url.to_owned()));
    }
    Ok(value)
}

fn authorization_value(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_owned()
    } else {
        format!("Bearer {token}")
    }
}

fn resolve_slug(name: Option<&str>, slug: Option<&str>) -> ApiResult<String> {
    match (slug.filter(|s| !s.is_empty()), name.filter(|n| !n.is_empty())) {
        (Some(slug), _) => Ok(slug.to_owned()),
        (None, Some(name)) => Ok(league_slug(name)),
        (None, None) => Err(ApiError::Other("league name or slug required".into())),
    }
}

/// Convert a league or team name into the provider's url slug:
/// "Liga dos Campeões 2024" → "liga-dos-campeoes-2024".
pub fn league_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase).map(strip_accent) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_owned()
}

fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Mapping: Cartola wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_clubs(raw: &WireClubs) -> HashMap<u32, Club> {
    raw.values().map(|c| (c.id, map_club(c))).collect()
}

fn map_club(c: &crate::wire::WireClub) -> Club {
    Club {
        id: c.id,
        name: c.nome.clone(),
        abbreviation: c.abreviacao.clone(),
        shield: c.escudos.get("60x60").cloned(),
    }
}

fn map_market(raw: MarketResponse) -> ApiResult<Market> {
    let status = MarketStatus::from_id(raw.status_mercado)
        .ok_or_else(|| ApiError::Other(format!("unknown market status {}", raw.status_mercado)))?;
    let closes_at = raw.fechamento.and_then(|f| {
        NaiveDate::from_ymd_opt(f.ano, f.mes, f.dia).and_then(|d| d.and_hms_opt(f.hora, f.minuto, 0))
    });
    Ok(Market {
        current_round: raw.rodada_atual,
        status,
        teams_lined_up: raw.times_escalados,
        closes_at,
    })
}

/// `id` overrides the payload's own id (the live feed keys players by id).
fn map_player(
    raw: &WirePlayer,
    clubs: &HashMap<u32, Club>,
    id: Option<u64>,
    captain_id: Option<u64>,
) -> ApiResult<Player> {
    let id = id
        .or(raw.atleta_id)
        .ok_or_else(|| ApiError::Other(format!("player {} without an id", raw.apelido)))?;
    let position = Position::from_id(raw.posicao_id).ok_or_else(|| {
        ApiError::Other(format!("unknown position id {} for player {id}", raw.posicao_id))
    })?;
    let club = if raw.clube_id == FREE_AGENT_CLUB_ID {
        None
    } else {
        u32::try_from(raw.clube_id)
            .ok()
            .and_then(|cid| clubs.get(&cid))
            .cloned()
    };

    Ok(Player {
        id,
        nickname: raw.apelido.clone(),
        photo: raw.foto.clone().unwrap_or_default(),
        points: raw.pontos_num.or(raw.pontuacao).unwrap_or_default(),
        scout: raw.scout.clone().unwrap_or_default(),
        position,
        games: raw.jogos_num,
        average: raw.media_num,
        entered_play: raw.entrou_em_campo.unwrap_or(false),
        club,
        min_to_appreciate: raw.minimo_para_valorizar.unwrap_or(0.0),
        status: raw.status_id.and_then(PlayerStatus::from_id),
        is_captain: captain_id == Some(id),
    })
}

/// Players without a real club (`clube_id <= 0`) are left out of the feed.
pub(crate) fn map_live_feed(raw: LiveFeedResponse) -> ApiResult<LiveFeed> {
    let clubs = map_clubs(&raw.clubes);
    let mut players = HashMap::with_capacity(raw.atletas.len());
    for (key, player) in &raw.atletas {
        if player.clube_id <= 0 {
            continue;
        }
        let id = key
            .parse::<u64>()
            .map_err(|_| ApiError::InvalidInput(format!("live feed key {key:?} is not a player id")))?;
        players.insert(id, map_player(player, &clubs, Some(id), None)?);
    }
    Ok(LiveFeed::new(players))
}

fn map_match(m: &WireMatch, clubs: &HashMap<u32, Club>, round: u32) -> Match {
    let club = |id: u32| clubs.get(&id).cloned().unwrap_or(Club { id, ..Default::default() });
    Match {
        kickoff: m
            .partida_data
            .as_deref()
            .and_then(|d| NaiveDateTime::parse_from_str(d, KICKOFF_FORMAT).ok()),
        venue: m.local.clone(),
        valid: m.valida,
        home: club(m.clube_casa_id),
        away: club(m.clube_visitante_id),
        home_score: m.placar_oficial_mandante,
        away_score: m.placar_oficial_visitante,
        broadcast_label: m
            .transmissao
            .as_ref()
            .and_then(|t| t.label.clone())
            .unwrap_or_default(),
        broadcast_status: m.status_transmissao_tr.clone().unwrap_or_default(),
        home_table_position: m.clube_casa_posicao,
        away_table_position: m.clube_visitante_posicao,
        round: Some(round),
    }
}

fn map_roster(mut raw: TeamResponse, clubs: &HashMap<u32, Club>) -> ApiResult<Roster> {
    let captain = raw.capitao_id;
    raw.atletas.sort_by_key(|p| p.posicao_id);
    let starters = raw
        .atletas
        .iter()
        .map(|p| map_player(p, clubs, None, captain))
        .collect::<ApiResult<Vec<_>>>()?;

    let reserves = match raw.reservas.as_mut() {
        Some(reserves) => {
            reserves.sort_by_key(|p| p.posicao_id);
            Some(
                reserves
                    .iter()
                    .map(|p| map_player(p, clubs, None, captain))
                    .collect::<ApiResult<Vec<_>>>()?,
            )
        }
        None => None,
    };

    Ok(Roster {
        patrimony: raw.patrimonio,
        team_value: raw.valor_time,
        last_round_points: raw.pontos.unwrap_or_default(),
        starters,
        reserves,
        info: map_team_info(&raw.time, None),
        points: raw.pontos_campeonato.unwrap_or_default(),
        played: 0,
        round: raw.rodada_atual,
        captain_id: captain,
    })
}

fn map_team_info(t: &WireTeamInfo, ranking: Option<RankingOrder>) -> TeamInfo {
    let ranked = ranking.and_then(|r| {
        let points = t.pontos.as_ref()?;
        points.contains_key(r.as_str()).then_some((r, points))
    });
    TeamInfo {
        id: t.time_id,
        name: t.nome.clone(),
        owner_name: t.nome_cartola.clone(),
        slug: t.slug.clone(),
        subscriber: t.assinante,
        points: ranked.and_then(|(r, p)| p.get(r.as_str()).copied().flatten()),
        round_points: ranked.and_then(|(_, p)| p.get("rodada").copied().flatten()),
        shield: t.url_escudo_svg.clone(),
    }
}

fn map_league(l: &WireLeague, teams: Option<&[WireTeamInfo]>, ranking: Option<RankingOrder>) -> League {
    League {
        id: l.liga_id,
        name: l.nome.clone(),
        slug: l.slug.clone(),
        description: l.descricao.clone().unwrap_or_default(),
        teams: teams.map(|ts| ts.iter().map(|t| map_team_info(t, ranking)).collect()),
        pennant: l.url_flamula_png.clone().unwrap_or_default(),
    }
}

fn map_selection(raw: Vec<WireHighlight>) -> Vec<SelectionPick> {
    let mut picks: Vec<SelectionPick> = raw
        .into_iter()
        .map(|h| SelectionPick {
            position: h.posicao,
            club_id: h.clube_id,
            club_shield: h.escudo_clube,
            selections: h.escalacoes,
            player: h.atleta,
        })
        .collect();
    picks.sort_by(|a, b| b.selections.cmp(&a.selections));
    picks
}
