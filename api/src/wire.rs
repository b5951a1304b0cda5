//! Cartola API raw wire types: serde shapes for deserializing provider responses.
//! These map to our clean domain types via the mapping functions in client.rs.
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Clubs and players
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireClub {
    pub id: u32,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub abreviacao: String,
    #[serde(default)]
    pub escudos: HashMap<String, String>, // "60x60", "45x45", "30x30"
}

/// Clubs keyed by stringified id, as embedded in most payloads.
pub type WireClubs = HashMap<String, WireClub>;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WirePlayer {
    pub atleta_id: Option<u64>, // absent inside the live feed, where the map key is the id
    #[serde(default)]
    pub apelido: String,
    pub foto: Option<String>,
    pub pontos_num: Option<f64>,
    pub pontuacao: Option<f64>, // live feed name for the points field
    pub scout: Option<BTreeMap<String, i32>>,
    pub posicao_id: u8,
    #[serde(default)]
    pub clube_id: i64,
    pub jogos_num: Option<u32>,
    pub media_num: Option<f64>,
    pub entrou_em_campo: Option<bool>,
    pub minimo_para_valorizar: Option<f64>,
    pub status_id: Option<u8>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MarketPlayersResponse {
    #[serde(default)]
    pub atletas: Vec<WirePlayer>,
    #[serde(default)]
    pub clubes: WireClubs,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LiveFeedResponse {
    #[serde(default)]
    pub atletas: HashMap<String, WirePlayer>,
    #[serde(default)]
    pub clubes: WireClubs,
    pub rodada: Option<u32>,
}

// ---------------------------------------------------------------------------
// Market and matches
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MarketResponse {
    pub rodada_atual: u32,
    pub status_mercado: u8,
    #[serde(default)]
    pub times_escalados: u64,
    pub fechamento: Option<WireClosing>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireClosing {
    pub ano: i32,
    pub mes: u32,
    pub dia: u32,
    pub hora: u32,
    pub minuto: u32,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchesResponse {
    #[serde(default)]
    pub partidas: Vec<WireMatch>,
    #[serde(default)]
    pub clubes: WireClubs,
    pub rodada: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireMatch {
    pub partida_data: Option<String>, // "2024-05-12 16:00:00"
    #[serde(default)]
    pub local: String,
    /// Required: an invalidated match counts as finished.
    pub valida: bool,
    pub clube_casa_id: u32,
    pub clube_visitante_id: u32,
    pub placar_oficial_mandante: Option<u32>,
    pub placar_oficial_visitante: Option<u32>,
    pub transmissao: Option<WireBroadcast>,
    pub status_transmissao_tr: Option<String>,
    pub clube_casa_posicao: Option<u32>,
    pub clube_visitante_posicao: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireBroadcast {
    pub label: Option<String>,
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Teams and leagues
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamResponse {
    #[serde(default)]
    pub atletas: Vec<WirePlayer>,
    /// Absent before the team's first lineup of the season.
    pub reservas: Option<Vec<WirePlayer>>,
    /// Some team payloads omit the clubs; the client then fetches `/clubes`.
    pub clubes: Option<WireClubs>,
    pub capitao_id: Option<u64>,
    #[serde(default)]
    pub patrimonio: f64,
    #[serde(default)]
    pub valor_time: f64,
    pub pontos: Option<f64>,
    pub pontos_campeonato: Option<f64>,
    #[serde(default)]
    pub rodada_atual: u32,
    #[serde(default)]
    pub time: WireTeamInfo,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeamInfo {
    #[serde(default)]
    pub time_id: u64,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub nome_cartola: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub assinante: bool,
    /// Ranking name → points. Only present in league listings.
    pub pontos: Option<HashMap<String, Option<f64>>>,
    #[serde(default)]
    pub url_escudo_svg: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeagueResponse {
    /// League search results are bare `WireLeague`s; the authenticated
    /// endpoints nest it alongside the member teams.
    #[serde(default)]
    pub liga: WireLeague,
    pub times: Option<Vec<WireTeamInfo>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireLeague {
    #[serde(default)]
    pub liga_id: u64,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub slug: String,
    pub descricao: Option<String>,
    pub url_flamula_png: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FriendsResponse {
    #[serde(default)]
    pub times: Vec<WireTeamInfo>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireSponsor {
    pub liga_id: u64,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub url_link: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WirePointsHistory {
    pub atleta_id: u64,
    pub rodada_id: u32,
    pub pontos: Option<f64>,
    #[serde(default)]
    pub preco: f64,
    #[serde(default)]
    pub variacao: f64,
    #[serde(default)]
    pub media: f64,
}

// ---------------------------------------------------------------------------
// Highlights
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RoundHighlightResponse {
    #[serde(default)]
    pub media_cartoletas: f64,
    #[serde(default)]
    pub media_pontos: f64,
    #[serde(default)]
    pub mito_rodada: WireTeamInfo,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireHighlight {
    #[serde(default)]
    pub posicao: String,
    #[serde(default)]
    pub clube_nome: String,
    #[serde(default)]
    pub clube_id: u32,
    #[serde(default)]
    pub escudo_clube: String,
    #[serde(default)]
    pub escalacoes: u64,
    #[serde(rename = "Atleta", default)]
    pub atleta: HashMap<String, Value>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SelectionResponse {
    #[serde(default)]
    pub capitaes: Vec<WireHighlight>,
    #[serde(default)]
    pub reservas: Vec<WireHighlight>,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AuthResponse {
    #[serde(rename = "glbId")]
    pub glb_id: Option<String>,
    #[serde(rename = "bearer_Token")]
    pub bearer_token: Option<String>,
    #[serde(rename = "userMessage")]
    pub user_message: Option<String>,
}
