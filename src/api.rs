// ========================================
// リモートAPI呼び出し
// ========================================

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::shelter::geojson::ShelterCollection;
use crate::shelter::master::{MasterData, is_valid_city_code};
use crate::tutorial::state::{TutorialConfig, TutorialPage};

/// jp-shelter-api 緊急避難所エンドポイント
const SHELTER_API_BASE: &str = "https://motohasystem.github.io/jp-shelter-api/api/v0/emergency";

/// 都道府県・市区町村マスタ
const MASTER_API_URL: &str = "https://motohasystem.github.io/jp-shelter-api/api/v0/admin/master.json";

/// 逆ジオコーディング(緯度経度 -> 都道府県名・市区町村名)
const REVERSE_GEOCODE_URL: &str = "https://geoapi.heartrails.com/api/json?method=searchByGeoLocation";

/// リモート呼び出しの失敗区分。
/// すべて呼び出し元の境界で捕捉し、ユーザー向けメッセージに変換する
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// fetch自体が失敗した
    Network(String),
    /// 非OKステータスが返った
    Status(u16),
    /// 結果が0件だった
    Empty,
    /// 団体コードが6桁の数字でない
    InvalidCode(String),
}

impl ApiError {
    /// ステータス欄にそのまま出せる日本語メッセージ
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(reason) => format!("エラー: {}", reason),
            ApiError::Status(status) => {
                format!("データの取得に失敗しました (ステータス: {})", status)
            }
            ApiError::Empty => "該当するデータが見つかりませんでした".to_string(),
            ApiError::InvalidCode(_) => "団体コードは6桁の数字で入力してください".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(reason) => write!(f, "network error: {}", reason),
            ApiError::Status(status) => write!(f, "unexpected status: {}", status),
            ApiError::Empty => write!(f, "empty result"),
            ApiError::InvalidCode(code) => write!(f, "invalid city code: {}", code),
        }
    }
}

/// JSONを取得してデコードする
pub(crate) async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ApiError::Status(response.status().as_u16()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))
}

/// テキスト(HTML断片など)を取得する
pub(crate) async fn fetch_text(url: &str) -> Result<String, ApiError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ApiError::Status(response.status().as_u16()));
    }
    response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))
}

/// 団体コードで避難所データを取得する。0件はEmptyとして返す
pub async fn fetch_shelters(city_code: &str) -> Result<ShelterCollection, ApiError> {
    if !is_valid_city_code(city_code) {
        return Err(ApiError::InvalidCode(city_code.to_string()));
    }
    let url = format!("{}/{}.json", SHELTER_API_BASE, city_code);
    log::info!("避難所データを取得します: {}", url);
    let collection: ShelterCollection = fetch_json(&url).await?;
    if collection.features.is_empty() {
        return Err(ApiError::Empty);
    }
    Ok(collection)
}

/// 都道府県・市区町村マスタを取得する
pub async fn fetch_master() -> Result<MasterData, ApiError> {
    log::info!("マスタデータを取得します: {}", MASTER_API_URL);
    fetch_json(MASTER_API_URL).await
}

/// 逆ジオコーディング結果のうち利用する2項目
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Address {
    pub prefecture: String,
    pub city: String,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    response: GeoLocations,
}

#[derive(Debug, Deserialize)]
struct GeoLocations {
    #[serde(default)]
    location: Vec<Address>,
}

/// 緯度経度から住所(都道府県名・市区町村名)を引く
pub async fn reverse_geocode(lat: f64, lng: f64) -> Result<Address, ApiError> {
    let url = format!("{}&y={}&x={}", REVERSE_GEOCODE_URL, lat, lng);
    log::info!("逆ジオコーディング: ({}, {})", lat, lng);
    let geo: GeoResponse = fetch_json(&url).await?;
    geo.response.location.into_iter().next().ok_or(ApiError::Empty)
}

/// チュートリアル設定 { "pages": [{ "url", "highlightId"? }] } を取得する
pub async fn fetch_tutorial_config(config_url: &str) -> Result<Vec<TutorialPage>, ApiError> {
    let config: TutorialConfig = fetch_json(config_url).await?;
    Ok(config.pages)
}
