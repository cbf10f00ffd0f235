//! アプリケーション全体で共有する状態と避難所表示の流れ。
//! 地図インスタンスやマスタデータのキャッシュはモジュールレベルの
//! グローバルではなくこのコンテキストが持ち、必要な関数へ明示的に渡す

use crate::api::{self, ApiError};
use crate::map::{LatLng, MapAdapter};
use crate::marker::icon::{LayoutStrategy, build_marker_icon};
use crate::shelter::disaster::{DisasterType, disaster_types};
use crate::shelter::geojson::{ShelterCollection, ShelterFeature};
use crate::shelter::master::MasterData;
use crate::app::status::{StatusLevel, StatusSink};

pub struct AppContext<M: MapAdapter> {
    pub map: M,
    pub strategy: LayoutStrategy,
    master: Option<MasterData>,
}

impl<M: MapAdapter> AppContext<M> {
    pub fn new(map: M, strategy: LayoutStrategy) -> Self {
        Self {
            map,
            strategy,
            master: None,
        }
    }

    /// マスタデータ。初回だけfetchし、以後はキャッシュを返す
    pub async fn master(&mut self) -> Result<&MasterData, ApiError> {
        if self.master.is_none() {
            self.master = Some(api::fetch_master().await?);
        }
        Ok(self.master.as_ref().unwrap())
    }

    /// 団体コードで避難所を取得して地図に表示する。
    /// 失敗はステータス欄に流し、呼び出し側へもそのまま返す。
    /// リトライはしない(ユーザーの再操作に任せる)
    pub async fn load_shelters(
        &mut self,
        city_code: &str,
        status: &mut dyn StatusSink,
    ) -> Result<ShelterCollection, ApiError> {
        status.show(StatusLevel::Loading, "データを読み込み中...");

        match api::fetch_shelters(city_code).await {
            Ok(collection) => {
                let count = display_shelters(&mut self.map, &collection, self.strategy);
                status.show(
                    StatusLevel::Success,
                    &format!("{}件の緊急避難所を表示しました", count),
                );
                Ok(collection)
            }
            Err(e) => {
                log::error!("避難所データの取得に失敗しました: {}", e);
                status.show(StatusLevel::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// 指定地点周辺の避難所を表示する。逆ジオコーディングとマスタ照合で
    /// 団体コードを特定してから通常の読込みに入る
    pub async fn load_shelters_near(
        &mut self,
        at: LatLng,
        status: &mut dyn StatusSink,
    ) -> Result<ShelterCollection, ApiError> {
        let city = {
            let master = self.master().await?;
            match crate::app::geolocate::resolve_city_from(at, master).await {
                Ok(city) => city,
                Err(e) => {
                    log::error!("市区町村の特定に失敗しました: {}", e);
                    status.show(
                        StatusLevel::Error,
                        "現在地周辺の市区町村を特定できませんでした",
                    );
                    return Err(e);
                }
            }
        };
        log::info!("現在地の市区町村: {} ({})", city.name, city.code);
        self.load_shelters(&city.code, status).await
    }
}

/// featureをマーカーとして並べ、全体が収まるように表示範囲を合わせる
pub fn display_shelters<M: MapAdapter>(
    map: &mut M,
    collection: &ShelterCollection,
    strategy: LayoutStrategy,
) -> usize {
    map.clear_markers();

    let mut bounds = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        let at = feature.latlng();
        let disasters = disaster_types(&feature.properties);
        let icon = build_marker_icon(&disasters, strategy);
        let popup = popup_content(feature, &disasters);
        map.add_marker(at, icon, Some(popup));
        bounds.push(at);
    }

    if !bounds.is_empty() {
        map.fit_bounds(&bounds);
    }
    bounds.len()
}

/// ポップアップのHTML
pub fn popup_content(feature: &ShelterFeature, disasters: &[DisasterType]) -> String {
    let tags: String = disasters
        .iter()
        .map(|d| {
            format!(
                r#"<span class="disaster-tag">{} {}</span>"#,
                d.glyph(),
                d.label()
            )
        })
        .collect();
    let tags = if tags.is_empty() {
        "<span>データなし</span>".to_string()
    } else {
        tags
    };

    let remarks = match feature.prop("備考") {
        Some(remarks) if !remarks.is_empty() => format!(
            r#"<div class="info-row"><span class="label">備考:</span><span>{}</span></div>"#,
            remarks
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="popup-content">
<h3>{}</h3>
<div class="info-row"><span class="label">住所:</span><span>{}</span></div>
<div class="info-row"><span class="label">共通ID:</span><span>{}</span></div>
<div class="disaster-types"><h4>対応災害種別:</h4><div class="disaster-tags">{}</div></div>
{}</div>"#,
        feature.name(),
        feature.prop("住所").unwrap_or("不明"),
        feature.prop("共通ID").unwrap_or("不明"),
        tags,
        remarks
    )
}

/// 地図の初期表示位置(東京)
pub const INITIAL_CENTER: LatLng = LatLng {
    lat: 35.6762,
    lng: 139.6503,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::RecordingMap;

    fn sample_collection() -> ShelterCollection {
        serde_json::from_str(
            r#"{
                "features": [
                    {
                        "geometry": { "coordinates": [141.35, 43.06] },
                        "properties": {
                            "施設・場所名": "中央小学校",
                            "住所": "札幌市中央区",
                            "共通ID": "01-0001",
                            "洪水": "1",
                            "地震": "1"
                        }
                    },
                    {
                        "geometry": { "coordinates": [141.40, 43.10] },
                        "properties": { "施設・場所名": "北区体育館" }
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn display_places_one_marker_per_feature() {
        let mut map = RecordingMap::default();
        let count = display_shelters(&mut map, &sample_collection(), LayoutStrategy::ConcentricRing);
        assert_eq!(count, 2);
        assert_eq!(map.markers.len(), 2);
        assert_eq!(map.clear_count, 1);

        let fitted = map.fitted.as_ref().unwrap();
        assert_eq!(fitted.len(), 2);
        assert_eq!(fitted[0].lat, 43.06);
        assert_eq!(fitted[0].lng, 141.35);
    }

    #[test]
    fn display_clears_previous_markers() {
        let mut map = RecordingMap::default();
        display_shelters(&mut map, &sample_collection(), LayoutStrategy::Combined);
        display_shelters(&mut map, &sample_collection(), LayoutStrategy::Combined);
        assert_eq!(map.markers.len(), 2);
        assert_eq!(map.clear_count, 2);
    }

    #[test]
    fn empty_collection_does_not_fit_bounds() {
        let mut map = RecordingMap::default();
        let empty: ShelterCollection = serde_json::from_str("{}").unwrap();
        let count = display_shelters(&mut map, &empty, LayoutStrategy::ConcentricRing);
        assert_eq!(count, 0);
        assert!(map.fitted.is_none());
    }

    #[test]
    fn popup_lists_fields_and_disaster_tags() {
        let collection = sample_collection();
        let feature = &collection.features[0];
        let disasters = disaster_types(&feature.properties);
        let html = popup_content(feature, &disasters);

        assert!(html.contains("中央小学校"));
        assert!(html.contains("札幌市中央区"));
        assert!(html.contains("01-0001"));
        assert!(html.contains("🌊 洪水"));
        assert!(html.contains("🏚️ 地震"));
        assert!(!html.contains("備考"));
    }

    #[test]
    fn popup_without_disasters_shows_placeholder() {
        let collection = sample_collection();
        let feature = &collection.features[1];
        let html = popup_content(feature, &[]);
        assert!(html.contains("北区体育館"));
        assert!(html.contains("データなし"));
        assert!(html.contains("不明"));
    }
}
