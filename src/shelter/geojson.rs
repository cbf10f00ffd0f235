use serde::Deserialize;
use serde_json::{Map, Value};

use crate::map::LatLng;

/// jp-shelter-apiが返すGeoJSON風のレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct ShelterCollection {
    #[serde(default)]
    pub features: Vec<ShelterFeature>,
}

/// 避難所1件分のfeature
#[derive(Debug, Clone, Deserialize)]
pub struct ShelterFeature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// GeoJSONは [経度, 緯度] の順。標高付きの3要素もそのまま受ける
    pub coordinates: Vec<f64>,
}

impl ShelterFeature {
    /// 緯度経度。coordinatesの順序の入れ替えはここで一度だけ行う
    pub fn latlng(&self) -> LatLng {
        LatLng {
            lat: self.geometry.coordinates.get(1).copied().unwrap_or(0.0),
            lng: self.geometry.coordinates.get(0).copied().unwrap_or(0.0),
        }
    }

    /// 文字列プロパティの取得
    pub fn prop(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// 施設・場所名
    pub fn name(&self) -> &str {
        self.prop("施設・場所名").unwrap_or("名称不明")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "features": [
            {
                "geometry": { "coordinates": [141.354389, 43.062083] },
                "properties": {
                    "施設・場所名": "テスト小学校",
                    "住所": "札幌市中央区",
                    "洪水": "1",
                    "地震": "1"
                }
            }
        ]
    }"#;

    #[test]
    fn parses_feature_collection() {
        let collection: ShelterCollection = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].name(), "テスト小学校");
    }

    #[test]
    fn latlng_swaps_coordinate_order() {
        let collection: ShelterCollection = serde_json::from_str(SAMPLE).unwrap();
        let at = collection.features[0].latlng();
        assert_eq!(at.lat, 43.062083);
        assert_eq!(at.lng, 141.354389);
    }

    #[test]
    fn missing_name_falls_back() {
        let feature: ShelterFeature = serde_json::from_str(
            r#"{ "geometry": { "coordinates": [0.0, 0.0] }, "properties": {} }"#,
        )
        .unwrap();
        assert_eq!(feature.name(), "名称不明");
    }

    #[test]
    fn empty_body_means_no_features() {
        let collection: ShelterCollection = serde_json::from_str("{}").unwrap();
        assert!(collection.features.is_empty());
    }
}
