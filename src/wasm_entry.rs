// WASM専用のエントリーポイント

use wasm_bindgen::prelude::*;

use crate::app::context::popup_content;
use crate::marker::icon::{LayoutStrategy, build_marker_icon};
use crate::shelter::disaster::disaster_types;
use crate::shelter::geojson::ShelterFeature;

#[wasm_bindgen(start)]
pub fn main() {
    // パニック時のエラーメッセージをブラウザコンソールに表示
    console_error_panic_hook::set_once();

    // WebAssembly用のロガーを初期化
    console_log::init_with_level(log::Level::Debug).expect("error initializing log");

    log::info!("hinamap WASM starting...");
}

/// feature(JSON)からdivIcon用のカスタムアイコン記述子(JSON)を作る。
/// 地図側(JS)はこれをそのままL.divIconに渡せる
#[wasm_bindgen]
pub fn marker_icon_json(feature_json: &str, strategy: &str) -> Result<String, JsValue> {
    let feature: ShelterFeature = serde_json::from_str(feature_json)
        .map_err(|e| JsValue::from_str(&format!("featureの解析に失敗しました: {}", e)))?;
    let disasters = disaster_types(&feature.properties);
    let icon = build_marker_icon(&disasters, LayoutStrategy::from_str(strategy));
    serde_json::to_string(&icon).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// feature(JSON)からポップアップのHTMLを作る
#[wasm_bindgen]
pub fn popup_html(feature_json: &str) -> Result<String, JsValue> {
    let feature: ShelterFeature = serde_json::from_str(feature_json)
        .map_err(|e| JsValue::from_str(&format!("featureの解析に失敗しました: {}", e)))?;
    let disasters = disaster_types(&feature.properties);
    Ok(popup_content(&feature, &disasters))
}

/// 「現在地から探す」。位置情報を取得し、団体コードを
/// `callback(code, errorMessage)` の形で一度だけ返す
#[wasm_bindgen]
pub fn locate_city_code(callback: js_sys::Function) {
    use crate::app::geolocate::{self, resolve_city_from};

    geolocate::request_location(move |result| match result {
        Ok(at) => {
            wasm_bindgen_futures::spawn_local(async move {
                let resolved = match crate::api::fetch_master().await {
                    Ok(master) => resolve_city_from(at, &master).await,
                    Err(e) => Err(e),
                };
                match resolved {
                    Ok(city) => {
                        callback
                            .call2(
                                &JsValue::NULL,
                                &JsValue::from_str(&city.code),
                                &JsValue::NULL,
                            )
                            .ok();
                    }
                    Err(e) => {
                        log::error!("団体コードの解決に失敗しました: {}", e);
                        callback
                            .call2(
                                &JsValue::NULL,
                                &JsValue::NULL,
                                &JsValue::from_str("現在地周辺の市区町村を特定できませんでした"),
                            )
                            .ok();
                    }
                }
            });
        }
        Err(e) => {
            callback
                .call2(
                    &JsValue::NULL,
                    &JsValue::NULL,
                    &JsValue::from_str(e.user_message()),
                )
                .ok();
        }
    });
}

/// 緯度経度から団体コードを解決する(Promiseを返す)
#[wasm_bindgen]
pub async fn resolve_city_code(lat: f64, lng: f64) -> Result<JsValue, JsValue> {
    use crate::app::geolocate::resolve_city_from;
    use crate::map::LatLng;

    let master = crate::api::fetch_master()
        .await
        .map_err(|e| JsValue::from_str(&e.user_message()))?;
    let city = resolve_city_from(LatLng { lat, lng }, &master)
        .await
        .map_err(|e| JsValue::from_str(&e.user_message()))?;
    Ok(JsValue::from_str(&city.code))
}
