//! 「現在地から探す」の流れ。
//! ブラウザの位置情報 -> 逆ジオコーディング -> マスタ照合で団体コードを得る

use crate::api::{self, ApiError};
use crate::map::LatLng;
use crate::shelter::master::{City, MasterData, find_city};

/// 位置情報取得の失敗区分。それぞれ別の文言で案内する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    /// 利用が許可されなかった
    PermissionDenied,
    /// 位置を特定できなかった
    Unavailable,
    /// 制限時間内に取得できなかった
    Timeout,
    /// ブラウザが位置情報に対応していない
    Unsupported,
}

impl GeoError {
    pub fn user_message(self) -> &'static str {
        match self {
            GeoError::PermissionDenied => "位置情報の利用が許可されませんでした",
            GeoError::Unavailable => "現在地を取得できませんでした",
            GeoError::Timeout => "位置情報の取得がタイムアウトしました",
            GeoError::Unsupported => "このブラウザは位置情報に対応していません",
        }
    }
}

/// 現在地から市区町村を特定する。
/// 名前の照合は部分一致なので、似た名前の市区町村があると
/// 別の団体に解決されることがある
pub async fn resolve_city_from(at: LatLng, master: &MasterData) -> Result<City, ApiError> {
    let address = api::reverse_geocode(at.lat, at.lng).await?;
    log::info!(
        "現在地の住所: {} {}",
        address.prefecture,
        address.city
    );
    find_city(master, &address.prefecture, &address.city)
        .cloned()
        .ok_or(ApiError::Empty)
}

/// ブラウザの位置情報を取得する。結果はコールバックで一度だけ返す
#[cfg(target_arch = "wasm32")]
pub fn request_location(on_done: impl FnOnce(Result<LatLng, GeoError>) + 'static) {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    type DoneCallback = Box<dyn FnOnce(Result<LatLng, GeoError>)>;

    let geolocation = web_sys::window().and_then(|w| w.navigator().geolocation().ok());
    let geolocation = match geolocation {
        Some(g) => g,
        None => {
            on_done(Err(GeoError::Unsupported));
            return;
        }
    };

    // 成功・失敗のどちらか先に届いた方だけがコールバックを起動する
    let done: Rc<RefCell<Option<DoneCallback>>> = Rc::new(RefCell::new(Some(Box::new(on_done))));

    let done_ok = Rc::clone(&done);
    let on_success = Closure::wrap(Box::new(move |position: JsValue| {
        let coords = js_sys::Reflect::get(&position, &JsValue::from_str("coords"))
            .unwrap_or(JsValue::UNDEFINED);
        let lat = js_sys::Reflect::get(&coords, &JsValue::from_str("latitude"))
            .ok()
            .and_then(|v| v.as_f64());
        let lng = js_sys::Reflect::get(&coords, &JsValue::from_str("longitude"))
            .ok()
            .and_then(|v| v.as_f64());
        if let Some(callback) = done_ok.borrow_mut().take() {
            match (lat, lng) {
                (Some(lat), Some(lng)) => callback(Ok(LatLng { lat, lng })),
                _ => callback(Err(GeoError::Unavailable)),
            }
        }
    }) as Box<dyn FnMut(JsValue)>);

    let done_err = Rc::clone(&done);
    let on_error = Closure::wrap(Box::new(move |error: JsValue| {
        let code = js_sys::Reflect::get(&error, &JsValue::from_str("code"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as u16;
        // GeolocationPositionErrorのコード: 1=拒否, 2=取得不能, 3=タイムアウト
        let geo_error = match code {
            1 => GeoError::PermissionDenied,
            3 => GeoError::Timeout,
            _ => GeoError::Unavailable,
        };
        if let Some(callback) = done_err.borrow_mut().take() {
            callback(Err(geo_error));
        }
    }) as Box<dyn FnMut(JsValue)>);

    let registered = geolocation.get_current_position_with_error_callback(
        on_success.as_ref().unchecked_ref(),
        Some(on_error.as_ref().unchecked_ref()),
    );
    if registered.is_err() {
        if let Some(callback) = done.borrow_mut().take() {
            callback(Err(GeoError::Unsupported));
        }
        return;
    }
    on_success.forget();
    on_error.forget();
}
