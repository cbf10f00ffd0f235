use serde::Serialize;

use crate::marker::icon::MarkerIcon;

/// 緯度経度
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// 地図ライブラリとの境界。
/// タイル描画やマーカーの実体化は外部コラボレータの仕事で、
/// このクレートは記述子を渡すところまでを担当する
pub trait MapAdapter {
    /// マーカーレイヤーを空にする
    fn clear_markers(&mut self);

    /// カスタムアイコン付きマーカーを1つ置く
    fn add_marker(&mut self, at: LatLng, icon: MarkerIcon, popup_html: Option<String>);

    /// すべてのマーカーが収まるように表示範囲を調整する
    fn fit_bounds(&mut self, bounds: &[LatLng]);
}

/// 置かれたマーカーを記録するだけの実装。テストとネイティブデモ用
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub markers: Vec<(LatLng, MarkerIcon, Option<String>)>,
    pub fitted: Option<Vec<LatLng>>,
    pub clear_count: usize,
}

impl MapAdapter for RecordingMap {
    fn clear_markers(&mut self) {
        self.markers.clear();
        self.fitted = None;
        self.clear_count += 1;
    }

    fn add_marker(&mut self, at: LatLng, icon: MarkerIcon, popup_html: Option<String>) {
        self.markers.push((at, icon, popup_html));
    }

    fn fit_bounds(&mut self, bounds: &[LatLng]) {
        self.fitted = Some(bounds.to_vec());
    }
}
