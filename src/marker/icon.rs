use serde::Serialize;

use super::layout::{CENTER_GLYPH, ICON_BOX, layout_ring_icons};
use crate::shelter::disaster::DisasterType;

/// マーカーアイコンの組み立て方式。
/// 旧来の「全グリフ連結」と同心円配置を同じ入口で切り替える
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    /// 対応災害のグリフを1つのアイコンに連結する
    Combined,
    /// 中心ピンの周囲にリング状に並べる
    #[default]
    ConcentricRing,
}

impl LayoutStrategy {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" | "combine" => LayoutStrategy::Combined,
            _ => LayoutStrategy::ConcentricRing,
        }
    }
}

/// 地図ライブラリにdivIconとして渡すカスタムアイコン記述子
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub html: String,
    pub icon_size: [f64; 2],
    pub icon_anchor: [f64; 2],
    pub popup_anchor: [f64; 2],
}

/// 1グリフ分のスタイル。白い縁取りで地図タイルから浮かせる
const GLYPH_SHADOW: &str = "text-shadow: 0 0 3px white, 0 0 5px white;";

/// 対応災害種別からマーカーアイコンを組み立てる
pub fn build_marker_icon(disasters: &[DisasterType], strategy: LayoutStrategy) -> MarkerIcon {
    match strategy {
        LayoutStrategy::Combined => combined_icon(disasters),
        LayoutStrategy::ConcentricRing => ring_icon(disasters),
    }
}

/// 旧方式: グリフを連結して30x30の1アイコンにする
fn combined_icon(disasters: &[DisasterType]) -> MarkerIcon {
    let text = if disasters.is_empty() {
        CENTER_GLYPH.to_string()
    } else {
        disasters.iter().map(|d| d.glyph()).collect()
    };
    MarkerIcon {
        html: format!(
            r#"<div style="font-size: 24px; text-align: center; {}">{}</div>"#,
            GLYPH_SHADOW, text
        ),
        icon_size: [30.0, 30.0],
        icon_anchor: [15.0, 15.0],
        popup_anchor: [0.0, -15.0],
    }
}

/// 同心円方式: 中心ピンとリング上のグリフを絶対配置で並べる
fn ring_icon(disasters: &[DisasterType]) -> MarkerIcon {
    let layout = layout_ring_icons(disasters);
    let half = ICON_BOX / 2.0;

    let mut html = format!(
        r#"<div style="position: relative; width: {}px; height: {}px;">"#,
        ICON_BOX, ICON_BOX
    );
    // 中心ピン(30x30で中央寄せ)
    html.push_str(&format!(
        r#"<div style="position: absolute; left: {}px; top: {}px; width: 30px; height: 30px; font-size: 24px; line-height: 30px; text-align: center; {}">{}</div>"#,
        half - 15.0,
        half - 15.0,
        GLYPH_SHADOW,
        layout.center
    ));
    // リング上のグリフ(20x20で各配置点に中央寄せ)
    for icon in &layout.icons {
        html.push_str(&format!(
            r#"<div style="position: absolute; left: {:.1}px; top: {:.1}px; width: 20px; height: 20px; font-size: 16px; line-height: 20px; text-align: center; {}">{}</div>"#,
            half + icon.dx - 10.0,
            half + icon.dy - 10.0,
            GLYPH_SHADOW,
            icon.disaster.glyph()
        ));
    }
    html.push_str("</div>");

    MarkerIcon {
        html,
        icon_size: [ICON_BOX, ICON_BOX],
        icon_anchor: [half, half],
        popup_anchor: [0.0, -15.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shelter::disaster::DisasterType::*;

    #[test]
    fn combined_joins_glyphs_in_order() {
        let icon = build_marker_icon(&[Flood, Landslide, MajorFire], LayoutStrategy::Combined);
        assert!(icon.html.contains("🌊⛰️🔥"));
        assert_eq!(icon.icon_size, [30.0, 30.0]);
        assert_eq!(icon.icon_anchor, [15.0, 15.0]);
    }

    #[test]
    fn combined_without_types_shows_pin() {
        let icon = build_marker_icon(&[], LayoutStrategy::Combined);
        assert!(icon.html.contains("📍"));
    }

    #[test]
    fn ring_icon_places_center_and_glyphs() {
        let icon = build_marker_icon(&[Flood, Earthquake], LayoutStrategy::ConcentricRing);
        assert!(icon.html.contains("📍"));
        assert!(icon.html.contains("🏚️"));
        assert_eq!(icon.icon_size, [200.0, 200.0]);
        assert_eq!(icon.icon_anchor, [100.0, 100.0]);
    }

    #[test]
    fn ring_icon_without_types_has_only_center() {
        let icon = build_marker_icon(&[], LayoutStrategy::ConcentricRing);
        // 中心ピンのdivと外枠のみ
        assert_eq!(icon.html.matches("<div").count(), 2);
    }

    #[test]
    fn strategy_parsing_defaults_to_ring() {
        assert_eq!(LayoutStrategy::from_str("combined"), LayoutStrategy::Combined);
        assert_eq!(LayoutStrategy::from_str("ring"), LayoutStrategy::ConcentricRing);
        assert_eq!(LayoutStrategy::from_str(""), LayoutStrategy::ConcentricRing);
    }

    #[test]
    fn icon_serializes_with_leaflet_field_names() {
        let icon = build_marker_icon(&[Flood], LayoutStrategy::Combined);
        let json = serde_json::to_string(&icon).unwrap();
        assert!(json.contains("\"iconSize\""));
        assert!(json.contains("\"iconAnchor\""));
        assert!(json.contains("\"popupAnchor\""));
    }
}
