//! 災害種別アイコンの同心円レイアウト。
//! 中心ピンの周囲に3本のリングを置き、内側から順に埋めていく。
//! 入力順を保ち、同じ入力には常に同じ配置を返す

use crate::shelter::disaster::DisasterType;

/// リング定義 (半径px, 最大収容数)。内側から外側の順
pub const RINGS: [(f64, usize); 3] = [(39.0, 6), (59.0, 8), (79.0, 12)];

/// アイコン配置用バウンディングボックスの一辺(論理単位)。中心アンカー
pub const ICON_BOX: f64 = 200.0;

/// 中心ピンのグリフ
pub const CENTER_GLYPH: &str = "📍";

/// 3リングの合計収容数
pub fn ring_capacity() -> usize {
    RINGS.iter().map(|&(_, cap)| cap).sum()
}

/// リング上に置かれた1アイコン
#[derive(Debug, Clone, PartialEq)]
pub struct RingIcon {
    pub disaster: DisasterType,
    /// 12時方向を-90°として時計回りに進む角度(度)
    pub angle_deg: f64,
    /// 中心からの距離(px)
    pub radius: f64,
    /// ボックス中心からのオフセット
    pub dx: f64,
    pub dy: f64,
}

/// 1避難所分のマーカーレイアウト
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayout {
    pub center: &'static str,
    pub icons: Vec<RingIcon>,
}

/// 災害種別リストを同心円状に配置する。
/// 各リングは容量いっぱいまで先に埋まり、あふれた分だけが次のリングへ進む。
/// リング内のk個は360/k度の等間隔。合計収容数(26)を超えた分は黙って捨てる
pub fn layout_ring_icons(disasters: &[DisasterType]) -> MarkerLayout {
    let mut icons = Vec::with_capacity(disasters.len().min(ring_capacity()));
    let mut rest = disasters;

    for &(radius, cap) in RINGS.iter() {
        if rest.is_empty() {
            break;
        }
        let take = cap.min(rest.len());
        let step = 360.0 / take as f64;
        for (i, &disaster) in rest[..take].iter().enumerate() {
            let angle_deg = -90.0 + i as f64 * step;
            let rad = angle_deg.to_radians();
            icons.push(RingIcon {
                disaster,
                angle_deg,
                radius,
                dx: radius * rad.cos(),
                dy: radius * rad.sin(),
            });
        }
        rest = &rest[take..];
    }

    if !rest.is_empty() {
        log::debug!("リング容量を超えた{}個の災害種別を省略しました", rest.len());
    }

    MarkerLayout {
        center: CENTER_GLYPH,
        icons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shelter::disaster::ALL_DISASTER_TYPES;

    /// 全種別を繰り返してn個の入力を作る
    fn n_disasters(n: usize) -> Vec<DisasterType> {
        ALL_DISASTER_TYPES.iter().copied().cycle().take(n).collect()
    }

    fn angles(layout: &MarkerLayout, radius: f64) -> Vec<f64> {
        layout
            .icons
            .iter()
            .filter(|icon| icon.radius == radius)
            .map(|icon| icon.angle_deg)
            .collect()
    }

    #[test]
    fn empty_input_gives_center_only() {
        let layout = layout_ring_icons(&[]);
        assert_eq!(layout.center, "📍");
        assert!(layout.icons.is_empty());
    }

    #[test]
    fn six_icons_fill_ring_one_at_sixty_degree_steps() {
        let layout = layout_ring_icons(&n_disasters(6));
        assert_eq!(layout.icons.len(), 6);
        assert_eq!(
            angles(&layout, 39.0),
            vec![-90.0, -30.0, 30.0, 90.0, 150.0, 210.0]
        );
        assert!(angles(&layout, 59.0).is_empty());
    }

    #[test]
    fn seventh_icon_overflows_to_ring_two() {
        let layout = layout_ring_icons(&n_disasters(7));
        assert_eq!(layout.icons.len(), 7);
        // リング1は満席のまま
        assert_eq!(
            angles(&layout, 39.0),
            vec![-90.0, -30.0, 30.0, 90.0, 150.0, 210.0]
        );
        // あふれた1個は12時方向
        assert_eq!(angles(&layout, 59.0), vec![-90.0]);
    }

    #[test]
    fn twenty_six_fills_all_rings_and_extras_are_dropped() {
        let layout = layout_ring_icons(&n_disasters(26));
        assert_eq!(layout.icons.len(), 26);
        assert_eq!(angles(&layout, 39.0).len(), 6);
        assert_eq!(angles(&layout, 59.0).len(), 8);
        assert_eq!(angles(&layout, 79.0).len(), 12);

        let overfull = layout_ring_icons(&n_disasters(27));
        assert_eq!(overfull.icons.len(), 26);
    }

    #[test]
    fn twelve_oclock_maps_to_straight_up_offset() {
        let layout = layout_ring_icons(&n_disasters(1));
        let icon = &layout.icons[0];
        assert_eq!(icon.angle_deg, -90.0);
        assert!(icon.dx.abs() < 1e-9);
        assert!((icon.dy + 39.0).abs() < 1e-9);
    }

    #[test]
    fn same_input_same_layout() {
        let input = n_disasters(11);
        assert_eq!(layout_ring_icons(&input), layout_ring_icons(&input));
    }
}
