//! ツールチップとハイライトボックスの配置計算。
//! DOMからは矩形だけを受け取り、座標計算はすべてここで閉じる

/// ビューポート座標系の矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// 吹き出し矢印の向き。CSSクラス名に対応する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    /// ツールチップがターゲットの下にあり、矢印は上を指す
    Top,
    Bottom,
    Left,
    Right,
}

impl Arrow {
    pub fn class_name(self) -> &'static str {
        match self {
            Arrow::Top => "arrow-top",
            Arrow::Bottom => "arrow-bottom",
            Arrow::Left => "arrow-left",
            Arrow::Right => "arrow-right",
        }
    }
}

/// ターゲットとの間隔、およびビューポート端の余白(論理単位)
pub const PLACEMENT_PADDING: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    pub top: f64,
    pub left: f64,
    pub arrow: Arrow,
}

/// ターゲット矩形に対するツールチップの位置を決める。
/// 下(水平中央) -> 上 -> 横(右優先、垂直中央) の順で試し、
/// 最後にビューポート内へ収める
pub fn place_tooltip(target: Rect, tooltip: Size, viewport: Size) -> TooltipPlacement {
    let padding = PLACEMENT_PADDING;

    let mut top = target.bottom() + padding;
    let mut left = target.left + target.width / 2.0 - tooltip.width / 2.0;
    let mut arrow = Arrow::Top;

    if top + tooltip.height > viewport.height {
        top = target.top - tooltip.height - padding;
        arrow = Arrow::Bottom;
    }

    if top < 0.0 {
        top = target.top + target.height / 2.0 - tooltip.height / 2.0;
        if target.right() + tooltip.width + padding < viewport.width {
            left = target.right() + padding;
            arrow = Arrow::Left;
        } else {
            left = target.left - tooltip.width - padding;
            arrow = Arrow::Right;
        }
    }

    // 端のクランプ。ビューポートがツールチップより小さいときは
    // 前側(上・左)の余白を優先する
    if left < padding {
        left = padding;
    } else if left + tooltip.width > viewport.width - padding {
        left = viewport.width - tooltip.width - padding;
    }

    if top < padding {
        top = padding;
    } else if top + tooltip.height > viewport.height - padding {
        top = viewport.height - tooltip.height - padding;
    }

    TooltipPlacement { top, left, arrow }
}

/// ハイライトボックスの矩形。ビューポート座標を現在のスクロール量で
/// 文書座標に変換し、ターゲットにぴったり重ねる
pub fn highlight_rect(target: Rect, scroll_left: f64, scroll_top: f64) -> Rect {
    Rect {
        top: target.top + scroll_top,
        left: target.left + scroll_left,
        width: target.width,
        height: target.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size {
        width: 800.0,
        height: 600.0,
    };
    const TOOLTIP: Size = Size {
        width: 200.0,
        height: 80.0,
    };

    #[test]
    fn prefers_below_target_when_it_fits() {
        let target = Rect {
            top: 100.0,
            left: 300.0,
            width: 50.0,
            height: 20.0,
        };
        let placement = place_tooltip(target, TOOLTIP, VIEWPORT);
        assert_eq!(placement.top, 140.0);
        assert_eq!(placement.left, 225.0);
        assert_eq!(placement.arrow, Arrow::Top);
    }

    #[test]
    fn falls_back_above_when_below_overflows() {
        // 下に置くと 520 + 20 + 80 = 620 > 600 であふれる
        let target = Rect {
            top: 500.0,
            left: 100.0,
            width: 50.0,
            height: 20.0,
        };
        let placement = place_tooltip(target, TOOLTIP, VIEWPORT);
        assert_eq!(placement.top, 400.0);
        assert_eq!(placement.arrow, Arrow::Bottom);
        assert_eq!(placement.arrow.class_name(), "arrow-bottom");
    }

    #[test]
    fn falls_back_beside_when_above_also_overflows() {
        // 縦120の狭いビューポートでは上下どちらにも入らない
        let viewport = Size {
            width: 800.0,
            height: 120.0,
        };
        let target = Rect {
            top: 40.0,
            left: 100.0,
            width: 50.0,
            height: 20.0,
        };
        let placement = place_tooltip(target, TOOLTIP, viewport);
        // 垂直中央 40 + 10 - 40 = 10、右側に余裕があるので右
        assert_eq!(placement.left, 170.0);
        assert_eq!(placement.arrow, Arrow::Left);
    }

    #[test]
    fn beside_placement_prefers_left_when_right_overflows() {
        let viewport = Size {
            width: 400.0,
            height: 120.0,
        };
        let target = Rect {
            top: 40.0,
            left: 250.0,
            width: 100.0,
            height: 20.0,
        };
        let placement = place_tooltip(target, TOOLTIP, viewport);
        // 右は 350 + 200 + 20 > 400 で入らないため左へ
        assert_eq!(placement.arrow, Arrow::Right);
        // 左配置 250 - 200 - 20 = 30 はクランプの影響を受けない
        assert_eq!(placement.left, 30.0);
    }

    #[test]
    fn horizontal_clamp_keeps_tooltip_inside_viewport() {
        let target = Rect {
            top: 100.0,
            left: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let placement = place_tooltip(target, TOOLTIP, VIEWPORT);
        assert_eq!(placement.left, PLACEMENT_PADDING);

        let target_right = Rect {
            top: 100.0,
            left: 790.0,
            width: 10.0,
            height: 10.0,
        };
        let placement = place_tooltip(target_right, TOOLTIP, VIEWPORT);
        assert_eq!(placement.left, 800.0 - 200.0 - PLACEMENT_PADDING);
    }

    #[test]
    fn highlight_rect_converts_to_document_coordinates() {
        let target = Rect {
            top: 500.0,
            left: 100.0,
            width: 50.0,
            height: 20.0,
        };
        let rect = highlight_rect(target, 15.0, 240.0);
        assert_eq!(rect.top, 740.0);
        assert_eq!(rect.left, 115.0);
        assert_eq!(rect.width, 50.0);
        assert_eq!(rect.height, 20.0);
    }
}
