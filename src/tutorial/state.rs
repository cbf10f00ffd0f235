//! チュートリアルのページ送りとモード切替を純粋な状態機械として持つ。
//! DOM操作はこのモジュールが返すStepに従って外側(widget)が行う

use serde::Deserialize;

/// チュートリアルの1ページ。リモート設定から一度だけ読み込まれ、
/// セッション中は不変
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TutorialPage {
    /// ページ本文(HTML断片)の取得先
    pub url: String,
    /// ハイライト対象要素のid。あればツールチップ表示になる
    #[serde(rename = "highlightId", default)]
    pub highlight_id: Option<String>,
}

/// リモート設定のルート
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TutorialConfig {
    #[serde(default)]
    pub pages: Vec<TutorialPage>,
}

/// 表示面の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// 画面中央の固定ボックス
    Modal,
    /// 要素に寄り添う矢印付きボックス
    Tooltip,
}

/// ウィジェットのライフサイクル。Closedは終端で、再利用しない
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Inactive,
    Loading,
    Active { index: usize, mode: DisplayMode },
    Closed,
}

/// 遷移の結果。DOM層はこれだけを見て表示を更新する
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// 指定のページを表示する
    Show(PageView),
    /// コンテナを破棄して終了する
    Close,
    /// 表示に変化なし
    Stay,
}

/// 表示すべきページのスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub index: usize,
    pub mode: DisplayMode,
    /// モードが変わった(または表示面がない)ため、コンテナを
    /// 作り直す必要がある。使い回しはしない
    pub rebuild_surface: bool,
    /// 最終ページかどうか
    pub last: bool,
}

/// ナビゲーションボタンのラベル
pub fn nav_label(last: bool) -> &'static str {
    if last { "おわり" } else { "つぎへ" }
}

/// ページ列と現在位置を持つセッション本体
#[derive(Debug)]
pub struct TutorialSession {
    pages: Vec<TutorialPage>,
    phase: Phase,
}

impl TutorialSession {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            phase: Phase::Inactive,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn page(&self, index: usize) -> Option<&TutorialPage> {
        self.pages.get(index)
    }

    /// 永続化された消去フラグを確認して開始する。
    /// フラグ済みなら何も描画せずに終了する
    pub fn begin(&mut self, dismissed: bool) -> Step {
        match self.phase {
            Phase::Inactive if dismissed => {
                self.phase = Phase::Closed;
                Step::Close
            }
            Phase::Inactive => {
                self.phase = Phase::Loading;
                Step::Stay
            }
            _ => Step::Stay,
        }
    }

    /// 設定の読込み結果を反映する。0ページ(取得失敗を含む)なら終了
    pub fn pages_loaded(&mut self, pages: Vec<TutorialPage>) -> Step {
        if self.phase != Phase::Loading {
            return Step::Stay;
        }
        if pages.is_empty() {
            self.phase = Phase::Closed;
            return Step::Close;
        }
        self.pages = pages;
        self.show_page(0)
    }

    /// 「つぎへ」。最終ページを越えたら閉じる
    pub fn advance(&mut self) -> Step {
        match self.phase {
            Phase::Active { index, .. } => {
                if index + 1 < self.pages.len() {
                    self.show_page(index + 1)
                } else {
                    self.phase = Phase::Closed;
                    Step::Close
                }
            }
            _ => Step::Stay,
        }
    }

    /// 明示的な閉じる操作
    pub fn close(&mut self) -> Step {
        if self.phase == Phase::Closed {
            Step::Stay
        } else {
            self.phase = Phase::Closed;
            Step::Close
        }
    }

    fn mode_of(&self, index: usize) -> DisplayMode {
        match self.pages.get(index).and_then(|p| p.highlight_id.as_ref()) {
            Some(_) => DisplayMode::Tooltip,
            None => DisplayMode::Modal,
        }
    }

    fn show_page(&mut self, index: usize) -> Step {
        let mode = self.mode_of(index);
        // モードが変わるときは表示面を破棄して作り直す
        let rebuild_surface = match self.phase {
            Phase::Active { mode: previous, .. } => previous != mode,
            _ => true,
        };
        self.phase = Phase::Active { index, mode };
        Step::Show(PageView {
            index,
            mode,
            rebuild_surface,
            last: index + 1 == self.pages.len(),
        })
    }
}

impl Default for TutorialSession {
    fn default() -> Self {
        Self::new()
    }
}
