//! チュートリアルウィジェットのDOM側。
//! 状態遷移はstate.rs、座標計算はplacement.rsに任せ、
//! ここでは要素の生成・破棄とイベント配線だけを行う

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use super::placement::{self, Rect, Size};
use super::state::{DisplayMode, PageView, Step, TutorialSession, nav_label};
use super::storage::{DEFAULT_STORAGE_KEY, DismissalStore, LocalStorage};
use crate::api;

/// ページ内容の読込み失敗時に出すフォールバック
const CONTENT_FALLBACK: &str = "<p>コンテンツの読み込みに失敗しました。</p>";

/// モーダル・ツールチップ共通の中身
const SURFACE_BODY: &str = r#"
      <button class="tutorial-widget-close" aria-label="閉じる">×</button>
      <div class="tutorial-widget-content"></div>
      <div class="tutorial-widget-footer">
        <label class="tutorial-widget-checkbox">
          <input type="checkbox" id="tutorial-widget-no-show">
          <span>次回は表示しない</span>
        </label>
        <div class="tutorial-widget-buttons">
          <button class="tutorial-widget-nav-btn" id="tutorial-widget-next">つぎへ</button>
        </div>
      </div>
"#;

/// 表示面。DropでDOMから取り除かれ、ぶら下がっていた
/// イベントクロージャも一緒に破棄される
struct Surface {
    /// bodyに追加したルート要素。モーダルではオーバーレイ
    root: Element,
    /// ボックス本体。ツールチップではrootと同じ要素
    panel: Element,
    content: Element,
    nav_button: Element,
    mode: DisplayMode,
    _closures: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.root.remove();
    }
}

/// ハイライトボックスとresize/scrollリスナー。
/// リスナーの寿命はハイライトの寿命と厳密に一致させる
struct Highlight {
    box_el: Element,
    target: Element,
    handler: Closure<dyn FnMut()>,
}

impl Drop for Highlight {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window
                .remove_event_listener_with_callback(
                    "resize",
                    self.handler.as_ref().unchecked_ref(),
                )
                .ok();
            window
                .remove_event_listener_with_callback_and_bool(
                    "scroll",
                    self.handler.as_ref().unchecked_ref(),
                    true,
                )
                .ok();
        }
        self.box_el.remove();
    }
}

struct Inner {
    session: TutorialSession,
    storage: LocalStorage,
    storage_key: String,
    config_url: String,
    surface: Option<Surface>,
    highlight: Option<Highlight>,
    /// 破棄後に届いた応答を捨てるための世代カウンタ
    epoch: u32,
}

/// 組込み用チュートリアルウィジェット。
/// `new TutorialWidget({ configUrl, storageKey? })` で生成し、
/// `init()` で表示を開始する
#[wasm_bindgen]
pub struct TutorialWidget {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl TutorialWidget {
    #[wasm_bindgen(constructor)]
    pub fn new(config: &JsValue) -> Result<TutorialWidget, JsValue> {
        let config_url = js_sys::Reflect::get(config, &JsValue::from_str("configUrl"))
            .ok()
            .and_then(|v| v.as_string())
            .ok_or_else(|| JsValue::from_str("configUrl is required"))?;
        let storage_key = js_sys::Reflect::get(config, &JsValue::from_str("storageKey"))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

        Ok(TutorialWidget {
            inner: Rc::new(RefCell::new(Inner {
                session: TutorialSession::new(),
                storage: LocalStorage,
                storage_key,
                config_url,
                surface: None,
                highlight: None,
                epoch: 0,
            })),
        })
    }

    /// 消去フラグを確認し、設定を読み込んで最初のページを表示する。
    /// フラグ済みなら何も描画しない
    pub fn init(&self) {
        let inner = Rc::clone(&self.inner);
        wasm_bindgen_futures::spawn_local(async move {
            let (dismissed, config_url, epoch) = {
                let r = inner.borrow();
                (
                    r.storage.is_dismissed(&r.storage_key),
                    r.config_url.clone(),
                    r.epoch,
                )
            };

            let step = inner.borrow_mut().session.begin(dismissed);
            if step == Step::Close {
                log::info!("チュートリアルは非表示に設定されています");
                return;
            }

            let pages = match api::fetch_tutorial_config(&config_url).await {
                Ok(pages) => pages,
                Err(e) => {
                    log::error!("チュートリアル設定の取得に失敗しました: {}", e);
                    Vec::new()
                }
            };
            if inner.borrow().epoch != epoch {
                // 読込み中に閉じられた
                return;
            }

            let step = inner.borrow_mut().session.pages_loaded(pages);
            apply_step(&inner, step).await;
        });
    }

    /// 消去フラグを取り除く(テスト・サポート用)
    #[wasm_bindgen(js_name = reset)]
    pub fn reset(storage_key: Option<String>) {
        let key = storage_key.unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        LocalStorage.set_dismissed(&key, false);
    }
}

async fn apply_step(inner: &Rc<RefCell<Inner>>, step: Step) {
    match step {
        Step::Stay => {}
        Step::Close => close_widget(inner),
        Step::Show(view) => show_page(inner, view).await,
    }
}

/// コンテナとハイライトをDOMから取り除く。以後に届く応答は無効
fn close_widget(inner: &Rc<RefCell<Inner>>) {
    let mut r = inner.borrow_mut();
    r.highlight = None;
    r.surface = None;
    r.epoch = r.epoch.wrapping_add(1);
}

async fn show_page(inner: &Rc<RefCell<Inner>>, view: PageView) {
    let (page, epoch) = {
        let mut r = inner.borrow_mut();
        // ハイライトはページごとに作り直す
        r.highlight = None;

        let needs_surface =
            view.rebuild_surface || r.surface.as_ref().map(|s| s.mode) != Some(view.mode);
        if needs_surface {
            // モードが変わるときは要素ごと破棄して作り直す。
            // 前の面のリスナーやクラスを持ち越さない
            r.surface = None;
            match build_surface(inner, view.mode) {
                Ok(surface) => r.surface = Some(surface),
                Err(e) => {
                    log::error!("表示面の構築に失敗しました: {:?}", e);
                    return;
                }
            }
        }
        if let Some(surface) = r.surface.as_ref() {
            surface
                .nav_button
                .set_text_content(Some(nav_label(view.last)));
        }

        match r.session.page(view.index) {
            Some(page) => (page.clone(), r.epoch),
            None => return,
        }
    };

    // ハイライトと初期配置はページ内容より先に用意する
    if view.mode == DisplayMode::Tooltip {
        if let Some(id) = page.highlight_id.as_deref() {
            create_highlight(inner, id);
        }
    }

    let html = match api::fetch_text(&page.url).await {
        Ok(html) => html,
        Err(e) => {
            log::error!("ページ内容の取得に失敗しました: {}", e);
            CONTENT_FALLBACK.to_string()
        }
    };

    {
        let r = inner.borrow();
        if r.epoch != epoch {
            // 閉じられた後の遅延応答。破棄済みのコンテナには触らない
            return;
        }
        if let Some(surface) = r.surface.as_ref() {
            surface.content.set_inner_html(&html);
        }
    }
    // 内容が入ってサイズが変わったので置き直す
    reposition(inner);
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is unavailable"))
}

fn build_surface(inner: &Rc<RefCell<Inner>>, mode: DisplayMode) -> Result<Surface, JsValue> {
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document.body is unavailable"))?;

    let (root, panel) = match mode {
        DisplayMode::Modal => {
            let overlay = document.create_element("div")?;
            overlay.set_class_name("tutorial-widget-overlay");
            let panel = document.create_element("div")?;
            panel.set_class_name("tutorial-widget-modal");
            panel.set_inner_html(SURFACE_BODY);
            overlay.append_child(&panel)?;
            (overlay, panel)
        }
        DisplayMode::Tooltip => {
            let panel = document.create_element("div")?;
            panel.set_class_name("tutorial-widget-modal tutorial-widget-tooltip");
            panel.set_inner_html(SURFACE_BODY);
            (panel.clone(), panel)
        }
    };
    body.append_child(&root)?;

    let content = query(&panel, ".tutorial-widget-content")?;
    let close_button = query(&panel, ".tutorial-widget-close")?;
    let nav_button = query(&panel, "#tutorial-widget-next")?;
    let checkbox = query(&panel, "#tutorial-widget-no-show")?;

    let mut closures = Vec::new();

    // 閉じるボタン
    let weak = Rc::downgrade(inner);
    let on_close = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some(inner) = weak.upgrade() {
            let step = inner.borrow_mut().session.close();
            if step == Step::Close {
                close_widget(&inner);
            }
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    close_button.add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())?;
    closures.push(on_close);

    // つぎへ / おわり
    let weak = Rc::downgrade(inner);
    let on_next = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some(inner) = weak.upgrade() {
            wasm_bindgen_futures::spawn_local(async move {
                let step = inner.borrow_mut().session.advance();
                apply_step(&inner, step).await;
            });
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    nav_button.add_event_listener_with_callback("click", on_next.as_ref().unchecked_ref())?;
    closures.push(on_next);

    // 次回は表示しない
    let weak = Rc::downgrade(inner);
    let on_toggle = Closure::wrap(Box::new(move |event: web_sys::Event| {
        if let Some(inner) = weak.upgrade() {
            if let Some(target) = event.target() {
                if let Ok(input) = target.dyn_into::<HtmlInputElement>() {
                    let r = inner.borrow();
                    r.storage.set_dismissed(&r.storage_key, input.checked());
                }
            }
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    checkbox.add_event_listener_with_callback("change", on_toggle.as_ref().unchecked_ref())?;
    closures.push(on_toggle);

    Ok(Surface {
        root,
        panel,
        content,
        nav_button,
        mode,
        _closures: closures,
    })
}

fn query(panel: &Element, selector: &str) -> Result<Element, JsValue> {
    panel
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(selector))
}

/// ハイライトボックスを作り、ハイライトと同寿命の
/// resize/scrollリスナーを登録する
fn create_highlight(inner: &Rc<RefCell<Inner>>, element_id: &str) {
    let document = match document() {
        Ok(d) => d,
        Err(_) => return,
    };
    let target = match document.get_element_by_id(element_id) {
        Some(target) => target,
        None => {
            log::warn!("ハイライト対象の要素が見つかりません: {}", element_id);
            return;
        }
    };
    let body = match document.body() {
        Some(body) => body,
        None => return,
    };
    let box_el = match document.create_element("div") {
        Ok(el) => el,
        Err(_) => return,
    };
    box_el.set_class_name("tutorial-widget-highlight-box");
    if body.append_child(&box_el).is_err() {
        return;
    }

    let weak = Rc::downgrade(inner);
    let handler = Closure::wrap(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            reposition(&inner);
        }
    }) as Box<dyn FnMut()>);

    if let Some(window) = web_sys::window() {
        window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .ok();
        window
            .add_event_listener_with_callback_and_bool(
                "scroll",
                handler.as_ref().unchecked_ref(),
                true,
            )
            .ok();
    }

    inner.borrow_mut().highlight = Some(Highlight {
        box_el,
        target,
        handler,
    });
    reposition(inner);
}

fn viewport_size(window: &web_sys::Window) -> Size {
    Size {
        width: window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
        height: window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
    }
}

fn client_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect {
        top: rect.top(),
        left: rect.left(),
        width: rect.width(),
        height: rect.height(),
    }
}

/// ハイライトボックスとツールチップを現在のビューポートに合わせて置き直す
fn reposition(inner: &Rc<RefCell<Inner>>) {
    let r = inner.borrow();
    let highlight = match r.highlight.as_ref() {
        Some(h) => h,
        None => return,
    };
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };

    let target_rect = client_rect(&highlight.target);
    let scroll_left = window.page_x_offset().unwrap_or(0.0);
    let scroll_top = window.page_y_offset().unwrap_or(0.0);

    // ハイライトはターゲットに文書座標で重ねる
    let doc_rect = placement::highlight_rect(target_rect, scroll_left, scroll_top);
    if let Some(el) = highlight.box_el.dyn_ref::<HtmlElement>() {
        let style = el.style();
        style.set_property("top", &format!("{}px", doc_rect.top)).ok();
        style
            .set_property("left", &format!("{}px", doc_rect.left))
            .ok();
        style
            .set_property("width", &format!("{}px", doc_rect.width))
            .ok();
        style
            .set_property("height", &format!("{}px", doc_rect.height))
            .ok();
    }

    // ツールチップはビューポート座標で配置する
    let surface = match r.surface.as_ref() {
        Some(s) if s.mode == DisplayMode::Tooltip => s,
        _ => return,
    };
    let tip_rect = client_rect(&surface.panel);
    let place = placement::place_tooltip(
        target_rect,
        Size {
            width: tip_rect.width,
            height: tip_rect.height,
        },
        viewport_size(&window),
    );
    surface.panel.set_class_name(&format!(
        "tutorial-widget-modal tutorial-widget-tooltip {}",
        place.arrow.class_name()
    ));
    if let Some(el) = surface.panel.dyn_ref::<HtmlElement>() {
        let style = el.style();
        style.set_property("top", &format!("{}px", place.top)).ok();
        style
            .set_property("left", &format!("{}px", place.left))
            .ok();
    }
}
