//! ステータスメッセージの表示先。
//! 呼び出し側は区分とメッセージを渡すだけで、表示方法は実装に任せる

/// メッセージの区分。CSSクラス名に対応する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Loading,
    Success,
    Error,
}

impl StatusLevel {
    pub fn class_name(self) -> &'static str {
        match self {
            StatusLevel::Loading => "loading",
            StatusLevel::Success => "success",
            StatusLevel::Error => "error",
        }
    }
}

pub trait StatusSink {
    fn show(&mut self, level: StatusLevel, message: &str);
}

/// ログに流すだけの実装。ネイティブデモとテスト用
#[derive(Debug, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn show(&mut self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Error => log::error!("{}", message),
            _ => log::info!("{}", message),
        }
    }
}

/// ステータス欄(#statusなど)へ書き込む実装。
/// successのメッセージは3秒後に自動で消える
#[cfg(target_arch = "wasm32")]
pub struct DomStatus {
    element_id: String,
}

#[cfg(target_arch = "wasm32")]
impl DomStatus {
    pub fn new(element_id: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
        }
    }

    fn element(&self) -> Option<web_sys::Element> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&self.element_id))
    }
}

#[cfg(target_arch = "wasm32")]
impl StatusSink for DomStatus {
    fn show(&mut self, level: StatusLevel, message: &str) {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::prelude::*;

        let element = match self.element() {
            Some(el) => el,
            None => {
                log::warn!("ステータス表示先が見つかりません: {}", self.element_id);
                return;
            }
        };
        element.set_text_content(Some(message));
        element.set_class_name(&format!("status {}", level.class_name()));

        if level == StatusLevel::Success {
            // 3秒後にクリアする
            let element_id = self.element_id.clone();
            let clear = Closure::wrap(Box::new(move || {
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id(&element_id))
                {
                    el.set_text_content(Some(""));
                    el.set_class_name("status");
                }
            }) as Box<dyn FnMut()>);
            if let Some(window) = web_sys::window() {
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        clear.as_ref().unchecked_ref(),
                        3000,
                    )
                    .ok();
            }
            clear.forget();
        }
    }
}
