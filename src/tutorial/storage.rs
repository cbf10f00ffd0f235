//! 消去フラグの永続化。セッションを跨いで生存するキー値ストレージとの境界

use std::cell::RefCell;
use std::collections::HashMap;

/// 既定の保存キー
pub const DEFAULT_STORAGE_KEY: &str = "tutorial-widget-dismissed";

/// フラグが立っているときに保存される値
const DISMISSED_VALUE: &str = "true";

pub trait DismissalStore {
    /// 「次回は表示しない」が保存済みか
    fn is_dismissed(&self, key: &str) -> bool;

    /// フラグを保存または除去する
    fn set_dismissed(&self, key: &str, dismissed: bool);
}

/// テスト・ネイティブ用のインメモリ実装
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl DismissalStore for MemoryStore {
    fn is_dismissed(&self, key: &str) -> bool {
        self.values.borrow().get(key).map(String::as_str) == Some(DISMISSED_VALUE)
    }

    fn set_dismissed(&self, key: &str, dismissed: bool) {
        if dismissed {
            self.values
                .borrow_mut()
                .insert(key.to_string(), DISMISSED_VALUE.to_string());
        } else {
            self.values.borrow_mut().remove(key);
        }
    }
}

/// ブラウザのlocalStorage実装。
/// ストレージが使えない環境では何もしない(フラグなし扱い)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

#[cfg(target_arch = "wasm32")]
impl DismissalStore for LocalStorage {
    fn is_dismissed(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.get_item(key).ok().flatten())
            .map(|v| v == DISMISSED_VALUE)
            .unwrap_or(false)
    }

    fn set_dismissed(&self, key: &str, dismissed: bool) {
        if let Some(storage) = Self::storage() {
            if dismissed {
                storage.set_item(key, DISMISSED_VALUE).ok();
            } else {
                storage.remove_item(key).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::default();
        assert!(!store.is_dismissed(DEFAULT_STORAGE_KEY));

        store.set_dismissed(DEFAULT_STORAGE_KEY, true);
        assert!(store.is_dismissed(DEFAULT_STORAGE_KEY));

        store.set_dismissed(DEFAULT_STORAGE_KEY, false);
        assert!(!store.is_dismissed(DEFAULT_STORAGE_KEY));
    }

    #[test]
    fn keys_are_independent() {
        let store = MemoryStore::default();
        store.set_dismissed("app-a", true);
        assert!(store.is_dismissed("app-a"));
        assert!(!store.is_dismissed("app-b"));
    }
}
