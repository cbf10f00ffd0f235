pub mod placement;
pub mod state;
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod widget;

pub use placement::{Arrow, Rect, Size, TooltipPlacement, highlight_rect, place_tooltip};
pub use state::{DisplayMode, PageView, Phase, Step, TutorialConfig, TutorialPage, TutorialSession};
pub use storage::{DEFAULT_STORAGE_KEY, DismissalStore, MemoryStore};
