pub mod icon;
pub mod layout;

pub use icon::{LayoutStrategy, MarkerIcon, build_marker_icon};
pub use layout::{CENTER_GLYPH, ICON_BOX, MarkerLayout, RingIcon, layout_ring_icons, ring_capacity};
