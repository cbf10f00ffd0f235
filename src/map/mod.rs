pub mod adapter;

pub use adapter::{LatLng, MapAdapter, RecordingMap};
