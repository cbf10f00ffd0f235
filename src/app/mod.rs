pub mod context;
pub mod geolocate;
pub mod status;

pub use context::{AppContext, display_shelters, popup_content};
pub use geolocate::GeoError;
pub use status::{LogStatus, StatusLevel, StatusSink};
