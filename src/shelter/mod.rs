pub mod disaster;
pub mod geojson;
pub mod master;

pub use disaster::{DisasterType, disaster_types};
pub use geojson::{ShelterCollection, ShelterFeature};
pub use master::{City, MasterData, Prefecture, find_city, is_valid_city_code, prefecture_code};
