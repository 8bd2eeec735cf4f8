pub mod geo;
pub mod search;
pub mod stats;

pub use geo::GeoService;
pub use search::SearchService;
pub use stats::StatsService;
