pub mod posters;
pub mod providers;
pub mod recommendations;

pub use posters::PosterService;
pub use recommendations::{RecommendationService, DEFAULT_NEIGHBOR_COUNT};
