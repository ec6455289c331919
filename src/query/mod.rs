pub mod engine;
pub mod preferences;
pub mod recommend;
pub mod types;

pub use engine::search;
pub use preferences::parse_preferences;
pub use recommend::{
    recommend, recommend_with_weights, Explanation, Feature, FeatureMatch, FeatureWeights,
    Preferences, Recommendation,
};
pub use types::{parse_distance_limit, SearchCriteria, SortKey};
