pub mod config;
pub mod engine;
pub mod error;
pub mod factors;
pub mod invariant;
pub mod matrix;
pub mod mode;
pub mod observer;
pub mod validation;
pub mod webavalia;

pub use config::*;
pub use engine::{
    compute_qass, compute_qass_multi_component, compute_qass_multi_component_observed,
    compute_qass_observed, QassResult,
};
pub use error::ScoringError;
pub use mode::{AggregateRatings, Bijunction, CombinationMode, RatingCombiner};
pub use observer::{NoopObserver, ScoringObserver};
pub use validation::{validate_qass_params, validate_webavalia_params};
pub use webavalia::{compute_webavalia, WebavaliaResult};
