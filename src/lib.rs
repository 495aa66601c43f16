//! Wordwise core: adaptive review scheduling and the request governor that
//! guards calls to the generative content service.

pub mod config;
pub mod content;
pub mod governor;
pub mod review;

pub use config::AppConfig;
pub use governor::{GovernorFailure, RequestGovernor};
