mod client_utils;
pub mod engine;
mod errors;
mod insight_utils;
mod media_utils;
mod opentelemetry;
mod study_api;
pub mod study_sdk_test;
pub mod studyhall;
mod types;
mod types_ext;

pub use errors::*;
pub use insight_utils::*;
pub use media_utils::*;
pub use study_api::{StudyApi, TaskApi};
pub use types::*;
