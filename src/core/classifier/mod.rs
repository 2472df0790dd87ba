// Core classifier module - provider contract, fallback chain and response normalization.

pub mod classifier_models;
pub mod classifier_service;
pub mod verdict_parser;

pub use classifier_models::*;
pub use classifier_service::*;
pub use verdict_parser::{parse_verdict, parse_verdict_lenient};
