pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod markup;
pub mod record;

pub fn get_generator_types() -> Vec<String> {
    vec!["xlsx".to_string(), "xml".to_string()]
}
