//! Domain layer for Pokedex Guard
//!
//! Architecture: Domain Model - Pure types for name validation and Pokédex entries
//! - Validation outcomes are values, never exceptions
//! - Independent of configuration files, HTTP, or terminal output
//! - Expresses the ubiquitous language of sanitization and Pokémon data

pub mod pokemon;
pub mod validation;

// Re-export main domain types for convenience
pub use pokemon::*;
pub use validation::*;
