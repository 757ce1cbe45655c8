//! Synthetic data generation

mod generator;
mod vocabulary;

pub use generator::SyntheticDataGenerator;
