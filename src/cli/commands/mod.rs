pub mod config;
pub mod eda;
pub mod health;
pub mod input;
pub mod predict;
pub mod validate;

pub use input::FeatureArgs;
