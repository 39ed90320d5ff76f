// Domain layer - Core editor types and rules

pub mod errors;
pub mod model;
pub mod rules;
