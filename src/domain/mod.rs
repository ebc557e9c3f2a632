// Domain layer - Edit parameters and their translation into engine arguments

pub mod errors;
pub mod model;
pub mod rules;
