pub mod arrangement;
pub mod evaluator;
pub mod ga_optimizer;
pub mod operators;
pub mod population;
