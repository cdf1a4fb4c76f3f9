pub mod generation;
pub mod responder;
