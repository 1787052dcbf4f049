pub mod expression;

pub use expression::{Apply, Expression, Function, Let, Primitive};
