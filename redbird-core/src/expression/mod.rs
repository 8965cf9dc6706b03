mod binary_op;
mod expression;
mod literal;
mod ordered;
mod unary_op;

pub use binary_op::*;
pub use expression::*;
pub use literal::*;
pub use ordered::*;
pub use unary_op::*;
