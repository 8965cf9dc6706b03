use crate::Expression;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    ASC,
    DESC,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ordered {
    pub order: Order,
    pub expression: Expression,
}
