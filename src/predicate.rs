use std::fmt;

use crate::field::Field;
use crate::tuple::Tuple;

/// The six comparison operators a `Predicate` can test a field against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEq,
    LessThan,
    LessThanOrEq,
}

/// A single-field comparison against a constant, as used by a filter
/// operator. Comparisons across mismatched field types never match,
/// since `Field`'s `PartialOrd` returns `None` for them.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub field_index: usize,
    pub op: Op,
    pub field: Field,
}

impl Predicate {
    pub fn new(field_index: usize, op: Op, field: Field) -> Self {
        Self {
            field_index,
            op,
            field,
        }
    }

    pub fn matches(&self, tuple: &Tuple) -> bool {
        let value = tuple.get_field(self.field_index);
        match self.op {
            Op::Equals => value == &self.field,
            Op::NotEquals => value != &self.field,
            Op::GreaterThan => matches!(value.partial_cmp(&self.field), Some(std::cmp::Ordering::Greater)),
            Op::GreaterThanOrEq => matches!(
                value.partial_cmp(&self.field),
                Some(std::cmp::Ordering::Greater) | Some(std::cmp::Ordering::Equal)
            ),
            Op::LessThan => matches!(value.partial_cmp(&self.field), Some(std::cmp::Ordering::Less)),
            Op::LessThanOrEq => matches!(
                value.partial_cmp(&self.field),
                Some(std::cmp::Ordering::Less) | Some(std::cmp::Ordering::Equal)
            ),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "field_index: {}, op: {:?}, field: {:?}", self.field_index, self.op, self.field)
    }
}
