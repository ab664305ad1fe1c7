use crate::error::SmallError;
use crate::tuple::{Tuple, TupleDesc};

/// Common contract every executor operator implements: open before any
/// other call, then alternate `has_next`/`next` until exhausted, then
/// close. `next` after exhaustion fails with `NoSuchElement` rather than
/// returning an empty option, matching the rest of this crate's error
/// discipline.
pub trait DbIterator {
    fn open(&mut self) -> Result<(), SmallError>;
    fn has_next(&mut self) -> Result<bool, SmallError>;
    fn next(&mut self) -> Result<Tuple, SmallError>;
    fn rewind(&mut self) -> Result<(), SmallError>;
    fn close(&mut self);
    fn tuple_desc(&self) -> &TupleDesc;
}
