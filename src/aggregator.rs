use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SmallError;
use crate::field::{Field, Type};
use crate::tuple::{Tuple, TupleDesc};

/// The five supported aggregate operators. `StringAggregator` accepts
/// only `Count`; the other four are numeric-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    Min,
    Max,
    Sum,
    Avg,
    Count,
}

/// Accepts tuples one at a time via `merge_tuple_into_group`, then
/// yields the grouped (or ungrouped) aggregate results.
pub trait Aggregator {
    fn merge_tuple_into_group(&mut self, tuple: &Tuple);
    fn iterator(&self) -> Vec<Tuple>;
}

const NO_GROUPING: i64 = -1;

struct GroupState {
    count: i64,
    sum: i64,
    min: i64,
    max: i64,
}

impl GroupState {
    fn new(first: i64) -> Self {
        Self {
            count: 1,
            sum: first,
            min: first,
            max: first,
        }
    }

    fn merge(&mut self, value: i64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn result(&self, op: AggOp) -> i64 {
        match op {
            AggOp::Min => self.min,
            AggOp::Max => self.max,
            AggOp::Sum => self.sum,
            AggOp::Avg => self.sum / self.count,
            AggOp::Count => self.count,
        }
    }
}

/// Aggregates an `Int` field, optionally grouped by another field of any
/// type (grouping is keyed by the field's `Field::Int` value or, for a
/// `Varchar` group field, is not supported — grouping keys in this crate
/// are integers only).
pub struct IntegerAggregator {
    group_field: Option<usize>,
    agg_field: usize,
    op: AggOp,
    groups: HashMap<i64, GroupState>,
    desc: Arc<TupleDesc>,
}

impl IntegerAggregator {
    pub fn new(group_field: Option<usize>, agg_field: usize, op: AggOp) -> Self {
        let desc = match group_field {
            Some(_) => TupleDesc::new(vec![
                (Type::Int, Some("group".to_string())),
                (Type::Int, Some("aggregate".to_string())),
            ]),
            None => TupleDesc::new(vec![(Type::Int, Some("aggregate".to_string()))]),
        };
        Self {
            group_field,
            agg_field,
            op,
            groups: HashMap::new(),
            desc: Arc::new(desc),
        }
    }

    fn group_key(&self, tuple: &Tuple) -> i64 {
        match self.group_field {
            Some(i) => tuple.get_field(i).as_int().unwrap_or(NO_GROUPING),
            None => NO_GROUPING,
        }
    }
}

impl Aggregator for IntegerAggregator {
    fn merge_tuple_into_group(&mut self, tuple: &Tuple) {
        let key = self.group_key(tuple);
        let value = tuple
            .get_field(self.agg_field)
            .as_int()
            .expect("aggregate field must be an Int");

        self.groups
            .entry(key)
            .and_modify(|g| g.merge(value))
            .or_insert_with(|| GroupState::new(value));
    }

    fn iterator(&self) -> Vec<Tuple> {
        self.groups
            .iter()
            .map(|(key, state)| {
                let result = state.result(self.op);
                let fields = match self.group_field {
                    Some(_) => vec![Field::Int(*key), Field::Int(result)],
                    None => vec![Field::Int(result)],
                };
                Tuple::new(self.desc.clone(), fields)
            })
            .collect()
    }
}

/// Aggregates a `Varchar` field. Only `Count` is meaningful over strings;
/// any other operator fails at construction.
pub struct StringAggregator {
    group_field: Option<usize>,
    agg_field: usize,
    groups: HashMap<i64, i64>,
    desc: Arc<TupleDesc>,
}

impl StringAggregator {
    pub fn new(group_field: Option<usize>, agg_field: usize, op: AggOp) -> Result<Self, SmallError> {
        if op != AggOp::Count {
            return Err(SmallError::DbException(
                "string fields only support the COUNT aggregate".to_string(),
            ));
        }
        let desc = match group_field {
            Some(_) => TupleDesc::new(vec![
                (Type::Int, Some("group".to_string())),
                (Type::Int, Some("aggregate".to_string())),
            ]),
            None => TupleDesc::new(vec![(Type::Int, Some("aggregate".to_string()))]),
        };
        Ok(Self {
            group_field,
            agg_field,
            groups: HashMap::new(),
            desc: Arc::new(desc),
        })
    }

    fn group_key(&self, tuple: &Tuple) -> i64 {
        match self.group_field {
            Some(i) => match tuple.get_field(i) {
                Field::Int(v) => *v,
                Field::Varchar(s) => hash_as_key(s),
            },
            None => NO_GROUPING,
        }
    }
}

/// Strings group by a stable hash of their contents, since the group
/// key type here is a bare `i64`. Collisions would merge distinct
/// groups; acceptable for the narrow COUNT-only use this aggregator
/// supports.
fn hash_as_key(s: &str) -> i64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish() as i64
}

impl Aggregator for StringAggregator {
    fn merge_tuple_into_group(&mut self, tuple: &Tuple) {
        let key = self.group_key(tuple);
        let _ = tuple.get_field(self.agg_field);
        *self.groups.entry(key).or_insert(0) += 1;
    }

    fn iterator(&self) -> Vec<Tuple> {
        self.groups
            .iter()
            .map(|(key, count)| {
                let fields = match self.group_field {
                    Some(_) => vec![Field::Int(*key), Field::Int(*count)],
                    None => vec![Field::Int(*count)],
                };
                Tuple::new(self.desc.clone(), fields)
            })
            .collect()
    }
}
