use std::fmt;
use std::sync::Arc;

use crate::field::{Field, Type};
use crate::page_id::RecordId;

/// An ordered sequence of (type, optional name) pairs describing the shape
/// of a tuple. Equality is defined positionally on types only: field names
/// are descriptive metadata and are ignored for comparison purposes
/// (following the contract in the data model section of the spec this
/// crate implements).
#[derive(Debug, Clone)]
pub struct TupleDesc {
    types: Vec<Type>,
    names: Vec<Option<String>>,
}

impl TupleDesc {
    pub fn new(fields: Vec<(Type, Option<String>)>) -> Self {
        let mut types = Vec::with_capacity(fields.len());
        let mut names = Vec::with_capacity(fields.len());
        for (t, n) in fields {
            types.push(t);
            names.push(n);
        }
        Self { types, names }
    }

    /// A descriptor of `width` `Int` fields, named `"{prefix}-{i}"`.
    pub fn simple_ints(width: usize, prefix: &str) -> Self {
        let fields = (0..width)
            .map(|i| (Type::Int, Some(format!("{}-{}", prefix, i))))
            .collect();
        TupleDesc::new(fields)
    }

    pub fn num_fields(&self) -> usize {
        self.types.len()
    }

    pub fn field_type(&self, i: usize) -> Type {
        self.types[i]
    }

    pub fn field_name(&self, i: usize) -> Option<&str> {
        self.names[i].as_deref()
    }

    /// Sum of the per-type fixed widths of every field.
    pub fn byte_size(&self) -> usize {
        self.types.iter().map(|t| t.len()).sum()
    }

    /// Index of the first field whose name matches, if any.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
    }

    /// Concatenates the field lists of two descriptors. Field-name
    /// collisions are permitted.
    pub fn merge(a: &TupleDesc, b: &TupleDesc) -> TupleDesc {
        let mut types = a.types.clone();
        types.extend(b.types.clone());
        let mut names = a.names.clone();
        names.extend(b.names.clone());
        TupleDesc { types, names }
    }
}

impl PartialEq for TupleDesc {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
    }
}
impl Eq for TupleDesc {}

impl fmt::Display for TupleDesc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .types
            .iter()
            .zip(&self.names)
            .map(|(t, n)| format!("{:?}({})", t, n.as_deref().unwrap_or("?")))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// A tuple: a descriptor plus one assignable field per position. Carries
/// the `RecordId` of its storage slot once it has been read from, or
/// inserted into, a page.
#[derive(Debug, Clone)]
pub struct Tuple {
    desc: Arc<TupleDesc>,
    fields: Vec<Field>,
    record_id: Option<RecordId>,
}

impl Tuple {
    pub fn new(desc: Arc<TupleDesc>, fields: Vec<Field>) -> Self {
        assert_eq!(desc.num_fields(), fields.len());
        Self {
            desc,
            fields,
            record_id: None,
        }
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    pub fn get_field(&self, i: usize) -> &Field {
        &self.fields[i]
    }

    pub fn set_field(&mut self, i: usize, field: Field) {
        self.fields[i] = field;
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    pub fn set_record_id(&mut self, record_id: RecordId) {
        self.record_id = Some(record_id);
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.desc.byte_size());
        for f in &self.fields {
            f.serialize(&mut out);
        }
        out
    }

    pub fn deserialize(desc: Arc<TupleDesc>, bytes: &[u8]) -> Self {
        let mut fields = Vec::with_capacity(desc.num_fields());
        let mut start = 0;
        for i in 0..desc.num_fields() {
            let ty = desc.field_type(i);
            let end = start + ty.len();
            fields.push(Field::deserialize(ty, &bytes[start..end]));
            start = end;
        }
        Tuple {
            desc,
            fields,
            record_id: None,
        }
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.fields.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}
