use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SmallError;
use crate::heap_file::HeapFile;

/// Table-name and table-id directory. Maps the ids pages carry back to
/// the open file that stores them.
#[derive(Default)]
pub struct Catalog {
    tables: HashMap<i32, Arc<HeapFile>>,
    names: HashMap<String, i32>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            names: HashMap::new(),
        }
    }

    pub fn add_table(&mut self, name: &str, file: Arc<HeapFile>) {
        self.names.insert(name.to_string(), file.table_id());
        self.tables.insert(file.table_id(), file);
    }

    pub fn get_file(&self, table_id: i32) -> Result<Arc<HeapFile>, SmallError> {
        self.tables
            .get(&table_id)
            .cloned()
            .ok_or(SmallError::NoSuchElement)
    }

    pub fn table_id(&self, name: &str) -> Result<i32, SmallError> {
        self.names.get(name).copied().ok_or(SmallError::NoSuchElement)
    }

    pub fn get_file_by_name(&self, name: &str) -> Result<Arc<HeapFile>, SmallError> {
        self.get_file(self.table_id(name)?)
    }
}
