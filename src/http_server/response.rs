//! Response bodies for detail routes

use serde::Serialize;
use serde_json::{Map, Value};

/// `{success, data}`
#[derive(Debug, Serialize)]
pub struct SingleResponse<T = Value> {
    pub success: bool,
    pub data: T,
}

impl<T> SingleResponse<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

impl SingleResponse {
    /// `{success: true, data: {}}`
    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

/// `{success, count, data}` for unpaginated lists
#[derive(Debug, Serialize)]
pub struct ListResponse<T = Value> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}
