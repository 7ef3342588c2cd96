//! `dict.get`/`dict.set`/`dict.delete` (`basalt.py:1086-1112`).

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{BasaltError, BasaltResult};
use crate::position::Position;
use crate::value::Value;

type Dict = Rc<RefCell<IndexMap<Value, Value>>>;

/// `dict get(d, key) -> out`.
pub fn get(dict: &Dict, key: &Value, pos: Position) -> BasaltResult<Value> {
    dict.borrow()
        .get(key)
        .cloned()
        .ok_or_else(|| BasaltError::IndexOutOfBounds {
            index: key.to_string(),
            len: dict.borrow().len(),
            pos,
        })
}

/// `dict set(d, key, value)`: insert or overwrite.
pub fn set(dict: &Dict, key: Value, value: Value) {
    dict.borrow_mut().insert(key, value);
}

/// `dict delete(d, key)`.
pub fn delete(dict: &Dict, key: &Value, pos: Position) -> BasaltResult<()> {
    let removed = dict.borrow_mut().shift_remove(key);
    if removed.is_none() {
        return Err(BasaltError::IndexOutOfBounds {
            index: key.to_string(),
            len: dict.borrow().len(),
            pos,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new(1)
    }

    #[test]
    fn set_then_get_roundtrips() {
        let dict: Dict = Rc::new(RefCell::new(IndexMap::new()));
        set(&dict, Value::Str("k".into()), Value::Int(5));
        assert_eq!(get(&dict, &Value::Str("k".into()), pos()).unwrap(), Value::Int(5));
    }

    #[test]
    fn get_missing_key_is_an_error() {
        let dict: Dict = Rc::new(RefCell::new(IndexMap::new()));
        assert!(matches!(
            get(&dict, &Value::Str("missing".into()), pos()),
            Err(BasaltError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn delete_removes_entry() {
        let dict: Dict = Rc::new(RefCell::new(IndexMap::new()));
        set(&dict, Value::Int(1), Value::Bool(true));
        delete(&dict, &Value::Int(1), pos()).unwrap();
        assert!(dict.borrow().is_empty());
    }
}
