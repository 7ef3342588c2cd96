//! `import "path"` — running another source file and folding its
//! definitions into the importing scope.
//!
//! Grounded on `rhai`'s `module/mod.rs` + `resolvers/file.rs` module
//! resolution shape, resolved against `basalt.py:1189-1205`'s `import`
//! keyword. `basalt.py` merges with a plain dict `|=`, which means the
//! *imported* file's bindings silently win any name collision. SPEC_FULL §F
//! reverses that: callers always win, so a script's own top-level
//! definitions can never be shadowed by something it happens to pull in.
//!
//! This module only knows how to merge two already-built scopes; actually
//! lexing and running the imported file is `Interpreter::run_importing`'s
//! job (in `src/interpreter.rs`), since only the interpreter knows how to
//! execute a token stream.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::class::{Class, Instance};
use crate::function::Function;
use crate::scope::Environment;

/// Everything an imported file's run produces: its top-level variables,
/// functions, classes, and any instances it happened to construct at
/// import time.
#[derive(Debug, Default)]
pub struct ImportResult {
    pub vars: Environment,
    pub functions: IndexMap<String, Function>,
    pub classes: IndexMap<String, Rc<RefCell<Class>>>,
    pub instances: IndexMap<String, Instance>,
}

/// Fold an [`ImportResult`] into the caller's tables, caller-wins on every
/// name collision (SPEC_FULL §F).
pub fn merge_into(
    caller_vars: &mut Environment,
    caller_functions: &mut IndexMap<String, Function>,
    caller_classes: &mut IndexMap<String, Rc<RefCell<Class>>>,
    caller_instances: &mut IndexMap<String, Instance>,
    imported: ImportResult,
) {
    caller_vars.merge_from(imported.vars, false);
    merge_table(caller_functions, imported.functions);
    merge_table(caller_classes, imported.classes);
    merge_table(caller_instances, imported.instances);
}

fn merge_table<T>(caller: &mut IndexMap<String, T>, imported: IndexMap<String, T>) {
    for (name, value) in imported {
        caller.entry(name).or_insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn caller_bindings_win_on_collision() {
        let mut caller_vars = Environment::new();
        caller_vars.declare("x", Value::Int(1), true);
        let mut caller_fns = IndexMap::new();
        let mut caller_classes = IndexMap::new();
        let mut caller_instances = IndexMap::new();

        let mut imported_vars = Environment::new();
        imported_vars.declare("x", Value::Int(99), true);
        imported_vars.declare("y", Value::Int(2), true);
        let imported = ImportResult {
            vars: imported_vars,
            functions: IndexMap::new(),
            classes: IndexMap::new(),
            instances: IndexMap::new(),
        };

        merge_into(
            &mut caller_vars,
            &mut caller_fns,
            &mut caller_classes,
            &mut caller_instances,
            imported,
        );

        assert_eq!(caller_vars.get("x").unwrap().value, Value::Int(1));
        assert_eq!(caller_vars.get("y").unwrap().value, Value::Int(2));
    }
}
