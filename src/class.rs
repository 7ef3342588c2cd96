//! Classes, methods, and instances.
//!
//! `rhai` has no class construct (scripts get functions and modules only),
//! so this module is grounded directly on `basalt.py`'s `skip_block_class`
//! and the `@class`/`@class_variable` modifiers (§F of SPEC_FULL.md), using
//! a single instance table instead of the original's separate
//! `classes`/`class_variables` maps.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::position::Position;
use crate::scope::Binding;
use crate::token::Token;

/// A class definition: its methods (bodies as flat token slices), its
/// constructor parameter names, and the shared `self` state all instances
/// are seeded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Method name -> method body tokens (params are the first line of the
    /// body's metadata, stored alongside in `method_params`).
    pub methods: IndexMap<String, Vec<Token>>,
    /// Method name -> parameter names.
    pub method_params: IndexMap<String, Vec<String>>,
    /// Constructor (`init`) parameter names.
    pub params: Vec<String>,
    /// Fields installed via `self set(name, value)`, shared by every
    /// instance descended from this class (mirrors `basalt.py`'s
    /// class-level `self` dict, populated once and copied forward).
    pub self_fields: IndexMap<String, Binding>,
    pub defined_line: Position,
}

impl Class {
    /// `init` must exist; called right after the method table is built.
    #[must_use]
    pub fn has_init(&self) -> bool {
        self.methods.contains_key("init")
    }

    /// One-shot removal of the initializer after the first successful
    /// construction, per spec.md §3's instance invariant.
    pub fn remove_init(&mut self) {
        self.methods.shift_remove("init");
        self.method_params.shift_remove("init");
    }
}

/// A concrete realization of a [`Class`], produced by
/// `@class(Name) new(...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class_name: String,
    pub class: Rc<RefCell<Class>>,
    /// The instance's own field map, seeded from `init` and mutated
    /// in-place afterwards by `self set(...)` calls made from later
    /// method invocations.
    pub self_fields: Rc<RefCell<IndexMap<String, Binding>>>,
}

impl Instance {
    #[must_use]
    pub fn new(class_name: String, class: Rc<RefCell<Class>>, fields: IndexMap<String, Binding>) -> Self {
        Self {
            class_name,
            class,
            self_fields: Rc::new(RefCell::new(fields)),
        }
    }
}
