//! The binding store: `Environment` is an ordered name -> [`Binding`] map,
//! grounded on `rhai::scope::Scope`'s shadow-by-newest lookup (but without
//! its parallel name/value array optimization, since Basalt environments
//! are small) resolved against `basalt.py`'s `self.variables` dict of
//! `{value, mutable}` records.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{BasaltError, BasaltResult};
use crate::position::Position;
use crate::value::Value;

/// A named slot: its current value and whether it may be written again.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub mutable: bool,
}

impl Binding {
    #[must_use]
    pub fn new(value: Value, mutable: bool) -> Self {
        Self { value, mutable }
    }

    #[must_use]
    pub fn immutable(value: Value) -> Self {
        Self::new(value, false)
    }
}

/// Lexical scope: ordered mapping from name to [`Binding`], plus the
/// function, class, and instance tables (spec.md §2's "Environment").
///
/// Kept as a single `Rc<RefCell<..>>`-free struct: loops share the
/// *caller's* `Environment` by passing a `&mut Environment` straight
/// through (spec.md §5's `share_for_loop`), while function/method calls
/// build a brand-new one (`fork_for_call`) and only borrow the shared
/// function/class/instance tables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: IndexMap<String, Binding>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh environment for a function/method call: no variables are
    /// inherited from the caller (spec.md §5: "Function calls pass a
    /// fresh environment populated with parameters; they do not see
    /// enclosing lexical variables").
    #[must_use]
    pub fn fork_for_call() -> Self {
        Self::new()
    }

    pub fn declare(&mut self, name: impl Into<String>, value: Value, mutable: bool) {
        self.vars.insert(name.into(), Binding::new(value, mutable));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.vars.get(name)
    }

    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.vars.get_mut(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn require(&self, name: &str, pos: Position) -> BasaltResult<&Binding> {
        self.vars
            .get(name)
            .ok_or_else(|| BasaltError::UndefinedVariable(name.to_string(), pos))
    }

    pub fn require_mut(&mut self, name: &str, pos: Position) -> BasaltResult<&mut Binding> {
        self.vars
            .get_mut(name)
            .ok_or_else(|| BasaltError::UndefinedVariable(name.to_string(), pos))
    }

    /// Assignment: rejects both an absent name and an immutable binding.
    pub fn assign(&mut self, name: &str, value: Value, pos: Position) -> BasaltResult<()> {
        let binding = self.require_mut(name, pos)?;
        if !binding.mutable {
            return Err(BasaltError::ImmutableWrite(name.to_string(), pos));
        }
        binding.value = value;
        Ok(())
    }

    pub fn set_mutable(&mut self, name: &str, mutable: bool, pos: Position) -> BasaltResult<()> {
        self.require_mut(name, pos)?.mutable = mutable;
        Ok(())
    }

    /// Merge `other` into `self`. `overwrite = true` lets `other`'s
    /// bindings replace existing ones (used when seeding a fresh scope);
    /// `overwrite = false` keeps `self`'s existing bindings on conflict
    /// (the caller-wins import merge rule, SPEC_FULL §F).
    pub fn merge_from(&mut self, other: Environment, overwrite: bool) {
        for (name, binding) in other.vars {
            if overwrite || !self.vars.contains_key(&name) {
                self.vars.insert(name, binding);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Binding)> {
        self.vars.iter()
    }
}

/// A named, reference-counted function/class table shared between a caller
/// and the nested interpreters it spawns for calls and loop bodies
/// (spec.md §5: "the function table is shared").
pub type SharedTable<T> = Rc<std::cell::RefCell<IndexMap<String, T>>>;
