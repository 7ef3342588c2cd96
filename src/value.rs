//! The `Value` tagged union (spec.md §3), grounded on `rhai::dynamic::Dynamic`'s
//! tag-dispatch shape but specialized to the fixed set of kinds Basalt needs
//! (no plugin/custom types, since this CORE has no FFI).

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::class::Instance;
use crate::function::Function;

/// A Basalt runtime value.
///
/// `List` and `Dict` are reference-counted + interior-mutable so that a
/// binding's in-place mutation (`list.add(xs, 1)`) is visible through every
/// alias of the same value, matching spec.md §4.2: "Dictionary and list
/// values are mutated in place through their bindings."
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Rc<RefCell<Vec<Value>>>),
    Dict(Rc<RefCell<IndexMap<Value, Value>>>),
    Function(Rc<Function>),
    Class(Rc<RefCell<crate::class::Class>>),
    Instance(Rc<RefCell<Instance>>),
}

impl Value {
    #[must_use]
    pub fn list(items: Vec<Value>) -> Self {
        Self::List(Rc::new(RefCell::new(items)))
    }

    #[must_use]
    pub fn dict(entries: IndexMap<Value, Value>) -> Self {
        Self::Dict(Rc::new(RefCell::new(entries)))
    }

    /// Human-readable type name, used in type-mismatch diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Function(_) => "function",
            Self::Class(_) => "class",
            Self::Instance(_) => "instance",
        }
    }

    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(l) => !l.borrow().is_empty(),
            Self::Dict(d) => !d.borrow().is_empty(),
            Self::Function(_) | Self::Class(_) | Self::Instance(_) => true,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Rendering used by `print`/`println`/`printf`'s `[?]` interpolation
/// (spec.md §4.5): lists render `[a b c]`, dicts render `{"k": v ...}`,
/// strings render without quotes at top level but quoted when nested.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(items) => {
                write!(f, "[")?;
                let items = items.borrow();
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write_nested(f, v)?;
                }
                write!(f, "]")
            }
            Self::Dict(entries) => {
                write!(f, "{{")?;
                let entries = entries.borrow();
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "\"{k}\": ")?;
                    write_nested(f, v)?;
                }
                write!(f, "}}")
            }
            Self::Function(_) => write!(f, "<function>"),
            Self::Class(_) => write!(f, "<class>"),
            Self::Instance(inst) => write!(f, "<instance of {}>", inst.borrow().class_name),
        }
    }
}

fn write_nested(f: &mut fmt::Formatter<'_>, v: &Value) -> fmt::Result {
    if let Value::Str(s) = v {
        write!(f, "\"{s}\"")
    } else {
        write!(f, "{v}")
    }
}

/// Comparison rules from spec.md §4.4: numeric comparisons use numeric
/// ordering, string comparisons use lexicographic order, cross-type `==`
/// is false.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => *a as f64 == *b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => *a.borrow() == *b.borrow(),
            (Self::Dict(a), Self::Dict(b)) => *a.borrow() == *b.borrow(),
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

/// Numeric ordering for ints/floats, lexicographic for strings. Used by
/// `<`, `<=`, `>`, `>=` in the condition evaluator. Other pairings have no
/// defined order and are treated as equal (the condition evaluator rejects
/// them before comparing).
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Str(a), Self::Str(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Only strings and integers are hashed meaningfully (spec.md §3:
/// "equality and hashing must be defined for all value kinds that may be
/// used as keys (primarily strings and integers in practice)"). Other
/// kinds still implement `Hash` so they type-check as dict keys, but
/// collapse to a fixed bucket; `Eq` remains authoritative for lookups.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Null => 0u8.hash(state),
            Self::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Self::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            Self::Float(x) => {
                3u8.hash(state);
                x.to_bits().hash(state);
            }
            Self::Str(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Self::List(_) => 5u8.hash(state),
            Self::Dict(_) => 6u8.hash(state),
            Self::Function(_) => 7u8.hash(state),
            Self::Class(_) => 8u8.hash(state),
            Self::Instance(_) => 9u8.hash(state),
        }
    }
}
