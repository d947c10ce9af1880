//! Value Module - What the heap holds
//!
//! Two fixed-size value kinds sit next to the attribute-set container:
//! boxed integers, and attribute-set values that point at a sealed
//! [`Bindings`] block. Both are two words, header included.

pub mod attrs;

pub use attrs::{Attr, Bindings, BindingsView};

use crate::error::Result;
use crate::heap::{Heap, ObjRef, Word};
use crate::object::Tag;

/// A decoded heap value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Attrs(Bindings),
}

impl Value {
    /// Name of the value's type, as an evaluator would report it
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Attrs(_) => "set",
        }
    }
}

impl Heap {
    /// Allocate a boxed integer
    pub fn alloc_int(&mut self, n: i64) -> Result<ObjRef> {
        let obj = self.alloc(Tag::Int, 0, 2)?;
        self.block_mut(obj)[1] = n as Word;
        Ok(obj)
    }

    /// Allocate an attribute-set value over `bindings`
    ///
    /// # Panics
    ///
    /// Panics if `bindings` is not a live container.
    #[track_caller]
    pub fn alloc_attrs(&mut self, bindings: Bindings) -> Result<ObjRef> {
        assert!(
            Bindings::from_ref(self, bindings.obj()).is_some(),
            "{:?} is not a live attribute set",
            bindings.obj()
        );
        let obj = self.alloc(Tag::Attrs, 0, 2)?;
        self.block_mut(obj)[1] = bindings.obj().to_word();
        Ok(obj)
    }

    /// Decode the value at `obj`, `None` if it is not a live value
    ///
    /// Containers themselves are not values; they are reached through an
    /// `Attrs` object.
    pub fn value(&self, obj: ObjRef) -> Option<Value> {
        let header = self.try_header(obj)?;
        let word = self.block(obj)[1];
        match header.tag() {
            Tag::Int => Some(Value::Int(word as i64)),
            Tag::Attrs => ObjRef::from_word(word)
                .and_then(|target| Bindings::from_ref(self, target))
                .map(Value::Attrs),
            Tag::Bindings | Tag::Forward => None,
        }
    }
}
