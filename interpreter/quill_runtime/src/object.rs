//! One node of the prototype graph.
//!
//! An object holds its own attributes and methods plus an optional parent
//! id. The parent link is data, not a pointer: whether it actually
//! contributes anything is decided at lookup time by the universe, which
//! re-validates that the referent still exists and is still a prototype.
//! Chain-walking lookup therefore lives on [`Universe`](crate::Universe);
//! this type only answers questions about its own maps.

use crate::{ExpressionPtr, StatementPtr, Value, ValueExpression};
use quill_ir::{Ident, ObjectId, Word};
use rustc_hash::FxHashMap;
use std::rc::Rc;

pub struct Object {
    id: ObjectId,
    parent: Option<ObjectId>,
    prototype: bool,
    attributes: FxHashMap<Ident, ExpressionPtr>,
    methods: FxHashMap<Word, StatementPtr>,
}

impl Object {
    pub(crate) fn new(id: ObjectId, parent: Option<ObjectId>) -> Self {
        Object {
            id,
            parent,
            prototype: false,
            attributes: FxHashMap::default(),
            methods: FxHashMap::default(),
        }
    }

    /// The object's own id in the arena.
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The raw parent link, unvalidated.
    #[inline]
    pub fn parent_id(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn set_parent_id(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    /// Whether this object may serve as a parent.
    #[inline]
    pub fn is_prototype(&self) -> bool {
        self.prototype
    }

    pub fn set_prototype(&mut self, prototype: bool) {
        self.prototype = prototype;
    }

    pub fn has_local_attribute(&self, attribute: Ident) -> bool {
        self.attributes.contains_key(&attribute)
    }

    pub fn local_attribute(&self, attribute: Ident) -> Option<&ExpressionPtr> {
        self.attributes.get(&attribute)
    }

    pub fn set_attribute(&mut self, attribute: Ident, body: ExpressionPtr) {
        self.attributes.insert(attribute, body);
    }

    /// Store a plain value as an attribute body (the write-through path of
    /// attribute assignment).
    pub fn set_attribute_value(&mut self, attribute: Ident, value: Value) {
        self.attributes
            .insert(attribute, Rc::new(ValueExpression::new(value)));
    }

    pub fn has_local_method(&self, message: Word) -> bool {
        self.methods.contains_key(&message)
    }

    pub fn local_method(&self, message: Word) -> Option<&StatementPtr> {
        self.methods.get(&message)
    }

    pub fn set_method(&mut self, message: Word, body: StatementPtr) {
        self.methods.insert(message, body);
    }
}
