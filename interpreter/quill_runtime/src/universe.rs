//! The universe: top-level coordinator of the runtime.
//!
//! Owns the object arena, the interning registries, the identifier→object
//! map, the execution-context stack, and the output sink. Everything else
//! holds plain ids into the arena; every dereference re-validates, so a
//! destroyed object turns every outstanding reference into "not found"
//! rather than a dangling pointer.
//!
//! The universe is also the definition parser: `make` consumes a token
//! stream of type declarations and object instantiations, registering the
//! results. Attribute and method bodies are built by the external
//! [`ExpressionMaker`] collaborator.

use crate::stack::ensure_sufficient_stack;
use crate::{Context, ExpressionMaker, Object, Value};
use quill_ir::{
    Definitions, Ident, ObjectId, OutputSink, Reserved, RuntimeResult, Token, Word,
};
use quill_lexer::TokenStream;
use rustc_hash::FxHashMap;
use std::rc::Rc;

pub struct Universe {
    objects: Vec<Option<Object>>,
    definitions: Definitions,
    object_identifiers: FxHashMap<Ident, ObjectId>,
    pub(crate) contexts: Vec<Context>,
    output: OutputSink,
}

impl Universe {
    /// The parentless object every universe starts with.
    pub const NULL_OBJECT_ID: ObjectId = ObjectId::from_raw(0);
    /// The system object, reserved for engine-level dispatch.
    pub const SYSTEM_OBJECT_ID: ObjectId = ObjectId::from_raw(1);
    /// First id handed to user-defined objects.
    pub const USER_OBJECTS_BEGIN_AT: u32 = 2;

    pub fn new() -> Self {
        let mut universe = Universe {
            objects: Vec::new(),
            definitions: Definitions::new(),
            object_identifiers: FxHashMap::default(),
            contexts: Vec::new(),
            output: OutputSink::Stdout,
        };
        let null_object = universe.define_new_object(None);
        let system_object = universe.define_new_object(None);
        debug_assert_eq!(null_object, Universe::NULL_OBJECT_ID);
        debug_assert_eq!(system_object, Universe::SYSTEM_OBJECT_ID);
        // The sentinel context; it is never popped.
        universe.contexts.push(Context {
            self_object: null_object,
            sender: null_object,
            message: None,
            each: None,
        });
        universe
    }

    #[inline]
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    #[inline]
    pub fn definitions_mut(&mut self) -> &mut Definitions {
        &mut self.definitions
    }

    /// A handle to the shared output sink.
    pub fn output(&self) -> OutputSink {
        self.output.clone()
    }

    pub fn set_output(&mut self, output: OutputSink) {
        self.output = output;
    }

    /// Number of live objects in the arena.
    pub fn object_count(&self) -> usize {
        self.objects.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.raw() as usize)?.as_ref()
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.raw() as usize)?.as_mut()
    }

    /// Allocate and register a new object. Ids are assigned in allocation
    /// order and never reused while the universe is alive.
    pub fn define_new_object(&mut self, parent: Option<ObjectId>) -> ObjectId {
        let raw = u32::try_from(self.objects.len())
            .unwrap_or_else(|_| panic!("object arena exceeded {} entries", u32::MAX));
        let id = ObjectId::from_raw(raw);
        self.objects.push(Some(Object::new(id, parent)));
        tracing::debug!(object = raw, parent = ?parent, "defined object");
        id
    }

    /// Remove an object. Its id is never reused; every reference still
    /// holding it resolves to "not found" from here on.
    pub fn destroy_object(&mut self, id: ObjectId) {
        if let Some(slot) = self.objects.get_mut(id.raw() as usize) {
            if slot.take().is_some() {
                tracing::debug!(object = id.raw(), "destroyed object");
            }
        }
    }

    /// Bind a name to an object. Rebinding a name is allowed.
    pub fn assign_object_identifier(&mut self, object: ObjectId, name: &str) {
        let ident = self.definitions.identifiers.intern(name);
        self.assign_object_identifier_id(object, ident);
    }

    pub fn assign_object_identifier_id(&mut self, object: ObjectId, ident: Ident) {
        self.object_identifiers.insert(ident, object);
    }

    pub fn object_for_identifier(&self, ident: Ident) -> Option<ObjectId> {
        self.object_identifiers.get(&ident).copied()
    }

    pub fn identifier_is_assigned_as(&self, ident: Ident, object: ObjectId) -> bool {
        self.object_for_identifier(ident) == Some(object)
    }

    /// The object a name currently denotes, if any.
    pub fn object_named(&self, name: &str) -> Option<ObjectId> {
        let ident = self.definitions.identifiers.find(name)?;
        self.object_for_identifier(ident)
    }

    /// The *effective* parent: the raw link, re-validated. A link to an
    /// object that no longer exists, or that is not (or no longer) a
    /// prototype, counts as no parent at all.
    pub fn parent_of(&self, id: ObjectId) -> Option<ObjectId> {
        let parent = self.object(id)?.parent_id()?;
        let parent_object = self.object(parent)?;
        parent_object.is_prototype().then_some(parent)
    }

    /// Whether `id` has `attribute`, locally or through the parent chain.
    pub fn has_attribute(&self, id: ObjectId, attribute: Ident) -> bool {
        let Some(object) = self.object(id) else {
            return false;
        };
        if object.has_local_attribute(attribute) {
            return true;
        }
        match self.parent_of(id) {
            Some(parent) => self.has_attribute(parent, attribute),
            None => false,
        }
    }

    /// Evaluate `attribute` on `id`, falling back through the parent chain.
    /// A missing attribute (or a dangling object) is `UNDEFINED`.
    pub fn attribute_value(&mut self, id: ObjectId, attribute: Ident) -> RuntimeResult<Value> {
        let local = self
            .object(id)
            .and_then(|object| object.local_attribute(attribute).map(Rc::clone));
        if let Some(body) = local {
            return body.evaluate(self);
        }
        match self.parent_of(id) {
            Some(parent) if self.has_attribute(parent, attribute) => {
                self.attribute_value(parent, attribute)
            }
            _ => Ok(Value::Undefined),
        }
    }

    /// Whether `id` handles `message`, locally or through the parent chain.
    pub fn has_method(&self, id: ObjectId, message: Word) -> bool {
        let Some(object) = self.object(id) else {
            return false;
        };
        if object.has_local_method(message) {
            return true;
        }
        match self.parent_of(id) {
            Some(parent) => self.has_method(parent, message),
            None => false,
        }
    }

    /// Execute the method for `message` on `id`, falling back through the
    /// parent chain. An unresolved method is the `ABSENT` constant, which
    /// callers can tell apart from a method that ran and produced nothing.
    pub fn execute_method(&mut self, id: ObjectId, message: Word) -> RuntimeResult<Value> {
        let local = self
            .object(id)
            .and_then(|object| object.local_method(message).map(Rc::clone));
        if let Some(body) = local {
            let output = self.output.clone();
            return body.execute(self, &output);
        }
        match self.parent_of(id) {
            Some(parent) if self.has_method(parent, message) => {
                self.execute_method(parent, message)
            }
            _ => Ok(Value::absent()),
        }
    }

    /// Send a message value to an object. A value that does not convert to
    /// a message is a silent no-op yielding `UNDEFINED`. Otherwise the
    /// resolved message is bound in a fresh context (self and sender are
    /// inherited from the caller's context) for the duration of the method.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn send(&mut self, object: ObjectId, message: &Value) -> RuntimeResult<Value> {
        let resolved = message.message_conversion(self)?;
        if !resolved.is_defined() {
            return Ok(Value::Undefined);
        }
        let message_id = resolved.message_id();
        let mut scope = self.with_message(message_id);
        ensure_sufficient_stack(|| scope.execute_method(object, message_id))
    }

    /// Run a definition pass over a token stream. `Ok(true)` means the
    /// stream was exhausted; `Ok(false)` means a recoverable syntax error
    /// aborted the pass (the diagnostic is already out). Fatal lexical
    /// errors and quit signals pass through as `Err`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn make(
        &mut self,
        tokens: &mut TokenStream,
        maker: &mut dyn ExpressionMaker,
    ) -> RuntimeResult<bool> {
        while tokens.fetch(&mut self.definitions)? {
            match tokens.token() {
                Token::Reserved(Reserved::Type) | Token::Reserved(Reserved::Class) => {
                    if self.define_type(tokens, maker)?.is_none() {
                        return Ok(false);
                    }
                }
                Token::Reserved(Reserved::Null) => {
                    if self.instantiate(tokens, maker, None)?.is_none() {
                        return Ok(false);
                    }
                }
                Token::Reserved(Reserved::Keyword) => {
                    // Historical form, accepted and skipped.
                }
                Token::Reserved(_) => {
                    tokens.expected(&self.definitions, Token::Reserved(Reserved::Type));
                    return Ok(false);
                }
                Token::Identifier(ident) => match self.object_for_identifier(ident) {
                    None => {
                        tokens.error_message("Require name of defined type");
                        return Ok(false);
                    }
                    Some(type_object) => {
                        let is_prototype = self
                            .object(type_object)
                            .is_some_and(Object::is_prototype);
                        if is_prototype
                            && self.instantiate(tokens, maker, Some(type_object))?.is_none()
                        {
                            return Ok(false);
                        }
                    }
                },
                _ => {
                    tokens.expect_general(
                        &self.definitions,
                        "Need a type declaration or object instantiation",
                    );
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// `type <name> based on (<prototype> | null) <body>`.
    fn define_type(
        &mut self,
        tokens: &mut TokenStream,
        maker: &mut dyn ExpressionMaker,
    ) -> RuntimeResult<Option<ObjectId>> {
        if !tokens.fetch(&mut self.definitions)? {
            tokens.expect_general(&self.definitions, "name of new type");
            tokens.stop_looking();
            return Ok(None);
        }
        let Token::Identifier(name) = tokens.token() else {
            tokens.expect_general(&self.definitions, "name of new type");
            tokens.stop_looking();
            return Ok(None);
        };
        let object = self.define_new_object(None);
        let Some(defined) = self.object_mut(object) else {
            unreachable!("object just allocated");
        };
        defined.set_prototype(true);
        self.assign_object_identifier_id(object, name);

        if !tokens.insist_on(&mut self.definitions, Token::Reserved(Reserved::Based))? {
            return Ok(None);
        }
        if !tokens.insist_on(&mut self.definitions, Token::Reserved(Reserved::On))? {
            return Ok(None);
        }
        if !tokens.fetch(&mut self.definitions)? {
            tokens.expect_general(&self.definitions, "name of a previously defined type");
            tokens.stop_looking();
            return Ok(None);
        }
        match tokens.token() {
            Token::Identifier(parent_name) => {
                let Some(parent) = self.object_for_identifier(parent_name) else {
                    tokens
                        .expect_general(&self.definitions, "name of a previously defined type");
                    tokens.stop_looking();
                    return Ok(None);
                };
                if !self.object(parent).is_some_and(Object::is_prototype) {
                    tokens.expect_general(
                        &self.definitions,
                        "name of a previously defined type, not the name of an instance",
                    );
                    tokens.stop_looking();
                    return Ok(None);
                }
                if let Some(defined) = self.object_mut(object) {
                    defined.set_parent_id(Some(parent));
                }
            }
            Token::Reserved(Reserved::Null) => {
                // Parentless type.
            }
            _ => {
                tokens.expect_general(&self.definitions, "name of a previously defined type");
                tokens.stop_looking();
                return Ok(None);
            }
        }
        self.declare_object(tokens, maker, object)
    }

    /// `<name> <body>` - a new instance, optionally based on a prototype.
    fn instantiate(
        &mut self,
        tokens: &mut TokenStream,
        maker: &mut dyn ExpressionMaker,
        parent: Option<ObjectId>,
    ) -> RuntimeResult<Option<ObjectId>> {
        if !tokens.fetch(&mut self.definitions)? {
            tokens.expect_general(&self.definitions, "name of new object");
            tokens.stop_looking();
            return Ok(None);
        }
        let Token::Identifier(name) = tokens.token() else {
            tokens.expect_general(&self.definitions, "name of new object");
            tokens.stop_looking();
            return Ok(None);
        };
        let object = self.define_new_object(parent);
        self.assign_object_identifier_id(object, name);
        self.declare_object(tokens, maker, object)
    }

    /// The body of a definition: `attribute : <expression>` pairs, then
    /// after the `methods` keyword `'message' : <statement>` pairs, closed
    /// by `end`.
    fn declare_object(
        &mut self,
        tokens: &mut TokenStream,
        maker: &mut dyn ExpressionMaker,
        object: ObjectId,
    ) -> RuntimeResult<Option<ObjectId>> {
        let mut in_methods = false;
        while tokens.fetch(&mut self.definitions)? {
            match tokens.token() {
                Token::Reserved(Reserved::End) => return Ok(Some(object)),
                Token::Reserved(Reserved::Methods) if !in_methods => {
                    in_methods = true;
                }
                Token::Identifier(attribute) if !in_methods => {
                    if !tokens.insist_on(&mut self.definitions, Token::Punctuation(':'))? {
                        return Ok(None);
                    }
                    let Some(body) = maker.make_expr(tokens, self)? else {
                        return Ok(None);
                    };
                    let Some(defined) = self.object_mut(object) else {
                        unreachable!("defining object vanished");
                    };
                    defined.set_attribute(attribute, body);
                }
                Token::Message(message) if in_methods => {
                    if !tokens.insist_on(&mut self.definitions, Token::Punctuation(':'))? {
                        return Ok(None);
                    }
                    let Some(body) = maker.make_statement(tokens, self)? else {
                        return Ok(None);
                    };
                    let Some(defined) = self.object_mut(object) else {
                        unreachable!("defining object vanished");
                    };
                    defined.set_method(message, body);
                }
                _ => {
                    let wanted = if in_methods {
                        "message literal"
                    } else {
                        "attribute identifier"
                    };
                    tokens.expect_general(&self.definitions, wanted);
                    tokens.stop_looking();
                    return Ok(None);
                }
            }
        }
        // Stream ran out before `end`.
        tokens.expected(&self.definitions, Token::Reserved(Reserved::End));
        tokens.stop_looking();
        Ok(None)
    }
}

impl Default for Universe {
    fn default() -> Self {
        Universe::new()
    }
}
