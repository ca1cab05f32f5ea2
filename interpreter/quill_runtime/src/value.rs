//! Runtime values and the conversion protocol.
//!
//! A value is a closed tagged union over nine variants. Every variant
//! supports equality, cloning (independent copies), display, and
//! truthiness; each supports only part of the six-way conversion surface.
//! An unsupported or failed conversion yields `Value::Undefined` - "nothing
//! there" is a normal, inspectable runtime value, never an error.
//!
//! Conversions take the universe because attribute references are live:
//! an `Attribute` value re-resolves its `(object, attribute)` pair against
//! the arena at the moment of conversion, evaluating the stored body. That
//! evaluation is also why most conversions return [`RuntimeResult`] - a
//! body may carry the quit signal - but a conversion as such never fails
//! with an error.

use crate::Universe;
use quill_ir::{Ident, ObjectId, Reserved, RuntimeResult, Word};

/// A runtime value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// The absence of a value. The only falsy variant besides `FALSE`.
    Undefined,
    Boolean(bool),
    /// An interned vocabulary word used for dispatch.
    Message(Word),
    Numeric(i64),
    /// A reserved keyword constant (`TRUE`, `FALSE`, `UNDEFINED`, `ABSENT`).
    Reserved(Reserved),
    String(String),
    Identifier(Ident),
    /// A live reference to an object, by arena id.
    Object(ObjectId),
    /// A live reference to an object's attribute, re-resolved on use.
    Attribute { object: ObjectId, attribute: Ident },
}

impl Value {
    /// The reserved constant distinguishing "no such message" from a
    /// message that ran and produced nothing.
    pub fn absent() -> Value {
        Value::Reserved(Reserved::Absent)
    }

    #[inline]
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined)
    }

    /// Structural equality; kept as a named operation because the language
    /// exposes it directly.
    #[inline]
    pub fn same_value_as(&self, other: &Value) -> bool {
        self == other
    }

    /// Truthiness. Defaults to true; `UNDEFINED`, `FALSE`, and `ABSENT` are
    /// false, booleans are themselves, and an attribute reference is as
    /// true as the value it dereferences to.
    pub fn truthiness(&self, universe: &mut Universe) -> RuntimeResult<bool> {
        Ok(match self {
            Value::Undefined => false,
            Value::Boolean(value) => *value,
            Value::Reserved(word) => !matches!(
                word,
                Reserved::False | Reserved::Undefined | Reserved::Absent
            ),
            Value::Attribute { .. } => self.dereference(universe)?.truthiness(universe)?,
            _ => true,
        })
    }

    /// Resolve an attribute reference against the current object table.
    fn dereference(&self, universe: &mut Universe) -> RuntimeResult<Value> {
        match *self {
            Value::Attribute { object, attribute } => universe.attribute_value(object, attribute),
            _ => unreachable!("dereference is only defined for attribute references"),
        }
    }

    /// Convert to a message. Strings and reserved constants convert only
    /// when their text is already a known vocabulary word.
    pub fn message_conversion(&self, universe: &mut Universe) -> RuntimeResult<Value> {
        Ok(match self {
            Value::Message(_) => self.clone(),
            Value::Reserved(word) => universe
                .definitions()
                .vocabulary
                .find(word.text())
                .map_or(Value::Undefined, Value::Message),
            Value::String(text) => universe
                .definitions()
                .vocabulary
                .find(text)
                .map_or(Value::Undefined, Value::Message),
            Value::Attribute { .. } => self.dereference(universe)?.message_conversion(universe)?,
            _ => Value::Undefined,
        })
    }

    /// Convert to a string.
    pub fn string_conversion(&self, universe: &mut Universe) -> RuntimeResult<Value> {
        Ok(match self {
            Value::Boolean(value) => {
                let word = if *value { Reserved::True } else { Reserved::False };
                Value::String(word.text().to_owned())
            }
            Value::Message(word) => {
                Value::String(universe.definitions().vocabulary.lookup(*word).to_owned())
            }
            Value::Numeric(value) => Value::String(value.to_string()),
            Value::Reserved(word) => Value::String(word.text().to_owned()),
            Value::String(_) => self.clone(),
            Value::Identifier(id) => {
                Value::String(universe.definitions().identifiers.lookup(*id).to_owned())
            }
            Value::Attribute { .. } => self.dereference(universe)?.string_conversion(universe)?,
            Value::Undefined | Value::Object(_) => Value::Undefined,
        })
    }

    /// Convert to a number. Strings parse a leading optionally-signed
    /// integer; anything else that is not already numeric is undefined.
    pub fn numeric_conversion(&self, universe: &mut Universe) -> RuntimeResult<Value> {
        Ok(match self {
            Value::Boolean(value) => Value::Numeric(i64::from(*value)),
            Value::Numeric(_) => self.clone(),
            Value::String(text) => {
                parse_leading_integer(text).map_or(Value::Undefined, Value::Numeric)
            }
            Value::Attribute { .. } => self.dereference(universe)?.numeric_conversion(universe)?,
            _ => Value::Undefined,
        })
    }

    /// Convert to an identifier. An attribute reference yields its own
    /// attribute identifier without dereferencing.
    pub fn identifier_conversion(&self) -> Value {
        match *self {
            Value::Identifier(_) => self.clone(),
            Value::Attribute { attribute, .. } => Value::Identifier(attribute),
            _ => Value::Undefined,
        }
    }

    /// Convert to an object reference. An identifier converts when it
    /// currently names an object.
    pub fn object_conversion(&self, universe: &mut Universe) -> RuntimeResult<Value> {
        Ok(match *self {
            Value::Object(_) => self.clone(),
            Value::Identifier(id) => universe
                .object_for_identifier(id)
                .map_or(Value::Undefined, Value::Object),
            Value::Attribute { .. } => self.dereference(universe)?.object_conversion(universe)?,
            _ => Value::Undefined,
        })
    }

    /// Convert to an attribute reference. An identifier converts when the
    /// current `self` has an attribute of that name in scope.
    pub fn attribute_conversion(&self, universe: &Universe) -> Value {
        match *self {
            Value::Attribute { .. } => self.clone(),
            Value::Identifier(id) => {
                let owner = universe.current_context().self_object;
                if universe.has_attribute(owner, id) {
                    Value::Attribute {
                        object: owner,
                        attribute: id,
                    }
                } else {
                    Value::Undefined
                }
            }
            _ => Value::Undefined,
        }
    }

    /// Assignment. Writes through on an attribute reference and returns the
    /// stored value; on every other variant it is a no-op returning the
    /// receiving value unchanged.
    pub fn assign(&self, universe: &mut Universe, new_value: Value) -> Value {
        match *self {
            Value::Attribute { object, attribute } => match universe.object_mut(object) {
                Some(owner) => {
                    owner.set_attribute_value(attribute, new_value.clone());
                    new_value
                }
                None => Value::Undefined,
            },
            _ => self.clone(),
        }
    }

    /// # Panics
    /// Panics unless the value is a `Message` (contract violation).
    pub fn message_id(&self) -> Word {
        match *self {
            Value::Message(word) => word,
            _ => panic!("value is not a defined message"),
        }
    }

    /// # Panics
    /// Panics unless the value is a `Numeric` (contract violation).
    pub fn number(&self) -> i64 {
        match *self {
            Value::Numeric(value) => value,
            _ => panic!("value is not a number"),
        }
    }

    /// # Panics
    /// Panics unless the value is a `String` (contract violation).
    pub fn string_slice(&self) -> &str {
        match self {
            Value::String(text) => text,
            _ => panic!("value is not a string"),
        }
    }

    /// # Panics
    /// Panics unless the value is an `Object` reference (contract violation).
    pub fn object_id(&self) -> ObjectId {
        match *self {
            Value::Object(id) => id,
            _ => panic!("value is not an object reference"),
        }
    }

    /// # Panics
    /// Panics unless the value carries an identifier (contract violation).
    pub fn identifier(&self) -> Ident {
        match *self {
            Value::Identifier(id) => id,
            Value::Attribute { attribute, .. } => attribute,
            _ => panic!("value does not have an identifier"),
        }
    }

    /// Render for game output.
    pub fn display(&self, universe: &Universe) -> String {
        match self {
            Value::Undefined => Reserved::Undefined.text().to_owned(),
            Value::Boolean(value) => {
                let word = if *value { Reserved::True } else { Reserved::False };
                word.text().to_owned()
            }
            Value::Message(word) => universe.definitions().vocabulary.lookup(*word).to_owned(),
            Value::Numeric(value) => value.to_string(),
            Value::Reserved(word) => word.text().to_owned(),
            Value::String(text) => text.clone(),
            Value::Identifier(id) => universe.definitions().identifiers.lookup(*id).to_owned(),
            Value::Object(id) => format!("<object {}>", id.raw()),
            Value::Attribute { attribute, .. } => universe
                .definitions()
                .identifiers
                .lookup(*attribute)
                .to_owned(),
        }
    }
}

/// Leading optionally-signed integer of a string, `istream`-style: skip
/// leading whitespace, then sign and digits; anything after the digit run
/// is ignored. No digits (or an overflowing run) is a failed conversion.
fn parse_leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let negative = trimmed.starts_with('-');
    let body = if negative { &trimmed[1..] } else { trimmed };
    let digit_count = body.chars().take_while(char::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }
    let end = if negative { digit_count + 1 } else { digit_count };
    trimmed[..end].parse().ok()
}
