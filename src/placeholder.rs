//! # Placeholder & Result Normalization
//!
//! Lets void-returning and value-returning steps compose in one chain. Every
//! step result is normalized into a [`Payload`]: unit-like results become
//! [`Payload::Placeholder`], everything else is boxed as a value. A step that
//! declares no parameter ([`Arity::Nullary`]) never sees the payload; a step
//! declaring `()` or [`Placeholder`] as its parameter accepts a placeholder.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use crate::error::{ChainError, Result};

/// Zero-information stand-in for "no value"
///
/// Holds no data, so any two placeholders are interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placeholder;

/// Declared parameter count of a step, recorded once when the step is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Step takes no data argument; the carried payload is dropped for it
    Nullary,
    /// Step takes the carried payload as its single data argument
    Unary,
}

impl Arity {
    pub fn accepts_input(self) -> bool {
        matches!(self, Arity::Unary)
    }
}

/// Value carried from one step to the next
pub enum Payload {
    Placeholder,
    Value {
        value: Box<dyn Any + Send>,
        type_name: &'static str,
    },
}

/// Whether `T` is normalized to a placeholder when a step returns it
pub fn is_placeholder_type<T: 'static>() -> bool {
    let id = TypeId::of::<T>();
    id == TypeId::of::<()>() || id == TypeId::of::<Placeholder>()
}

impl Payload {
    /// Normalize a step's return value
    pub fn from_output<T: Send + 'static>(output: T) -> Self {
        if is_placeholder_type::<T>() {
            return Payload::Placeholder;
        }

        Payload::Value {
            value: Box::new(output),
            type_name: type_name::<T>(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Payload::Placeholder)
    }

    /// Name of the carried type, `"placeholder"` when there is none
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Placeholder => "placeholder",
            Payload::Value { type_name, .. } => type_name,
        }
    }

    /// Move the carried value out as `T`
    pub fn take<T: 'static>(self) -> Result<T> {
        match self {
            Payload::Value { value, type_name } => value
                .downcast::<T>()
                .map(|boxed| *boxed)
                .map_err(|_| ChainError::type_mismatch::<T>(type_name)),
            Payload::Placeholder => {
                let unit: Box<dyn Any> = if TypeId::of::<T>() == TypeId::of::<Placeholder>() {
                    Box::new(Placeholder)
                } else {
                    Box::new(())
                };
                unit.downcast::<T>()
                    .map(|boxed| *boxed)
                    .map_err(|_| ChainError::type_mismatch::<T>("placeholder"))
            }
        }
    }

    /// Borrow the carried value as `T`, leaving the payload intact
    pub fn peek<T: 'static>(&self) -> Result<&T> {
        match self {
            Payload::Value { value, type_name } => (**value)
                .downcast_ref::<T>()
                .ok_or_else(|| ChainError::type_mismatch::<T>(type_name)),
            Payload::Placeholder => {
                let unit: &'static dyn Any = &();
                let placeholder: &'static dyn Any = &Placeholder;
                unit.downcast_ref::<T>()
                    .or_else(|| placeholder.downcast_ref::<T>())
                    .ok_or_else(|| ChainError::type_mismatch::<T>("placeholder"))
            }
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Placeholder
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Placeholder => write!(f, "Payload::Placeholder"),
            Payload::Value { type_name, .. } => write!(f, "Payload::Value<{type_name}>"),
        }
    }
}
