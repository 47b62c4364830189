//! Test selectors
//!
//! A selector describes *what* to run: a whole class, a method by name, or a
//! method by name and parameter types. Building one never runs anything.

mod builder;

pub use builder::{
    for_class, for_classes, for_method, for_method_with_parameter_types, ParameterTypes,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a registered test class
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

/// Name of a test method inside a class
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodName(String);

/// Name of a declared parameter type
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

macro_rules! name_type {
    ($ty:ident) => {
        impl $ty {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub(crate) fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }

        impl From<String> for $ty {
            fn from(name: String) -> Self {
                Self(name)
            }
        }

        impl From<&$ty> for $ty {
            fn from(name: &$ty) -> Self {
                name.clone()
            }
        }
    };
}

name_type!(ClassName);
name_type!(MethodName);
name_type!(TypeName);

impl TypeName {
    /// Type name of `T` as reported by the compiler
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    /// Last path segment, e.g. `String` for `alloc::string::String`
    pub fn simple_name(&self) -> &str {
        let base = self.0.split('<').next().unwrap_or(&self.0);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Whether the name carries a path or generic arguments
    pub fn is_qualified(&self) -> bool {
        self.0.contains("::") || self.0.contains('<')
    }

    /// Same type, or a bare name equal to the other's last path segment
    pub fn matches(&self, wanted: &TypeName) -> bool {
        self == wanted || (!wanted.is_qualified() && self.simple_name() == wanted.0)
    }
}

/// Method name plus declared parameter types
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: MethodName,
    pub parameter_types: Vec<TypeName>,
}

impl MethodSignature {
    pub fn new(name: impl Into<MethodName>, parameter_types: Vec<TypeName>) -> Self {
        Self {
            name: name.into(),
            parameter_types,
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self
            .parameter_types
            .iter()
            .map(TypeName::simple_name)
            .collect();
        write!(f, "{}({})", self.name, params.join(", "))
    }
}

/// What the engine should run
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    Class {
        class: ClassName,
    },
    Method {
        class: ClassName,
        method: MethodName,
    },
    MethodWithParameterTypes {
        class: ClassName,
        method: MethodName,
        parameter_types: Vec<TypeName>,
    },
}

impl Selector {
    pub fn class(&self) -> &ClassName {
        match self {
            Selector::Class { class }
            | Selector::Method { class, .. }
            | Selector::MethodWithParameterTypes { class, .. } => class,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Class { class } => write!(f, "class:{class}"),
            Selector::Method { class, method } => write!(f, "method:{class}#{method}"),
            Selector::MethodWithParameterTypes {
                class,
                method,
                parameter_types,
            } => {
                let params: Vec<&str> = parameter_types.iter().map(TypeName::as_str).collect();
                write!(f, "method:{class}#{method}({})", params.join(", "))
            }
        }
    }
}
