//! Selector construction and input validation

use tracing::debug;

use super::{ClassName, MethodName, Selector, TypeName};
use crate::error::{KitError, KitResult};

const PARAMETER_TYPES_NULL: &str = "methodParameterTypes must not be null";

/// Parameter types as handed over by the caller
///
/// `None` stands for "nothing was passed". The two shapes are kept apart
/// because a missing sequence and a single missing type fail differently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterTypes {
    Single(Option<TypeName>),
    Sequence(Option<Vec<TypeName>>),
}

impl ParameterTypes {
    fn into_validated(self) -> KitResult<Vec<TypeName>> {
        let types = match self {
            ParameterTypes::Sequence(None) => {
                return Err(KitError::null_reference(
                    "methodParameterTypes sequence is null",
                ))
            }
            ParameterTypes::Single(None) => {
                return Err(KitError::invalid_argument(PARAMETER_TYPES_NULL))
            }
            ParameterTypes::Single(Some(single)) => vec![single],
            ParameterTypes::Sequence(Some(types)) => types,
        };

        if types.is_empty() {
            return Err(KitError::invalid_argument(
                "methodParameterTypes must not be empty",
            ));
        }
        if let Some(position) = types.iter().position(TypeName::is_blank) {
            return Err(KitError::invalid_argument(format!(
                "methodParameterTypes must not contain a blank type name (position {position})"
            )));
        }
        Ok(types)
    }
}

impl From<TypeName> for ParameterTypes {
    fn from(single: TypeName) -> Self {
        ParameterTypes::Single(Some(single))
    }
}

impl From<&str> for ParameterTypes {
    fn from(single: &str) -> Self {
        ParameterTypes::Single(Some(single.into()))
    }
}

impl From<Option<TypeName>> for ParameterTypes {
    fn from(single: Option<TypeName>) -> Self {
        ParameterTypes::Single(single)
    }
}

impl From<Vec<TypeName>> for ParameterTypes {
    fn from(types: Vec<TypeName>) -> Self {
        ParameterTypes::Sequence(Some(types))
    }
}

impl From<&[TypeName]> for ParameterTypes {
    fn from(types: &[TypeName]) -> Self {
        ParameterTypes::Sequence(Some(types.to_vec()))
    }
}

impl<const N: usize> From<[TypeName; N]> for ParameterTypes {
    fn from(types: [TypeName; N]) -> Self {
        ParameterTypes::Sequence(Some(types.to_vec()))
    }
}

impl From<Option<Vec<TypeName>>> for ParameterTypes {
    fn from(types: Option<Vec<TypeName>>) -> Self {
        ParameterTypes::Sequence(types)
    }
}

fn validated_class(class: ClassName) -> KitResult<ClassName> {
    if class.is_blank() {
        return Err(KitError::invalid_argument("class must not be null or blank"));
    }
    Ok(class)
}

fn validated_method(method: MethodName) -> KitResult<MethodName> {
    if method.is_blank() {
        return Err(KitError::invalid_argument(
            "methodName must not be null or blank",
        ));
    }
    Ok(method)
}

/// Select every test of one class
pub fn for_class(class: impl Into<ClassName>) -> KitResult<Selector> {
    let class = validated_class(class.into())?;
    Ok(Selector::Class { class })
}

/// Select every test of each class, keeping the given order
pub fn for_classes<I, C>(classes: I) -> KitResult<Vec<Selector>>
where
    I: IntoIterator<Item = C>,
    C: Into<ClassName>,
{
    let selectors = classes
        .into_iter()
        .map(for_class)
        .collect::<KitResult<Vec<_>>>()?;
    debug!("Built {} class selectors", selectors.len());
    Ok(selectors)
}

/// Select a method by name; whether it exists is decided at resolution
pub fn for_method(
    class: impl Into<ClassName>,
    method: impl Into<MethodName>,
) -> KitResult<Selector> {
    Ok(Selector::Method {
        class: validated_class(class.into())?,
        method: validated_method(method.into())?,
    })
}

/// Select a method by name and exact parameter types
pub fn for_method_with_parameter_types(
    class: impl Into<ClassName>,
    method: impl Into<MethodName>,
    parameter_types: impl Into<ParameterTypes>,
) -> KitResult<Selector> {
    let class = validated_class(class.into())?;
    let method = validated_method(method.into())?;
    let parameter_types = parameter_types.into().into_validated()?;

    Ok(Selector::MethodWithParameterTypes {
        class,
        method,
        parameter_types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_class() {
        let selector = for_class("DummyClass").unwrap();
        assert_eq!(
            selector,
            Selector::Class {
                class: "DummyClass".into()
            }
        );
    }

    #[test]
    fn test_for_class_rejects_blank() {
        assert!(matches!(
            for_class("  "),
            Err(KitError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_for_classes_preserves_order() {
        let selectors = for_classes(["B", "A", "C"]).unwrap();
        let names: Vec<&str> = selectors.iter().map(|s| s.class().as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_for_classes_rejects_blank_element() {
        let err = for_classes(["A", ""]).unwrap_err();
        assert!(matches!(err, KitError::InvalidArgument(_)));
    }

    #[test]
    fn test_for_classes_empty() {
        let selectors = for_classes(Vec::<ClassName>::new()).unwrap();
        assert!(selectors.is_empty());
    }

    #[test]
    fn test_for_method_rejects_blank_method() {
        assert!(matches!(
            for_method("DummyClass", ""),
            Err(KitError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_single_type_and_sequence_are_equivalent() {
        let single = for_method_with_parameter_types("C", "single", TypeName::of::<String>());
        let sequence =
            for_method_with_parameter_types("C", "single", vec![TypeName::of::<String>()]);
        assert_eq!(single.unwrap(), sequence.unwrap());
    }

    #[test]
    fn test_missing_sequence_is_null_reference() {
        let err = for_method_with_parameter_types("C", "single", None::<Vec<TypeName>>)
            .unwrap_err();
        assert!(matches!(err, KitError::NullReference(_)));
    }

    #[test]
    fn test_missing_single_type_is_invalid_argument() {
        let err = for_method_with_parameter_types("C", "single", None::<TypeName>).unwrap_err();
        assert_eq!(
            err,
            KitError::InvalidArgument("methodParameterTypes must not be null".to_string())
        );
    }

    #[test]
    fn test_empty_sequence_is_invalid_argument() {
        let err = for_method_with_parameter_types("C", "single", Vec::<TypeName>::new())
            .unwrap_err();
        assert!(matches!(err, KitError::InvalidArgument(_)));
    }

    #[test]
    fn test_blank_type_is_invalid_argument() {
        let err = for_method_with_parameter_types("C", "single", vec![TypeName::new("")])
            .unwrap_err();
        assert!(err.to_string().contains("position 0"));
    }
}
