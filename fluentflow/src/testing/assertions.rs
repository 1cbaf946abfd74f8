//! Test assertions for pipeline errors.

use crate::errors::FlowError;

/// Asserts that `result` failed with a step error of type `E` and returns it.
pub fn assert_step_failed_with<T, E>(result: &Result<T, FlowError>) -> &E
where
    T: std::fmt::Debug,
    E: std::error::Error + 'static,
{
    match result {
        Err(err) => err.downcast_step_error::<E>().unwrap_or_else(|| {
            panic!(
                "Expected step error of type {}, got: {err:?}",
                std::any::type_name::<E>()
            )
        }),
        Ok(value) => panic!("Expected step failure, got Ok({value:?})"),
    }
}

/// Asserts that the error is a type mismatch.
pub fn assert_type_mismatch(err: &FlowError) {
    assert!(
        matches!(err, FlowError::TypeMismatch(_)),
        "Expected TypeMismatch, got: {err:?}"
    );
}

/// Asserts that the error is a type compatibility error.
pub fn assert_type_compatibility(err: &FlowError) {
    assert!(
        matches!(err, FlowError::TypeCompatibility(_)),
        "Expected TypeCompatibility, got: {err:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TypeTag;
    use crate::errors::TypeMismatchError;
    use std::num::ParseIntError;

    #[test]
    fn test_assert_step_failed_with() {
        let result: Result<i32, FlowError> = "x".parse::<i32>().map_err(FlowError::step);
        let err: &ParseIntError = assert_step_failed_with(&result);
        assert_eq!(err.to_string(), "invalid digit found in string");
    }

    #[test]
    #[should_panic(expected = "Expected step failure")]
    fn test_assert_step_failed_with_ok() {
        let result: Result<i32, FlowError> = Ok(1);
        let _: &ParseIntError = assert_step_failed_with(&result);
    }

    #[test]
    fn test_assert_type_mismatch() {
        let err: FlowError =
            TypeMismatchError::new("s", TypeTag::of::<u8>(), TypeTag::of::<u16>()).into();
        assert_type_mismatch(&err);
    }
}
