use thiserror::Error;

/// Errors that can occur when accessing the value held by an [`ErasedBox`][crate::ErasedBox].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The caller asked for the value as one type but the handle holds a value of another type.
    ///
    /// The handle is left unchanged when this error is returned.
    #[error("type mismatch: requested '{requested}' but the handle holds '{bound}'")]
    TypeMismatch {
        /// Name of the type the caller asked for.
        requested: &'static str,

        /// Name of the type the handle holds a value of.
        bound: &'static str,
    },
}

/// A specialized `Result` type for handle operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
