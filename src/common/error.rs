// src/common/error.rs

#[derive(Debug, thiserror::Error)]
pub enum Dt80Error<E = ()>
where
    E: core::fmt::Debug, // Need Debug for the generic Io error
{
    /// Underlying I/O error from the transport implementation.
    #[error("I/O error: {0:?}")] // Format string requires Debug on E
    Io(E),

    /// Response bytes were not valid UTF-8 text.
    #[error("response bytes are not valid text: {0}")]
    Decode(core::str::Utf8Error),

    /// A command could not be rendered into its wire form.
    #[error("command format error: {0}")]
    CommandFormat(super::command::CommandFormatError),

    /// A `copyd` start-time literal does not match the device grammar.
    #[error("invalid start-time literal")]
    InvalidStartTime,
}

// Allow mapping from the underlying transport error if From is implemented
impl<E: core::fmt::Debug> From<E> for Dt80Error<E> {
    fn from(e: E) -> Self {
        Dt80Error::Io(e)
    }
}

// Note: For the Io(E) variant's #[error("...")] message to work correctly even
// in no_std, the underlying error type `E` must implement `core::fmt::Debug`.
