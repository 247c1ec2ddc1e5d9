use std::fmt::Display;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum XtreamGrabErrorKind {
    /// Remote unreachable or non-success HTTP status.
    Network,
    /// Malformed JSON or an unrecognized response shape.
    Parse,
    /// Valid request, but no such id exists.
    NotFound,
    /// Caller supplied missing/invalid input; no network call was made.
    Validation,
    /// Local file access failed (config, server store).
    Io,
}

impl Display for XtreamGrabErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Parse => write!(f, "parse"),
            Self::NotFound => write!(f, "not found"),
            Self::Validation => write!(f, "validation"),
            Self::Io => write!(f, "io"),
        }
    }
}

#[derive(Debug)]
pub struct XtreamGrabError {
    pub kind: XtreamGrabErrorKind,
    pub message: String,
}

impl XtreamGrabError {
    pub fn new(kind: XtreamGrabErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl Display for XtreamGrabError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for XtreamGrabError {}

macro_rules! create_xtream_grab_error {
    ($kind:expr, $($arg:tt)*) => {
        $crate::xtream_grab_error::XtreamGrabError::new($kind, format!($($arg)*))
    }
}

macro_rules! create_xtream_grab_error_result {
    ($kind:expr, $($arg:tt)*) => {
        Err($crate::xtream_grab_error::create_xtream_grab_error!($kind, $($arg)*))
    }
}

pub(crate) use create_xtream_grab_error;
pub(crate) use create_xtream_grab_error_result;

#[cfg(test)]
mod tests {
    use super::{XtreamGrabError, XtreamGrabErrorKind};

    #[test]
    fn test_error_display_carries_kind() {
        let err = XtreamGrabError::new(
            XtreamGrabErrorKind::Network,
            String::from("request failed with status 503"),
        );
        assert_eq!(err.to_string(), "network: request failed with status 503");
        assert_eq!(err.kind, XtreamGrabErrorKind::Network);
    }

    #[test]
    fn test_error_macro_formats_message() {
        let result: Result<(), XtreamGrabError> = super::create_xtream_grab_error_result!(
            XtreamGrabErrorKind::NotFound,
            "no series with id {}",
            42
        );
        let err = result.unwrap_err();
        assert_eq!(err.kind, XtreamGrabErrorKind::NotFound);
        assert_eq!(err.message, "no series with id 42");
    }
}
