use std::fmt;


/// Outcome code of a cloud call.
///
/// Only `Ok` counts as success; every other value is a failure whose variant
/// says what went wrong. The HTTP-derived codes follow the cloud API's error
/// table, the remaining ones are raised on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudStatus {
    Ok,
    InternalError,
    ServiceTemporarilyUnavailable,
    ServiceOverCapacity,
    InvalidUrl,
    MissingBody,
    InvalidBody,
    MissingCredentials,
    InvalidCredentials,
    ExpiredCredentials,
    AccessDenied,
    TooManyRequests,
    ResourceNotFound,
    MethodNotAllowed,
    NotAcceptable,
    RequestTimeOut,
    LengthRequired,
    PreconditionFailed,
    RequestEntityTooLarge,
    RequestUriTooLong,
    SessionFailed,
    SessionExpired,
    CguNotAccepted,
    ForbiddenAccess,
    NotEligible,
    NotFound,
    ListFolderFailed,
    ResponseMalformed,
    NetworkError,
    BadParameter,
    NotAFile,
    MissingToken,
    InvalidToken,
    FileTooBig,
    NoSpaceLeft,
    Unknown,
}

impl CloudStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, CloudStatus::Ok)
    }

    /// Map an HTTP status code returned by the cloud API.
    pub fn from_http(code: u16) -> Self {
        match code {
            200..=299 => CloudStatus::Ok,
            400 => CloudStatus::InvalidUrl,
            401 => CloudStatus::InvalidCredentials,
            403 => CloudStatus::ForbiddenAccess,
            404 => CloudStatus::NotFound,
            405 => CloudStatus::MethodNotAllowed,
            406 => CloudStatus::NotAcceptable,
            408 => CloudStatus::RequestTimeOut,
            410 => CloudStatus::ExpiredCredentials,
            411 => CloudStatus::LengthRequired,
            412 => CloudStatus::PreconditionFailed,
            413 => CloudStatus::RequestEntityTooLarge,
            414 => CloudStatus::RequestUriTooLong,
            429 => CloudStatus::TooManyRequests,
            503 => CloudStatus::ServiceTemporarilyUnavailable,
            500..=599 => CloudStatus::InternalError,
            _ => CloudStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudStatus::Ok => "OK",
            CloudStatus::InternalError => "internal error",
            CloudStatus::ServiceTemporarilyUnavailable => "service temporarily unavailable",
            CloudStatus::ServiceOverCapacity => "service over capacity",
            CloudStatus::InvalidUrl => "invalid URL",
            CloudStatus::MissingBody => "missing body",
            CloudStatus::InvalidBody => "invalid body",
            CloudStatus::MissingCredentials => "missing credentials",
            CloudStatus::InvalidCredentials => "invalid credentials",
            CloudStatus::ExpiredCredentials => "expired credentials",
            CloudStatus::AccessDenied => "access denied",
            CloudStatus::TooManyRequests => "too many requests",
            CloudStatus::ResourceNotFound => "resource not found",
            CloudStatus::MethodNotAllowed => "method not allowed",
            CloudStatus::NotAcceptable => "not acceptable",
            CloudStatus::RequestTimeOut => "request timed out",
            CloudStatus::LengthRequired => "length required",
            CloudStatus::PreconditionFailed => "precondition failed",
            CloudStatus::RequestEntityTooLarge => "request entity too large",
            CloudStatus::RequestUriTooLong => "request URI too long",
            CloudStatus::SessionFailed => "session could not be opened",
            CloudStatus::SessionExpired => "session expired",
            CloudStatus::CguNotAccepted => "terms of use not accepted",
            CloudStatus::ForbiddenAccess => "forbidden access",
            CloudStatus::NotEligible => "not eligible to the service",
            CloudStatus::NotFound => "not found",
            CloudStatus::ListFolderFailed => "list folder failed",
            CloudStatus::ResponseMalformed => "malformed response",
            CloudStatus::NetworkError => "network error",
            CloudStatus::BadParameter => "bad parameter",
            CloudStatus::NotAFile => "not a file",
            CloudStatus::MissingToken => "missing token",
            CloudStatus::InvalidToken => "invalid token",
            CloudStatus::FileTooBig => "file too big",
            CloudStatus::NoSpaceLeft => "no space left",
            CloudStatus::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for CloudStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_success_range() {
        assert_eq!(CloudStatus::from_http(200), CloudStatus::Ok);
        assert_eq!(CloudStatus::from_http(201), CloudStatus::Ok);
        assert_eq!(CloudStatus::from_http(204), CloudStatus::Ok);
    }

    #[test]
    fn test_from_http_errors() {
        assert_eq!(CloudStatus::from_http(401), CloudStatus::InvalidCredentials);
        assert_eq!(CloudStatus::from_http(403), CloudStatus::ForbiddenAccess);
        assert_eq!(CloudStatus::from_http(404), CloudStatus::NotFound);
        assert_eq!(
            CloudStatus::from_http(503),
            CloudStatus::ServiceTemporarilyUnavailable
        );
        assert_eq!(CloudStatus::from_http(502), CloudStatus::InternalError);
        assert_eq!(CloudStatus::from_http(302), CloudStatus::Unknown);
    }

    #[test]
    fn test_only_ok_is_ok() {
        assert!(CloudStatus::Ok.is_ok());
        assert!(!CloudStatus::NotFound.is_ok());
        assert_eq!(CloudStatus::ForbiddenAccess.to_string(), "forbidden access");
    }
}
