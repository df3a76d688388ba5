use thiserror::Error;

/// Failures crossing the backend boundary.
///
/// These are infrastructure failures (network, protocol, provider); domain
/// failures travel inside successful replies as `{success, error}` envelopes.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend error ({0}): {1}")]
    Api(u16, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown procedure '{0}'")]
    UnknownProcedure(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}
