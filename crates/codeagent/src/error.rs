/// Which external model a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Guidance,
    Generation,
}

impl std::fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayKind::Guidance => write!(f, "guidance"),
            GatewayKind::Generation => write!(f, "generation"),
        }
    }
}

/// Failure of a single call to an external text-completion endpoint.
///
/// `Display` carries the full detail and is meant for logs only; use
/// [`GatewayError::user_message`] for anything returned to callers.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("{gateway} gateway has no usable credentials")]
    CredentialsAbsent { gateway: GatewayKind },

    #[error("{gateway} gateway timed out after {seconds}s")]
    Timeout { gateway: GatewayKind, seconds: u64 },

    #[error("{gateway} gateway returned HTTP {status}: {body}")]
    Status {
        gateway: GatewayKind,
        status: u16,
        body: String,
    },

    #[error("{gateway} gateway transport error: {message}")]
    Transport {
        gateway: GatewayKind,
        message: String,
    },

    #[error("{gateway} gateway returned a malformed payload: {message}")]
    MalformedPayload {
        gateway: GatewayKind,
        message: String,
    },

    #[error("{gateway} gateway returned no completion text")]
    EmptyResult { gateway: GatewayKind },
}

impl GatewayError {
    /// Missing credentials select the heuristic fallback rather than failing.
    pub fn is_configuration_absent(&self) -> bool {
        matches!(self, GatewayError::CredentialsAbsent { .. })
    }

    /// Short sentence safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::CredentialsAbsent { gateway } => {
                format!("The {gateway} model is not configured.")
            }
            GatewayError::Timeout { gateway, .. } => {
                format!("The {gateway} model did not answer in time.")
            }
            GatewayError::Status { gateway, status, .. } => {
                format!("The {gateway} model rejected the request (HTTP {status}).")
            }
            GatewayError::Transport { gateway, .. } => {
                format!("The {gateway} model could not be reached.")
            }
            GatewayError::MalformedPayload { gateway, .. } => {
                format!("The {gateway} model returned an unreadable answer.")
            }
            GatewayError::EmptyResult { gateway } => {
                format!("The {gateway} model returned an empty answer.")
            }
        }
    }
}

/// Failure of a whole request inside the orchestrator.
#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("request was cancelled")]
    Cancelled,
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Gateway(err) => err.user_message(),
            AgentError::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_status_body() {
        let err = GatewayError::Status {
            gateway: GatewayKind::Generation,
            status: 401,
            body: "invalid x-api-key sk-secret".to_string(),
        };

        assert!(err.to_string().contains("sk-secret"));
        let message = err.user_message();
        assert!(message.contains("401"));
        assert!(!message.contains("sk-secret"));
    }

    #[test]
    fn test_configuration_absent_is_distinguishable() {
        let absent = GatewayError::CredentialsAbsent {
            gateway: GatewayKind::Guidance,
        };
        let timeout = GatewayError::Timeout {
            gateway: GatewayKind::Guidance,
            seconds: 300,
        };

        assert!(absent.is_configuration_absent());
        assert!(!timeout.is_configuration_absent());
    }

    #[test]
    fn test_agent_error_messages() {
        let err: AgentError = GatewayError::EmptyResult {
            gateway: GatewayKind::Generation,
        }
        .into();
        assert_eq!(err.user_message(), "The generation model returned an empty answer.");
        assert_eq!(AgentError::Cancelled.user_message(), "The request was cancelled.");
    }
}
