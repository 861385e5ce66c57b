use serde::Deserialize;

use crate::error::MutationError;
use crate::transport::TransportResponse;

pub const SUCCESS_STATUS: &str = "success";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Status updated";

#[derive(Debug, Deserialize)]
struct MutationResponseBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Server confirmation of an applied status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub message: String,
}

/// A response confirms the change only when the HTTP status is 2xx and the
/// body reports `status: "success"`.
pub fn classify_response(response: &TransportResponse) -> Result<Confirmation, MutationError> {
    let parsed = serde_json::from_str::<MutationResponseBody>(&response.body);

    if !response.is_success_status() {
        return Err(MutationError::ServerRejected {
            status: response.status,
            message: parsed.ok().and_then(|body| non_empty(body.error)),
        });
    }

    let body = parsed.map_err(|error| MutationError::MalformedResponse(error.to_string()))?;
    if body.status.as_deref() == Some(SUCCESS_STATUS) {
        return Ok(Confirmation {
            message: non_empty(body.message).unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_owned()),
        });
    }

    Err(MutationError::ServerRejected {
        status: response.status,
        message: non_empty(body.error),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{classify_response, Confirmation, DEFAULT_SUCCESS_MESSAGE};
    use crate::error::MutationError;
    use crate::transport::TransportResponse;

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            body: body.to_owned(),
        }
    }

    #[test]
    fn success_requires_status_code_and_body_to_agree() {
        let confirmed = classify_response(&response(200, r#"{"status":"success","message":"Updated"}"#));
        assert_eq!(
            confirmed,
            Ok(Confirmation {
                message: "Updated".to_owned()
            })
        );

        let rejected = classify_response(&response(500, r#"{"status":"success","message":"Updated"}"#));
        assert_eq!(
            rejected,
            Err(MutationError::ServerRejected {
                status: 500,
                message: None
            })
        );
    }

    #[test]
    fn success_without_message_uses_default_text() {
        let confirmed = classify_response(&response(201, r#"{"status":"success"}"#))
            .expect("confirmed");
        assert_eq!(confirmed.message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[test]
    fn body_error_text_is_carried_on_rejection() {
        let rejected = classify_response(&response(
            200,
            r#"{"status":"error","error":"Unknown status value"}"#,
        ));
        assert_eq!(
            rejected,
            Err(MutationError::ServerRejected {
                status: 200,
                message: Some("Unknown status value".to_owned())
            })
        );

        let with_code = classify_response(&response(422, r#"{"error":"Missing field"}"#));
        assert_eq!(
            with_code.expect_err("422 rejected").user_message(),
            "Missing field"
        );
    }

    #[test]
    fn html_error_page_falls_back_to_generic_message() {
        let rejected = classify_response(&response(500, "<html>Internal Server Error</html>"))
            .expect_err("500 rejected");
        assert_eq!(rejected.user_message(), "Update failed");
    }

    #[test]
    fn unparseable_success_body_is_malformed() {
        let error = classify_response(&response(200, "OK")).expect_err("malformed body");
        assert!(matches!(error, MutationError::MalformedResponse(_)));
    }
}
