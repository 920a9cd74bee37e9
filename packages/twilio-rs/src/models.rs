use serde::Deserialize;

/// Subset of the Programmable Messaging resource returned after a send.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Error body Twilio returns on 4xx/5xx.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub more_info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_parses_queued_message() {
        let json = r#"{
            "sid": "SM123",
            "status": "queued",
            "to": "+15555550100",
            "from": "+15555550199",
            "body": "Your code is 123456",
            "error_code": null,
            "error_message": null
        }"#;

        let parsed: MessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.sid, "SM123");
        assert_eq!(parsed.status, "queued");
        assert!(parsed.error_code.is_none());
    }

    #[test]
    fn test_api_error_response_parses() {
        let json = r#"{"code": 21211, "message": "The 'To' number is not a valid phone number.", "status": 400}"#;

        let parsed: ApiErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.code, Some(21211));
        assert!(parsed.message.contains("not a valid phone number"));
    }
}
