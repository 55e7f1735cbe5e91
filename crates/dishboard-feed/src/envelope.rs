// Response Envelope
//
// Every REST endpoint on the platform wraps its payload in the same
// envelope: `EC == 0` signals success, anything else is an application
// error with message `EM`.

use serde::Deserialize;

use dishboard_core::{DashboardError, Result};

/// Uniform platform response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(rename = "EC")]
    pub ec: i64,

    #[serde(rename = "EM", default)]
    pub em: Option<String>,

    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload or surface the application-level error.
    pub fn into_result(self) -> Result<T> {
        if self.ec != 0 {
            let message = self
                .em
                .unwrap_or_else(|| format!("application error EC={}", self.ec));
            return Err(DashboardError::chart(message));
        }
        self.data
            .ok_or_else(|| DashboardError::chart("envelope missing data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Payload {
        value: u64,
    }

    #[test]
    fn zero_ec_unwraps_the_payload() {
        let envelope: ApiEnvelope<Payload> =
            serde_json::from_str(r#"{"EC":0,"EM":null,"data":{"value":7}}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), Payload { value: 7 });
    }

    #[test]
    fn nonzero_ec_carries_the_message() {
        let envelope: ApiEnvelope<Payload> =
            serde_json::from_str(r#"{"EC":3,"EM":"invalid date range"}"#).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert!(err.to_string().contains("invalid date range"));
    }

    #[test]
    fn nonzero_ec_without_message_still_errors() {
        let envelope: ApiEnvelope<Payload> = serde_json::from_str(r#"{"EC":9}"#).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert!(err.to_string().contains("EC=9"));
    }

    #[test]
    fn success_without_data_is_an_error() {
        let envelope: ApiEnvelope<Payload> = serde_json::from_str(r#"{"EC":0}"#).unwrap();
        assert!(envelope.into_result().is_err());
    }
}
