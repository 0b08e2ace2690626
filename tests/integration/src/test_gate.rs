//! Signature gate integration tests.

#[cfg(test)]
mod tests {
    use crate::{WEBHOOK_PATH, client, endpoint_url, reference_fields, sign_form};

    const REFERENCE_QUERY: &str = "?foo=1&bar=2";
    const REFERENCE_SIGNATURE: &str = "RSOYDt4T1cUTdK1PDd93/VVr8B8=";

    fn webhook_url(query: &str) -> String {
        format!("{}{WEBHOOK_PATH}{query}", endpoint_url())
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_reference_request() {
        let resp = client()
            .post(webhook_url(REFERENCE_QUERY))
            .header("X-Twilio-Signature", REFERENCE_SIGNATURE)
            .form(&reference_fields())
            .send()
            .await
            .expect("webhook request");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<Response></Response>"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_fields_in_any_order() {
        let mut fields = reference_fields();
        fields.reverse();

        let resp = client()
            .post(webhook_url(REFERENCE_QUERY))
            .header("X-Twilio-Signature", REFERENCE_SIGNATURE)
            .form(&fields)
            .send()
            .await
            .expect("webhook request");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_forbid_tampered_form() {
        let mut fields = reference_fields();
        fields[2] = ("Digits", "9999");

        let resp = client()
            .post(webhook_url(REFERENCE_QUERY))
            .header("X-Twilio-Signature", REFERENCE_SIGNATURE)
            .form(&fields)
            .send()
            .await
            .expect("webhook request");

        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_forbid_missing_signature() {
        let resp = client()
            .post(webhook_url(REFERENCE_QUERY))
            .form(&reference_fields())
            .send()
            .await
            .expect("webhook request");

        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_freshly_signed_request() {
        let fields = [("Body", "hello world"), ("MessageSid", "SM123")];
        let signature = sign_form(&format!("{WEBHOOK_PATH}?id=7"), &fields);

        let resp = client()
            .post(webhook_url("?id=7"))
            .header("X-Twilio-Signature", signature)
            .form(&fields)
            .send()
            .await
            .expect("webhook request");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_sign_get_requests_by_url_only() {
        let signature = sign_form(&format!("{WEBHOOK_PATH}?CallStatus=completed"), &[]);

        let resp = client()
            .get(webhook_url("?CallStatus=completed"))
            .header("X-Twilio-Signature", signature)
            .send()
            .await
            .expect("webhook request");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }
}
