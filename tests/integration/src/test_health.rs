//! Health endpoint integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, endpoint_url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running() {
        let resp = client()
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .expect("health request");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.expect("health JSON");
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_path() {
        let resp = client()
            .post(format!("{}/unknown", endpoint_url()))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
