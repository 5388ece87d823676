use reqwest::StatusCode;

use super::*;

impl IssueClient {
    pub(super) async fn fetch_issues(&self) -> Result<Vec<Issue>, ApiError> {
        let url = self.endpoint(&["api", "issues"])?;
        tracing::debug!(%url, "listing issues");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Vec<Issue>>().await?)
    }

    pub(super) async fn fetch_issue(&self, id: &str) -> Result<Option<Issue>, ApiError> {
        let url = self.endpoint(&["api", "issues", id])?;
        tracing::debug!(%url, "fetching issue");
        let response = self.client.get(url).send().await?;
        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Ok(None);
        }

        let response = response.error_for_status()?;
        Ok(Some(response.json::<Issue>().await?))
    }

    pub(super) async fn post_issue(&self, issue: &NewIssue) -> Result<Option<Issue>, ApiError> {
        let url = self.endpoint(&["api", "issues"])?;
        tracing::debug!(%url, title = %issue.title, "creating issue");
        let response = self
            .client
            .post(url)
            .json(issue)
            .send()
            .await?
            .error_for_status()?;

        // Older workers answer with an empty body or a bare acknowledgement.
        let payload = response.bytes().await?;
        if payload.is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_slice::<Issue>(&payload).ok())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::{ApiError, IssueApi, IssueClient};
    use crate::issue::NewIssue;

    fn client_for(server: &MockServer) -> IssueClient {
        IssueClient::new(&server.uri(), Duration::from_secs(5)).expect("client")
    }

    #[tokio::test]
    async fn list_issues_decodes_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/issues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "a", "title": "First", "body": "one", "createdAt": "2024-01-01T00:00:00Z"},
                {"id": "b", "title": "Second", "body": "two", "createdAt": "2024-01-02T00:00:00Z"}
            ])))
            .mount(&server)
            .await;

        let issues = client_for(&server).list_issues().await.expect("list");

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].id, "b");
    }

    #[tokio::test]
    async fn list_issues_reports_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/issues"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let error = client_for(&server).list_issues().await.expect_err("fails");

        assert!(matches!(error, ApiError::Status { status } if status.as_u16() == 502));
    }

    #[tokio::test]
    async fn get_issue_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/issues/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let issue = client_for(&server).get_issue("missing").await.expect("request");

        assert_eq!(issue, None);
    }

    #[tokio::test]
    async fn get_issue_keeps_server_failures_distinct_from_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/issues/abc"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).get_issue("abc").await;

        assert!(matches!(result, Err(ApiError::Status { .. })));
    }

    #[tokio::test]
    async fn get_issue_returns_issue() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/issues/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc", "title": "Bug", "body": "details", "createdAt": "2024-05-01T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let issue = client_for(&server)
            .get_issue("abc")
            .await
            .expect("request")
            .expect("found");

        assert_eq!(issue.title, "Bug");
    }

    #[tokio::test]
    async fn get_issue_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/issues/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;
        let client = IssueClient::new(&server.uri(), Duration::from_millis(100)).expect("client");

        let result = client.get_issue("slow").await;

        assert!(matches!(result, Err(ApiError::Timeout)));
    }

    #[tokio::test]
    async fn create_issue_posts_title_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/issues"))
            .and(body_json(json!({"title": "Bug", "body": "See logs"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "new-1", "title": "Bug", "body": "See logs", "createdAt": "2024-05-01T10:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server)
            .create_issue(&NewIssue::new("Bug", "See logs"))
            .await
            .expect("create");

        assert_eq!(created.map(|issue| issue.id), Some("new-1".to_string()));
    }

    #[tokio::test]
    async fn create_issue_accepts_empty_acknowledgement() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/issues"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let created = client_for(&server)
            .create_issue(&NewIssue::new("Bug", "body"))
            .await
            .expect("create");

        assert_eq!(created, None);
    }

    #[tokio::test]
    async fn create_issue_fails_on_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/issues"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .create_issue(&NewIssue::new("Bug", "body"))
            .await;

        assert!(matches!(result, Err(ApiError::Status { .. })));
    }
}
