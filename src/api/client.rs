//! Cliente HTTP del backend de NDAs.
//!
//! Cada función corresponde a un endpoint. No hay reintentos ni caché: un
//! error se devuelve tal cual a la pantalla que hizo la llamada.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{
    Approval, CaseCreated, CaseDetail, CaseStatus, CaseSubmission, CaseSummary, Question, Template,
};

pub const LAWYER_KEY_HEADER: &str = "X-Lawyer-Key";

/// Credencial que se adjunta a una petición
#[derive(Debug, Clone, Copy)]
enum Credential<'a> {
    Anonymous,
    Bearer(&'a str),
    LawyerKey(&'a str),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str, credential: Credential<'_>) -> RequestBuilder {
        let url = format!("{}{}", self.base, path);
        debug!(%method, %url, "petición al backend");

        let builder = self.http.request(method, url);
        match credential {
            Credential::Anonymous => builder,
            Credential::Bearer(token) => builder.bearer_auth(token),
            Credential::LawyerKey(key) => builder.header(LAWYER_KEY_HEADER, key),
        }
    }

    async fn send_json<T: DeserializeOwned>(
        builder: RequestBuilder,
        context: &'static str,
    ) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|source| ApiError::Transport { context, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                context,
                status,
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { context, source })
    }

    fn templates_request(&self) -> RequestBuilder {
        self.request(Method::GET, "/v1/templates", Credential::Anonymous)
    }

    fn template_questions_request(&self, template_id: &str) -> RequestBuilder {
        let path = format!("/v1/templates/{}/questions", template_id);
        self.request(Method::GET, &path, Credential::Anonymous)
    }

    fn submit_case_request(&self, submission: &CaseSubmission, token: Option<&str>) -> RequestBuilder {
        let credential = token.map_or(Credential::Anonymous, Credential::Bearer);
        self.request(Method::POST, "/v1/cases", credential)
            .json(submission)
    }

    fn case_status_request(&self, case_id: &str) -> RequestBuilder {
        let path = format!("/v1/cases/{}/status", case_id);
        self.request(Method::GET, &path, Credential::Anonymous)
    }

    fn my_cases_request(&self, token: &str) -> RequestBuilder {
        self.request(Method::GET, "/v1/me/cases", Credential::Bearer(token))
    }

    fn my_case_detail_request(&self, case_id: &str, token: &str) -> RequestBuilder {
        let path = format!("/v1/me/cases/{}", case_id);
        self.request(Method::GET, &path, Credential::Bearer(token))
    }

    fn lawyer_cases_request(&self, lawyer_key: &str) -> RequestBuilder {
        self.request(
            Method::GET,
            "/v1/lawyer/cases",
            Credential::LawyerKey(lawyer_key),
        )
    }

    fn lawyer_case_detail_request(&self, case_id: &str, lawyer_key: &str) -> RequestBuilder {
        let path = format!("/v1/lawyer/cases/{}", case_id);
        self.request(Method::GET, &path, Credential::LawyerKey(lawyer_key))
    }

    fn approve_case_request(&self, case_id: &str, lawyer_key: &str) -> RequestBuilder {
        let path = format!("/v1/lawyer/cases/{}/approve", case_id);
        self.request(Method::POST, &path, Credential::LawyerKey(lawyer_key))
    }

    pub async fn templates(&self) -> Result<Vec<Template>, ApiError> {
        Self::send_json(self.templates_request(), "Failed to fetch templates").await
    }

    pub async fn template_questions(&self, template_id: &str) -> Result<Vec<Question>, ApiError> {
        let req = self.template_questions_request(template_id);
        Self::send_json(req, "Failed to fetch questions").await
    }

    /// Envía un caso nuevo. El token es opcional para el cliente, aunque el
    /// backend puede exigirlo.
    pub async fn submit_case(
        &self,
        submission: &CaseSubmission,
        token: Option<&str>,
    ) -> Result<CaseCreated, ApiError> {
        let req = self.submit_case_request(submission, token);
        Self::send_json(req, "Failed to submit case").await
    }

    pub async fn case_status(&self, case_id: &str) -> Result<CaseStatus, ApiError> {
        let req = self.case_status_request(case_id);
        Self::send_json(req, "Failed to fetch case status").await
    }

    pub async fn my_cases(&self, token: &str) -> Result<Vec<CaseSummary>, ApiError> {
        Self::send_json(self.my_cases_request(token), "Failed to fetch your cases").await
    }

    pub async fn my_case_detail(&self, case_id: &str, token: &str) -> Result<CaseDetail, ApiError> {
        let req = self.my_case_detail_request(case_id, token);
        Self::send_json(req, "Failed to fetch case detail").await
    }

    pub async fn lawyer_cases(&self, lawyer_key: &str) -> Result<Vec<CaseSummary>, ApiError> {
        let req = self.lawyer_cases_request(lawyer_key);
        Self::send_json(req, "Failed to fetch lawyer cases").await
    }

    pub async fn lawyer_case_detail(
        &self,
        case_id: &str,
        lawyer_key: &str,
    ) -> Result<CaseDetail, ApiError> {
        let req = self.lawyer_case_detail_request(case_id, lawyer_key);
        Self::send_json(req, "Failed to fetch case detail").await
    }

    pub async fn approve_case(&self, case_id: &str, lawyer_key: &str) -> Result<Approval, ApiError> {
        let req = self.approve_case_request(case_id, lawyer_key);
        Self::send_json(req, "Failed to approve case").await
    }

    /// Descarga el contenido de una URL firmada (documento o vista previa)
    pub async fn fetch_signed(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let context = "Failed to download document";
        debug!(%url, "descargando URL firmada");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { context, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                context,
                status,
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Decode { context, source })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:8000/")
    }

    #[test]
    fn trims_trailing_slash_from_base() {
        assert_eq!(client().base(), "http://localhost:8000");
    }

    enum Expected {
        Anonymous,
        Bearer,
        LawyerKey,
    }

    #[test]
    fn each_endpoint_sends_its_credential() {
        let api = client();
        let submission = CaseSubmission {
            template_id: "t1".to_string(),
            client_name: "Ana".to_string(),
            client_email: "ana@example.com".to_string(),
            answers: Default::default(),
        };

        let cases = vec![
            (api.templates_request(), Method::GET, "/v1/templates", Expected::Anonymous),
            (
                api.template_questions_request("t1"),
                Method::GET,
                "/v1/templates/t1/questions",
                Expected::Anonymous,
            ),
            (
                api.submit_case_request(&submission, None),
                Method::POST,
                "/v1/cases",
                Expected::Anonymous,
            ),
            (
                api.submit_case_request(&submission, Some("tok-123")),
                Method::POST,
                "/v1/cases",
                Expected::Bearer,
            ),
            (
                api.case_status_request("c1"),
                Method::GET,
                "/v1/cases/c1/status",
                Expected::Anonymous,
            ),
            (api.my_cases_request("tok-123"), Method::GET, "/v1/me/cases", Expected::Bearer),
            (
                api.my_case_detail_request("c1", "tok-123"),
                Method::GET,
                "/v1/me/cases/c1",
                Expected::Bearer,
            ),
            (
                api.lawyer_cases_request("secret"),
                Method::GET,
                "/v1/lawyer/cases",
                Expected::LawyerKey,
            ),
            (
                api.lawyer_case_detail_request("c1", "secret"),
                Method::GET,
                "/v1/lawyer/cases/c1",
                Expected::LawyerKey,
            ),
            (
                api.approve_case_request("c1", "secret"),
                Method::POST,
                "/v1/lawyer/cases/c1/approve",
                Expected::LawyerKey,
            ),
        ];

        for (builder, method, path, expected) in cases {
            let req = builder.build().unwrap();
            let auth = req.headers().get(AUTHORIZATION);
            let key = req.headers().get(LAWYER_KEY_HEADER);

            assert_eq!(req.method(), method, "{}", path);
            assert_eq!(req.url().as_str(), format!("http://localhost:8000{}", path));
            match expected {
                Expected::Anonymous => {
                    assert!(auth.is_none(), "{}", path);
                    assert!(key.is_none(), "{}", path);
                }
                Expected::Bearer => {
                    assert_eq!(auth.unwrap(), "Bearer tok-123", "{}", path);
                    assert!(key.is_none(), "{}", path);
                }
                Expected::LawyerKey => {
                    assert_eq!(key.unwrap(), "secret", "{}", path);
                    assert!(auth.is_none(), "{}", path);
                }
            }
        }
    }

    #[test]
    fn submission_is_sent_as_json() {
        let submission = CaseSubmission {
            template_id: "t1".to_string(),
            client_name: "Ana".to_string(),
            client_email: "ana@example.com".to_string(),
            answers: [("PARTY1_NAME".to_string(), "Acme".to_string())].into(),
        };
        let req = client()
            .submit_case_request(&submission, None)
            .build()
            .unwrap();

        let body: serde_json::Value =
            serde_json::from_slice(req.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(body["template_id"], "t1");
        assert_eq!(body["answers"]["PARTY1_NAME"], "Acme");
    }
}
