use reqwest::{RequestBuilder, StatusCode, header};
use reqwest::multipart::{Form, Part};

use crate::domain::UploadJob;
use crate::remote::traits::{RemoteClient, RemoteError, Resource};

pub const DEFAULT_BASE_URL: &str = "https://www.ioi-jp.org/JOI/auth";

// Asset file names on the judge are prefixed with the contest year.
const ASSET_YEAR: &str = "2017";

/// `RemoteClient` over HTTP. The session cookie rides on every request;
/// authentication beyond that is the server's problem.
#[derive(Debug)]
pub struct HttpRemoteClient {
    http: reqwest::Client,
    base_url: String,
    cookie: String,
    term: String,
    problem: u32,
}

impl HttpRemoteClient {
    pub fn new(base_url: impl Into<String>, session: &str, term: &str, problem: u32) -> Self {
        HttpRemoteClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            cookie: format!("JSESSIONID={session}"),
            term: term.to_string(),
            problem,
        }
    }

    /// Where the operator can read the problem statement.
    pub fn statement_url(&self) -> String {
        format!(
            "{}/showForm.action?id=t{}&term={}",
            self.base_url, self.problem, self.term
        )
    }

    fn hidden_input_name(&self, index: usize) -> String {
        format!(
            "{}-{}-t{}-in{}.txt",
            ASSET_YEAR,
            self.term,
            self.problem,
            index + 1
        )
    }

    fn fetch_request(&self, resource: &Resource) -> RequestBuilder {
        match resource {
            Resource::SampleInput { index } => self.http.get(format!(
                "{}/{}-{}-t{}-in_s{}.txt",
                self.base_url,
                ASSET_YEAR,
                self.term,
                self.problem,
                index + 1
            )),
            Resource::SampleOutput { index } => self.http.get(format!(
                "{}/{}-{}-t{}-out_s{}.txt",
                self.base_url,
                ASSET_YEAR,
                self.term,
                self.problem,
                index + 1
            )),
            Resource::HiddenInput { index } => self
                .http
                .get(format!("{}/fileDownload.action", self.base_url))
                .query(&[
                    ("name", self.hidden_input_name(*index).as_str()),
                    ("kind", "in"),
                    ("term", self.term.as_str()),
                ]),
        }
    }
}

#[async_trait::async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn fetch(&self, resource: &Resource) -> Result<Option<Vec<u8>>, RemoteError> {
        let response = self
            .fetch_request(resource)
            .header(header::COOKIE, &self.cookie)
            .send()
            .await?;
        let url = response.url().to_string();

        match response.status() {
            StatusCode::OK => {
                let mut content = response.bytes().await?.to_vec();
                // Normalize line endings across platforms.
                content.retain(|&byte| byte != b'\r');
                Ok(Some(content))
            }
            StatusCode::NOT_FOUND => {
                tracing::warn!(%url, "404 when downloading asset (missing test case?)");
                Ok(None)
            }
            status => Err(RemoteError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            }),
        }
    }

    async fn submit(&self, job: &UploadJob) -> Result<(), RemoteError> {
        let form = Form::new()
            .text("id", format!("t{}", self.problem))
            .text("term", self.term.clone())
            .text("formCount", job.sequence_index.to_string())
            .text("fno", job.sequence_index.to_string())
            .part(
                job.field_name.clone(),
                Part::bytes(job.payload.clone()).file_name(job.file_name.clone()),
            );

        let response = self
            .http
            .post(format!("{}/fileUpload.action", self.base_url))
            .header(header::COOKIE, &self.cookie)
            .multipart(form)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(RemoteError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            }),
        }
    }
}
