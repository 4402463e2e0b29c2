use super::{AttendanceEvent, Directory, DirectoryConfig, DirectoryError, Record};
use crate::APP_USER_AGENT;
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{Instrument, debug, info_span};
use url::Url;

/// Build the records endpoint of a table:
/// `{api_url}/teams/{team}/databases/{database}/tables/{table}/records`.
///
/// # Errors
/// Returns `DirectoryError::Config` if the base URL cannot carry a path or an identifier is empty.
pub fn records_url(
    api_url: &str,
    team_id: &str,
    database_id: &str,
    table_id: &str,
) -> Result<Url, DirectoryError> {
    let mut url = Url::parse(api_url.trim())
        .map_err(|e| DirectoryError::Config(format!("invalid API URL {api_url}: {e}")))?;

    for (name, value) in [
        ("team id", team_id),
        ("database id", database_id),
        ("table id", table_id),
    ] {
        if value.trim().is_empty() {
            return Err(DirectoryError::Config(format!("{name} is empty")));
        }
    }

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| DirectoryError::Config(format!("API URL cannot be a base: {api_url}")))?;
        segments.pop_if_empty().extend([
            "teams",
            team_id.trim(),
            "databases",
            database_id.trim(),
            "tables",
            table_id.trim(),
            "records",
        ]);
    }

    Ok(url)
}

/// Ninox REST client for the classroom, student and attendance tables.
#[derive(Clone, Debug)]
pub struct NinoxClient {
    http: Client,
    config: DirectoryConfig,
    classrooms_url: Url,
    students_url: Url,
    attendance_url: Url,
}

impl NinoxClient {
    /// # Errors
    /// Returns an error if an endpoint URL cannot be built or the HTTP client fails to initialize.
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let url = |table: &str| {
            records_url(
                &config.api_url,
                &config.team_id,
                &config.database_id,
                table,
            )
        };
        let classrooms_url = url(&config.tables.classrooms)?;
        let students_url = url(&config.tables.students)?;
        let attendance_url = url(&config.tables.attendance)?;

        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        debug!("directory endpoints: {classrooms_url}, {students_url}, {attendance_url}");

        Ok(Self {
            http,
            config,
            classrooms_url,
            students_url,
            attendance_url,
        })
    }

    async fn fetch_records(
        &self,
        url: &Url,
        resource: &'static str,
    ) -> Result<Vec<Record>, DirectoryError> {
        let span = info_span!(
            "directory.list",
            resource,
            http.method = "GET",
            url = %url
        );
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .instrument(span)
            .await?;

        let response = check_status(response).await?;

        let records = response
            .json::<Vec<Record>>()
            .await
            .map_err(|e| DirectoryError::Decode(format!("Failed to decode {resource}: {e}")))?;

        debug!("fetched {} {resource}", records.len());

        Ok(records)
    }
}

impl Directory for NinoxClient {
    async fn list_classrooms(&self) -> Result<Vec<Record>, DirectoryError> {
        self.fetch_records(&self.classrooms_url, "classrooms").await
    }

    async fn list_students(&self) -> Result<Vec<Record>, DirectoryError> {
        self.fetch_records(&self.students_url, "students").await
    }

    async fn create_attendance_event(&self, event: &AttendanceEvent) -> Result<(), DirectoryError> {
        let span = info_span!(
            "directory.create",
            student = %event.student,
            classroom = %event.classroom,
            movement = event.movement.code(),
            http.method = "POST",
            url = %self.attendance_url
        );
        let response = self
            .http
            .post(self.attendance_url.clone())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&event.to_batch())
            .send()
            .instrument(span)
            .await?;

        check_status(response).await?;

        Ok(())
    }
}

/// Pass successful responses through; turn anything else into `DirectoryError::Api`.
async fn check_status(response: Response) -> Result<Response, DirectoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = remote_message(&body);

    debug!("directory request failed: {status}");

    Err(DirectoryError::Api {
        status: status.as_u16(),
        message,
    })
}

fn remote_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let message = json.get("message").and_then(Value::as_str)?.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
