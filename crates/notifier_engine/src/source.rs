use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use notifier_core::{AnnouncementItem, GradeItem, LessonItem};
use notifier_logging::notifier_debug;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{HttpSettings, SourceError, SourceFailure};

/// Read access to an authenticated portal session.
#[async_trait::async_trait]
pub trait PortalSource: Send + Sync {
    /// Grades of the current grading period.
    async fn current_grades(&self) -> Result<Vec<GradeItem>, SourceError>;
    /// Timetable of one day, in the order the portal lists it.
    async fn lessons(&self, date: NaiveDate) -> Result<Vec<LessonItem>, SourceError>;
    /// Announcements and surveys.
    async fn announcements(&self) -> Result<Vec<AnnouncementItem>, SourceError>;
}

/// Opens a portal session; failures here are connection failures.
#[async_trait::async_trait]
pub trait PortalConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn PortalSource>, SourceError>;
}

#[derive(Clone)]
pub struct PortalCredentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for PortalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalCredentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Talks JSON to a portal bridge service that handles the portal's own login.
#[derive(Debug, Clone)]
pub struct HttpPortalConnector {
    credentials: PortalCredentials,
    settings: HttpSettings,
}

impl HttpPortalConnector {
    pub fn new(credentials: PortalCredentials, settings: HttpSettings) -> Self {
        Self {
            credentials,
            settings,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, SourceError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SourceError::new(SourceFailure::Connection, err.to_string()))
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[async_trait::async_trait]
impl PortalConnector for HttpPortalConnector {
    async fn connect(&self) -> Result<Box<dyn PortalSource>, SourceError> {
        let base = parse_base_url(&self.credentials.url)?;
        let client = self.build_client()?;
        let url = join(&base, "session")?;

        let response = client
            .post(url)
            .json(&LoginRequest {
                username: &self.credentials.username,
                password: &self.credentials.password,
            })
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, SourceFailure::Connection))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::new(SourceFailure::Auth, status.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::new(
                SourceFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let login: LoginResponse = response
            .json()
            .await
            .map_err(|err| SourceError::new(SourceFailure::Decode, err.to_string()))?;

        notifier_debug!("Portal session opened at {}", base);
        Ok(Box::new(HttpPortalSource {
            client,
            base,
            token: login.token,
        }))
    }
}

pub struct HttpPortalSource {
    client: reqwest::Client,
    base: Url,
    token: String,
}

impl HttpPortalSource {
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, SourceFailure::Connection))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::new(
                SourceFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        response
            .json()
            .await
            .map_err(|err| map_reqwest_error(err, SourceFailure::Decode))
    }
}

#[derive(Deserialize)]
struct WireGrade {
    date: NaiveDate,
    subject: String,
    #[serde(default)]
    coefficient: String,
    #[serde(default)]
    average: String,
    #[serde(default)]
    max: String,
    #[serde(default)]
    min: String,
    grade: String,
}

#[derive(Deserialize)]
struct WireLesson {
    start: NaiveDateTime,
    end: NaiveDateTime,
    subject: String,
    #[serde(default)]
    cancelled: bool,
}

#[derive(Deserialize)]
struct WireAnnouncement {
    title: String,
    #[serde(default)]
    author: String,
    start_date: NaiveDateTime,
    #[serde(default)]
    content: String,
    #[serde(default)]
    read: bool,
    #[serde(default)]
    survey: bool,
}

#[async_trait::async_trait]
impl PortalSource for HttpPortalSource {
    async fn current_grades(&self) -> Result<Vec<GradeItem>, SourceError> {
        let url = join(&self.base, "grades")?;
        let grades: Vec<WireGrade> = self.get_json(url).await?;
        Ok(grades
            .into_iter()
            .map(|g| GradeItem {
                date: g.date,
                subject: g.subject,
                coefficient: g.coefficient,
                average: g.average,
                max: g.max,
                min: g.min,
                grade: g.grade,
            })
            .collect())
    }

    async fn lessons(&self, date: NaiveDate) -> Result<Vec<LessonItem>, SourceError> {
        let mut url = join(&self.base, "lessons")?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        let lessons: Vec<WireLesson> = self.get_json(url).await?;
        Ok(lessons
            .into_iter()
            .map(|l| LessonItem {
                start: l.start,
                end: l.end,
                subject: l.subject,
                cancelled: l.cancelled,
            })
            .collect())
    }

    async fn announcements(&self) -> Result<Vec<AnnouncementItem>, SourceError> {
        let url = join(&self.base, "announcements")?;
        let announcements: Vec<WireAnnouncement> = self.get_json(url).await?;
        Ok(announcements
            .into_iter()
            .map(|a| AnnouncementItem {
                title: a.title,
                author: a.author,
                start_date: a.start_date,
                content: a.content,
                read: a.read,
                survey: a.survey,
            })
            .collect())
    }
}

/// Parses the bridge base URL so that relative endpoints join below its path.
fn parse_base_url(raw: &str) -> Result<Url, SourceError> {
    let mut base =
        Url::parse(raw).map_err(|err| SourceError::new(SourceFailure::InvalidUrl, err.to_string()))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn join(base: &Url, endpoint: &str) -> Result<Url, SourceError> {
    base.join(endpoint)
        .map_err(|err| SourceError::new(SourceFailure::InvalidUrl, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error, fallback: SourceFailure) -> SourceError {
    if err.is_timeout() {
        return SourceError::new(SourceFailure::Timeout, err.to_string());
    }
    if err.is_decode() {
        return SourceError::new(SourceFailure::Decode, err.to_string());
    }
    SourceError::new(fallback, err.to_string())
}
