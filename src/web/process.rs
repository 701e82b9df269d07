//! `POST /api/process`: form submissions and JSON API calls.

use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use super::pages::{self, IndexPage};
use crate::error::ProcessError;
use crate::rename_engine::{ProcessRequest, ProcessRequestBuilder};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request fields, shared by the form and the JSON body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessForm {
    pub source_dir: String,
    pub target_dir: String,
    pub mode: String,
    pub redirect_path: String,
}

impl ProcessForm {
    /// Default the mode and drop fields rename mode ignores.
    fn normalize(&mut self) {
        if self.mode.is_empty() {
            self.mode = "rename".to_string();
        }
        if self.mode == "rename" {
            self.target_dir.clear();
            self.redirect_path.clear();
        }
    }

    fn to_request(&self) -> Result<ProcessRequest, ProcessError> {
        ProcessRequestBuilder::new()
            .source_dir(&self.source_dir)
            .target_dir(&self.target_dir)
            .mode(self.mode.as_str())
            .redirect_path(&self.redirect_path)
            .build()
    }

    fn page_with_error(&self, error: String) -> IndexPage {
        IndexPage {
            error: Some(error),
            source_dir: self.source_dir.clone(),
            target_dir: self.target_dir.clone(),
            mode: self.mode.clone(),
            redirect_path: self.redirect_path.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ProcessResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

pub async fn process_files(State(state): State<AppState>, request: Request) -> Response {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|ct| ct.starts_with(FORM_CONTENT_TYPE))
        .unwrap_or(false);

    if is_form {
        match Form::<ProcessForm>::from_request(request, &state).await {
            Ok(Form(form)) => handle_form(&state, form).await,
            Err(rejection) => {
                let page = ProcessForm::default()
                    .page_with_error(format!("Invalid request parameters: {}", rejection.body_text()));
                Html(pages::render(&page).into_string()).into_response()
            }
        }
    } else {
        match Json::<ProcessForm>::from_request(request, &state).await {
            Ok(Json(body)) => handle_json(&state, body).await,
            Err(rejection) => (
                StatusCode::BAD_REQUEST,
                Json(ProcessResponse::failure(format!(
                    "Invalid request parameters: {}",
                    rejection.body_text()
                ))),
            )
                .into_response(),
        }
    }
}

async fn handle_form(state: &AppState, mut form: ProcessForm) -> Response {
    form.normalize();

    match run(state, &form).await {
        Ok(transcript) => {
            let location = result_location(&form, &transcript);
            Redirect::to(&location).into_response()
        }
        Err(e) => {
            let message = if e.is_missing_field() {
                e.to_string()
            } else {
                format!("Processing failed: {}", e)
            };
            Html(pages::render(&form.page_with_error(message)).into_string()).into_response()
        }
    }
}

async fn handle_json(state: &AppState, mut body: ProcessForm) -> Response {
    body.normalize();

    match run(state, &body).await {
        Ok(transcript) => Json(ProcessResponse {
            success: true,
            message: "Processing complete".to_string(),
            data: Some(transcript),
        })
        .into_response(),
        Err(e) if e.is_missing_field() => {
            (StatusCode::BAD_REQUEST, Json(ProcessResponse::failure(e.to_string()))).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ProcessResponse::failure(format!("Processing failed: {}", e))),
        )
            .into_response(),
    }
}

/// Validate the fields, then run the engine on the blocking pool.
async fn run(state: &AppState, form: &ProcessForm) -> Result<String, ProcessError> {
    let request = form.to_request()?;
    let engine = state.engine.clone();

    let result = tokio::task::spawn_blocking(move || engine.process(&request))
        .await
        .map_err(|e| ProcessError::Task(e.to_string()))?;

    match &result {
        Ok(_) => info!(source = %form.source_dir, mode = %form.mode, "request processed"),
        Err(e) => warn!(source = %form.source_dir, mode = %form.mode, error = %e, "request failed"),
    }
    result
}

/// `/?success=true&result=...` plus the submitted fields, so a reload does
/// not resubmit the form.
fn result_location(form: &ProcessForm, transcript: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("success", "true")
        .append_pair("result", transcript)
        .append_pair("sourceDir", &form.source_dir)
        .append_pair("targetDir", &form.target_dir)
        .append_pair("mode", &form.mode)
        .append_pair("redirectPath", &form.redirect_path)
        .finish();
    format!("/?{}", query)
}
