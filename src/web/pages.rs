//! Server-rendered index page.

use axum::extract::Query;
use axum::response::Html;
use maud::{DOCTYPE, Markup, html};
use serde::Deserialize;

const TITLE: &str = "VdSYMLinkTool";

const MODES: [(&str, &str); 3] = [
    ("rename", "Rename within the source"),
    ("link", "Create symbolic links"),
    ("move", "Move files"),
];

/// Query parameters carried by the redirect after a form submission.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexQuery {
    pub result: Option<String>,
    pub success: Option<String>,
    pub source_dir: String,
    pub target_dir: String,
    pub mode: String,
    pub redirect_path: String,
}

/// Everything the index page can show.
#[derive(Debug, Default, Clone)]
pub struct IndexPage {
    pub result: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    pub source_dir: String,
    pub target_dir: String,
    pub mode: String,
    pub redirect_path: String,
}

impl From<IndexQuery> for IndexPage {
    fn from(query: IndexQuery) -> Self {
        Self {
            result: query.result.filter(|r| !r.is_empty()),
            success: query.success.as_deref() == Some("true"),
            error: None,
            source_dir: query.source_dir,
            target_dir: query.target_dir,
            mode: query.mode,
            redirect_path: query.redirect_path,
        }
    }
}

pub async fn index(Query(query): Query<IndexQuery>) -> Html<String> {
    Html(render(&IndexPage::from(query)).into_string())
}

pub fn render(page: &IndexPage) -> Markup {
    let mode = if page.mode.is_empty() { "rename" } else { page.mode.as_str() };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (TITLE) }
                link rel="stylesheet" href="/static/css/style.css";
            }
            body {
                main.container {
                    h1 { (TITLE) }
                    p.subtitle { "Organize video files as Series.SxxExx by renaming, linking or moving them." }

                    @if let Some(error) = &page.error {
                        div.alert.alert-error #error { (error) }
                    }

                    form #process-form method="post" action="/api/process" {
                        div.field {
                            label for="sourceDir" { "Video directory" }
                            input #sourceDir type="text" name="sourceDir" value=(page.source_dir)
                                placeholder="/data/downloads/Show" required;
                        }
                        div.field {
                            label for="mode" { "Mode" }
                            select #mode name="mode" {
                                @for (value, label) in MODES {
                                    option value=(value) selected[mode == value] { (label) }
                                }
                            }
                        }
                        div.field #target-field {
                            label for="targetDir" { "Target directory" }
                            input #targetDir type="text" name="targetDir" value=(page.target_dir)
                                placeholder="/media/tv";
                        }
                        div.field #redirect-field {
                            label for="redirectPath" { "Redirect path (optional)" }
                            input #redirectPath type="text" name="redirectPath" value=(page.redirect_path)
                                placeholder="/mnt/media";
                        }
                        button type="submit" { "Process" }
                    }

                    @if page.success {
                        @if let Some(result) = &page.result {
                            section.result {
                                h2 { "Result" }
                                pre #result { (result) }
                            }
                        }
                    }
                }
                script src="/static/js/directory-browser.js" {}
            }
        }
    }
}
