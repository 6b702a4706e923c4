//! Server-rendered question page

use axum::{extract::State, response::Html, Form};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;

use crate::error::Error;
use crate::server::state::AppState;
use crate::types::Answer;

/// Form posted by the question page
#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// GET / - Empty question form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state, "", String::new()))
}

/// POST /ask - Answer the submitted question
pub async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    let body = match state.pipeline().answer_question(&form.question).await {
        Ok(answer) => render_answer(&answer),
        Err(e) => {
            tracing::warn!("Question failed: {}", e);
            render_error(&e)
        }
    };
    Html(render_page(&state, &form.question, body))
}

fn render_page(state: &AppState, question: &str, body: String) -> String {
    let banner = if state.pipeline().credentials_available() {
        String::new()
    } else {
        format!(
            r#"<div class="banner warning">{} is not set. Questions cannot be answered until the API key is configured.</div>"#,
            encode_text(&state.config().llm.api_key_env)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>College Compass</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
.banner, .panel {{ padding: 0.75rem 1rem; border-radius: 6px; margin: 1rem 0; }}
.warning {{ background: #fff4ce; }}
.error {{ background: #fde7e9; }}
.answer {{ background: #eef6ee; }}
.sources li {{ margin-bottom: 0.75rem; }}
blockquote {{ color: #555; margin: 0.25rem 0 0 1rem; white-space: pre-wrap; }}
input[type=text] {{ width: 80%; padding: 0.5rem; }}
</style>
</head>
<body>
<h1>College Compass</h1>
<p>Ask a question about your course documents.</p>
{banner}
<form method="post" action="/ask">
<input type="text" name="question" value="{question}" placeholder="When is the midterm exam?" autofocus>
<button type="submit">Ask</button>
</form>
{body}
</body>
</html>
"#,
        banner = banner,
        question = encode_double_quoted_attribute(question),
        body = body
    )
}

fn render_answer(answer: &Answer) -> String {
    let mut html = format!(
        r#"<div class="panel answer"><h2>Answer</h2><p>{}</p></div>"#,
        encode_text(&answer.text).replace('\n', "<br>")
    );

    html.push_str(r#"<div class="panel sources"><h2>Sources</h2><ul>"#);
    for citation in answer.citations() {
        html.push_str(&format!(
            "<li>{}<blockquote>{}</blockquote></li>",
            encode_text(&citation.format_inline()),
            encode_text(&citation.snippet)
        ));
    }
    html.push_str("</ul></div>");
    html
}

fn render_error(error: &Error) -> String {
    let title = match error {
        Error::InvalidInput(_) => "Please enter a question",
        Error::EmptyStore { .. } => "Document index not built",
        Error::ModelMismatch { .. } => "Document index out of date",
        Error::Credential(_) => "API key problem",
        Error::Generation(_) => "Could not generate an answer",
        _ => "Something went wrong",
    };

    format!(
        r#"<div class="panel error {kind}"><h2>{title}</h2><p>{message}</p></div>"#,
        kind = error.kind(),
        title = title,
        message = encode_text(&error.user_message())
    )
}
