//! Minimal web form for batch searches.
//!
//! A textarea takes newline-separated search terms; a checkbox restricts the
//! search to the last 10 years. Results across all terms are listed on one
//! page and exported to a single combined CSV. Warnings and errors travel
//! back to the form as a `message` query parameter.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use chrono::{Datelike, Local};
use serde::Deserialize;
use tracing::error;

use crate::client::{OpenAlexClient, DEFAULT_LIMIT};
use crate::export::export_to_csv;
use crate::models::Paper;

/// How far back "recent only" reaches, in years
const RECENT_YEARS: i32 = 10;

/// Shared state for the web handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OpenAlexClient>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/search", get(search))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct FlashParams {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    search_terms: String,
    recent_only: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    terms: String,
    min_year: Option<i32>,
}

async fn index(Query(flash): Query<FlashParams>) -> Html<String> {
    Html(render_form(flash.message.as_deref()))
}

async fn submit(Form(form): Form<SearchForm>) -> Redirect {
    let terms = parse_terms(&form.search_terms);
    if terms.is_empty() {
        return redirect_with_message("Please enter at least one search term");
    }

    let mut target = format!("/search?terms={}", urlencoding::encode(&terms.join(",")));
    if form.recent_only.is_some() {
        let min_year = Local::now().year() - RECENT_YEARS;
        target.push_str(&format!("&min_year={min_year}"));
    }
    Redirect::to(&target)
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let terms = parse_terms(&params.terms);
    if terms.is_empty() {
        return redirect_with_message("Please enter at least one search term").into_response();
    }

    let mut all_papers = Vec::new();
    for term in &terms {
        match state
            .client
            .top_cited(term, DEFAULT_LIMIT, params.min_year)
            .await
        {
            Ok(papers) => all_papers.extend(papers),
            Err(err) => {
                error!(term = %term, error = %err, "search failed");
                return redirect_with_message(&format!("Error performing search: {err}"))
                    .into_response();
            }
        }
    }

    if all_papers.is_empty() {
        return redirect_with_message("No papers found matching your search criteria")
            .into_response();
    }

    match export_to_csv(&all_papers, "batch_search") {
        Ok(path) => Html(render_results(
            &terms,
            &all_papers,
            &path.display().to_string(),
        ))
        .into_response(),
        Err(err) => {
            error!(error = %err, "CSV export failed");
            redirect_with_message(&format!("Error exporting results: {err}")).into_response()
        }
    }
}

/// Split newline-separated input into trimmed, non-empty terms.
///
/// Also accepts the comma-separated form used in the redirect URL.
fn parse_terms(input: &str) -> Vec<String> {
    input
        .split(['\n', ','])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn redirect_with_message(message: &str) -> Redirect {
    Redirect::to(&format!("/?message={}", urlencoding::encode(message)))
}

fn render_form(message: Option<&str>) -> String {
    let flash = message
        .map(|m| format!("<p class=\"flash\">{}</p>", escape_html(m)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>citescout</title></head>\n<body>\n\
         <h1>Top Cited Papers</h1>\n{flash}\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"search_terms\">Search terms (one per line)</label><br>\n\
         <textarea id=\"search_terms\" name=\"search_terms\" rows=\"5\" cols=\"50\"></textarea><br>\n\
         <label><input type=\"checkbox\" name=\"recent_only\"> \
         Only show papers from the last {RECENT_YEARS} years</label><br>\n\
         <button type=\"submit\">Search</button>\n\
         </form>\n</body>\n</html>"
    )
}

fn render_results(terms: &[String], papers: &[Paper], output_file: &str) -> String {
    let mut rows = String::new();
    for paper in papers {
        let title = if paper.url.is_empty() {
            escape_html(&paper.title)
        } else {
            format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&paper.url),
                escape_html(&paper.title)
            )
        };
        rows.push_str(&format!(
            "<tr><td>{title}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&paper.author_names()),
            paper.citation_count,
            paper.publication_year,
            escape_html(&paper.search_term),
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>citescout results</title></head>\n<body>\n\
         <h1>Results for: {}</h1>\n\
         <p>{} papers found. Exported to <code>{}</code>.</p>\n\
         <table border=\"1\">\n\
         <tr><th>Title</th><th>Authors</th><th>Citations</th><th>Year</th><th>Search Term</th></tr>\n\
         {rows}</table>\n\
         <p><a href=\"/\">New search</a></p>\n</body>\n</html>",
        escape_html(&terms.join(", ")),
        papers.len(),
        escape_html(output_file),
    )
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms_newline_separated() {
        let terms = parse_terms("graphene\n  deep learning \n\nquantum dots\n");
        assert_eq!(terms, vec!["graphene", "deep learning", "quantum dots"]);
    }

    #[test]
    fn test_parse_terms_comma_separated() {
        let terms = parse_terms("graphene,deep learning");
        assert_eq!(terms, vec!["graphene", "deep learning"]);
    }

    #[test]
    fn test_parse_terms_empty_input() {
        assert!(parse_terms("").is_empty());
        assert!(parse_terms(" \n \n ").is_empty());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"a & b\"</b>"),
            "&lt;b&gt;&quot;a &amp; b&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_form_includes_flash_message() {
        let page = render_form(Some("No papers found"));
        assert!(page.contains("No papers found"));
        assert!(page.contains("<textarea"));
    }
}
