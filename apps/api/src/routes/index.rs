use axum::extract::State;
use axum::response::Html;
use tracing::warn;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// GET /
///
/// The screening page, titled with the latest job posting.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let title = match state.jobs.latest().await {
        Ok(Some(job)) => job.title,
        Ok(None) => String::new(),
        Err(e) => {
            warn!("Could not read job postings for the index page: {e}");
            String::new()
        }
    };
    render_index(&title)
}

pub fn render_index(job_title: &str) -> Html<String> {
    Html(INDEX_HTML.replace("{{ job_title }}", &escape_html(job_title)))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_title_is_escaped() {
        let Html(page) = render_index("R&D <Lead>");
        assert!(page.contains("R&amp;D &lt;Lead&gt;"));
        assert!(!page.contains("{{ job_title }}"));
    }
}
