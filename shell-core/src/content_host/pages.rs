use axum::{extract::State, response::Html};

use super::{auth::AuthToken, error::ApiError, AppState};

/// Placeholder replaced with the current token when the host page is served
pub const TOKEN_PLACEHOLDER: &str = "{{ token }}";

pub fn render_host_page(template: &str, token: &AuthToken) -> String {
    template.replace(TOKEN_PLACEHOLDER, token.as_str())
}

/// GET / and GET /<entry_page> - host page with the token injected
///
/// The template is read on every request so edits show up on reload.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let template = state
        .web_root
        .read_to_string(&state.entry_page)
        .await
        .map_err(ApiError::PageUnavailable)?;

    Ok(Html(render_host_page(&template, &state.token)))
}
