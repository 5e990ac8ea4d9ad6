use axum::{body::Body, response::Response};
use maud::Markup;
use scraper::{Html, Selector};

async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

/// Parse a rendered view without going through a response.
pub(crate) fn parse_markup(markup: Markup) -> Html {
    Html::parse_fragment(&markup.into_string())
}

/// The trimmed text of every element matching `selector`, in document order.
pub(crate) fn texts(html: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).unwrap();

    html.select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .collect()
}

/// The trimmed text of the first element matching `selector`, or an empty
/// string if nothing matches.
pub(crate) fn text_of(html: &Html, selector: &str) -> String {
    texts(html, selector).into_iter().next().unwrap_or_default()
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}
