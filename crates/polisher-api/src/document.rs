//! Shared HTML layout for the upload pages

use axum::response::Html;

const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";

/// Wrap `child` in the site layout: title, stylesheet and navigation header.
pub fn view(child: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <title>Demo Polisher</title>
        <link rel="stylesheet" href="{PICO_CSS}" />
        <meta name="viewport" content="width=device-width, initial-scale=1" />
    </head>
    <body>
        <header class="container">
            <nav>
                <ul>
                    <li><a href="/">Demo Polisher</a></li>
                </ul>
            </nav>
        </header>
        {child}
    </body>
</html>
"#
    )
}

pub fn response(child: &str) -> Html<String> {
    Html(view(child))
}
