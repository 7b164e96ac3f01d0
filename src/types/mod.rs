use serde::Serialize;

pub mod api;

/// Data for `paste.html`, built fresh for every request.
#[derive(Serialize)]
pub struct PastePage {
    pub address: String,
    pub text_highlighted: String,
    pub line_count: u32,
    /// Gutter text, one number per line of the paste.
    pub line_numbers: String,
    pub lang: String,
}

impl PastePage {
    /// Number the lines actually present in `text`, never more than the
    /// reported `line_count`.
    pub fn line_numbers(text: &str, line_count: u32) -> String {
        let lines = text.lines().count().max(1).min(line_count as usize);
        (1..=lines)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Data for `message.html`.
#[derive(Serialize)]
pub struct MessagePage {
    pub message: String,
    pub include_home: bool,
}

impl MessagePage {
    pub fn not_found() -> Self {
        MessagePage {
            message: "404 Page not found".into(),
            include_home: true,
        }
    }
}
