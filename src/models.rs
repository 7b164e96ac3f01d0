use chrono::Local;
use sqlx::FromRow;

/// Format of [`Paste::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Paste {
    pub id: i64,
    pub text: String,
    pub lang: String,
    pub line_count: u32,
    #[sqlx(rename = "addr")]
    pub address: String,
    #[sqlx(rename = "created_at")]
    pub timestamp: String,
}

/// A paste that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPaste {
    pub text: String,
    pub lang: String,
    pub line_count: u32,
    pub address: String,
    pub timestamp: String,
}

impl NewPaste {
    /// Stamp a new paste with the current local time.
    pub fn now(text: String, lang: String, line_count: u32, address: String) -> Self {
        NewPaste {
            text,
            lang,
            line_count,
            address,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn into_paste(self, id: i64) -> Paste {
        Paste {
            id,
            text: self.text,
            lang: self.lang,
            line_count: self.line_count,
            address: self.address,
            timestamp: self.timestamp,
        }
    }
}
