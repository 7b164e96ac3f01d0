use tracing::{info, warn};

use crate::address;
use crate::models::{NewPaste, Paste};
use crate::storage::Store;
use crate::{App, AppError};

/// How many addresses to try before giving up on collisions.
const MAX_ADDRESS_ATTEMPTS: usize = 3;

/// Store a new paste and return its address.
pub async fn create(
    app: &App,
    text: String,
    lang: String,
    line_count: u32,
) -> crate::AppResult<String> {
    let mut paste = NewPaste::now(text, lang, line_count, String::new());

    for attempt in 1..=MAX_ADDRESS_ATTEMPTS {
        paste.address = address::for_paste(app.config.address_length, &paste.lang)?;

        match app.store.create(&paste).await {
            Ok(paste) => {
                info!(
                    "new paste: address='{}', lang='{}', lines={}, size={}",
                    paste.address,
                    paste.lang,
                    paste.line_count,
                    paste.text.len()
                );
                return Ok(paste.address);
            }
            Err(AppError::AddressTaken) => {
                warn!(attempt, address = %paste.address, "address collision");
            }
            Err(err) => return Err(err),
        }
    }

    Err(AppError::AddressTaken)
}

/// Look up a paste by address; `None` when there is no such paste.
pub async fn get(app: &App, address: &str) -> crate::AppResult<Option<Paste>> {
    app.store.get(address).await
}

/// Highlight a paste's text as an HTML fragment.
pub fn render(app: &App, paste: &Paste) -> crate::AppResult<String> {
    app.highlighter.highlight(&paste.lang, &paste.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::memory_app;

    #[tokio::test]
    async fn created_pastes_round_trip() {
        let app = memory_app(10);

        let address = create(&app, "Hello world!".into(), "text".into(), 1)
            .await
            .unwrap();
        let (token, lang) = address.split_once('.').unwrap();
        assert_eq!(token.len(), 10);
        assert_eq!(lang, "text");

        let paste = get(&app, &address).await.unwrap().unwrap();
        assert_eq!(paste.text, "Hello world!");
        assert_eq!(paste.lang, "text");
        assert_eq!(paste.line_count, 1);
        assert_eq!(paste.timestamp.len(), "2006-01-02 15:04:05".len());
    }

    #[tokio::test]
    async fn unknown_address_is_none() {
        let app = memory_app(10);
        assert!(get(&app, "nothing.text").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn collisions_give_up_after_a_few_attempts() {
        // a single letter token leaves 52 possible addresses
        let app = memory_app(1);
        let mut taken = 0;
        for _ in 0..200 {
            match create(&app, "x".into(), "text".into(), 1).await {
                Ok(_) => taken += 1,
                Err(AppError::AddressTaken) => {}
                Err(err) => panic!("{err:?}"),
            }
        }
        assert!(taken <= 52);
        assert!(get(&app, "a.text").await.is_ok());
    }

    #[tokio::test]
    async fn render_highlights_text() {
        let app = memory_app(10);
        let address = create(&app, "let x = 1;".into(), "rs".into(), 1)
            .await
            .unwrap();
        let paste = get(&app, &address).await.unwrap().unwrap();

        let html = render(&app, &paste).unwrap();
        assert!(html.contains("<span"), "{html}");
        assert!(html.contains("let"), "{html}");
    }
}
