use serde::{Deserialize, Serialize};

/// Body of `POST /paste`. Missing fields default to blank so they fail
/// validation instead of decoding.
#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePaste {
    pub text: String,
    pub lang: String,
    pub line_count: u32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedPaste {
    pub address: String,
}
