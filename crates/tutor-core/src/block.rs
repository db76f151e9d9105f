//! Response blocks exchanged with the frontend.

use serde::{Deserialize, Serialize};

/// Balise of a course/explanation text block.
pub const BALISE_COURS: &str = "cours";
/// Balise of a block whose text is an image data URI.
pub const BALISE_MEDIA_IMAGE: &str = "media_image";

/// A tagged piece of content: `{balise, text}`.
///
/// The balise tells the frontend how to render `text`; for
/// [`BALISE_MEDIA_IMAGE`] the text is a `data:image/png;base64,...` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub balise: String,
    pub text: String,
}

impl Block {
    pub fn new(balise: impl Into<String>, text: impl Into<String>) -> Self {
        Block {
            balise: balise.into(),
            text: text.into(),
        }
    }

    pub fn cours(text: impl Into<String>) -> Self {
        Block::new(BALISE_COURS, text)
    }

    pub fn media_image(data_uri: impl Into<String>) -> Self {
        Block::new(BALISE_MEDIA_IMAGE, data_uri)
    }

    pub fn is_image(&self) -> bool {
        self.balise == BALISE_MEDIA_IMAGE
    }
}
