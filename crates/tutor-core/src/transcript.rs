//! Role-annotated transcripts.
//!
//! A block's text may hold several turns. Turns end with `$END$`; a turn may
//! start with a `[$role$]` marker, otherwise it is attributed to the user:
//!
//! ```text
//! [$fixedquestion$] What would you like to work on today? $END$
//! I'm working on Markov chains. $END$
//! ```

use serde::Serialize;

const ROLE_OPEN: &str = "[$";
const ROLE_CLOSE: &str = "$]";
const TURN_END: &str = "$END$";

/// Role used for turns without a marker.
pub const DEFAULT_ROLE: &str = "user";

/// One turn of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub role: String,
    pub message: String,
}

/// Splits `text` into turns. Empty messages are dropped.
pub fn parse_transcript(text: &str) -> Vec<Turn> {
    text.split(TURN_END).filter_map(parse_turn).collect()
}

fn parse_turn(segment: &str) -> Option<Turn> {
    let (role, message) = match (segment.find(ROLE_OPEN), segment.find(ROLE_CLOSE)) {
        (Some(open), Some(close)) => {
            let start = open + ROLE_OPEN.len();
            let role = if close >= start {
                segment[start..close].trim()
            } else {
                ""
            };
            (role, segment[close + ROLE_CLOSE.len()..].trim())
        }
        _ => (DEFAULT_ROLE, segment.trim()),
    };

    if message.is_empty() {
        return None;
    }
    let role = if role.is_empty() { DEFAULT_ROLE } else { role };
    Some(Turn {
        role: role.to_string(),
        message: message.to_string(),
    })
}
