pub mod block;
pub mod catalog;
pub mod conversation;
pub mod demo;
pub mod error;
pub mod expr;
pub mod plot;
pub mod progress;
pub mod transcript;

// Re-export commonly used types
pub use block::{Block, BALISE_COURS, BALISE_MEDIA_IMAGE};
pub use conversation::{BlockId, Conversation};
pub use error::{ExprError, PlotError};
pub use expr::{Expr, Samples};
pub use progress::{ProgressRules, ProgressSession, ProgressUpdate};
