pub mod conversation;
pub mod rules;

pub use conversation::{advance, is_affirmative, ConversationContext, Reply, Stage, Turn};
pub use rules::{business_category, extract, BusinessCategory, BusinessKind, Extraction};
