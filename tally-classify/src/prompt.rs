//! Prompt text sent to the completion endpoint and validation of its reply.
//!
//! Both sides are built from `Category::ALL`, so the words the model is told
//! to use are exactly the words the reply is checked against.

use tally_core::Category;

pub fn system_instruction() -> String {
    format!(
        "You categorize household expenses. Descriptions are often Polish shop or \
         product names. Answer with exactly one word from this list: {}.",
        Category::vocabulary()
    )
}

pub fn user_message(description: &str) -> String {
    format!("Categorize the expense: \"{description}\"")
}

/// What a completion reply says about the category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMatch {
    /// Exactly one category name appears in the reply
    One(Category),
    /// No category name appears
    None,
    /// More than one category name appears
    Ambiguous(Vec<Category>),
}

/// Case-insensitive substring match of the reply against every category name.
pub fn match_category(reply: &str) -> ReplyMatch {
    let reply = reply.to_lowercase();
    let found: Vec<Category> = Category::ALL
        .into_iter()
        .filter(|c| reply.contains(&c.name().to_lowercase()))
        .collect();

    match found.as_slice() {
        [] => ReplyMatch::None,
        [only] => ReplyMatch::One(*only),
        _ => ReplyMatch::Ambiguous(found),
    }
}
