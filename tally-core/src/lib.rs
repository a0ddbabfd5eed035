//! tally-core: transaction types, the in-memory store, and the keyword classifier

pub mod category;
pub mod keywords;
pub mod store;
pub mod summary;
pub mod transaction;

pub use category::{Category, CategoryParseError};
pub use keywords::{classify, Classifier, KeywordClassifier, KEYWORD_TABLE};
pub use store::{StoreError, TransactionStore};
pub use summary::SpendingSummary;
pub use transaction::{NewTransaction, Transaction, TransactionId, TransactionUpdate};
