//! Per-run application state: the transaction store plus the classifier used
//! to categorize new entries. Created at start-up and dropped on exit.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::path::Path;
use tally_core::{
    Category, Classifier, NewTransaction, SpendingSummary, Transaction, TransactionId,
    TransactionStore, TransactionUpdate,
};

pub struct Session {
    store: TransactionStore,
    classifier: Box<dyn Classifier>,
}

impl Session {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self {
            store: TransactionStore::new(),
            classifier,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn categorize(&self, description: &str) -> Category {
        self.classifier.classify(description)
    }

    /// Record one expense. `category: None` asks the classifier.
    pub fn add(
        &mut self,
        date: NaiveDate,
        description: &str,
        amount: f64,
        category: Option<Category>,
    ) -> Result<&Transaction> {
        let description = description.trim();
        if description.is_empty() {
            bail!("description must not be empty");
        }
        if amount.is_nan() || amount <= 0.0 {
            bail!("amount must be greater than zero");
        }
        let category = category.unwrap_or_else(|| self.categorize(description));
        let new = NewTransaction::new(date, description, amount, category);
        Ok(self.store.append(new)?)
    }

    /// Import a headerless `date,description,amount` file.
    ///
    /// The file is validated in full before anything is stored; rows are then
    /// categorized one at a time in file order and appended together.
    pub fn import_csv(&mut self, path: &Path) -> Result<Vec<TransactionId>> {
        let rows = tally_ingest::parse_csv_path(path)?;
        tracing::info!(rows = rows.len(), path = %path.display(), "importing");

        let new: Vec<NewTransaction> = rows
            .into_iter()
            .map(|row| {
                let category = self.categorize(&row.description);
                NewTransaction::new(row.date, row.description, row.amount, category)
            })
            .collect();

        Ok(self.store.append_all(new)?)
    }

    pub fn get(&self, id: TransactionId) -> Result<&Transaction> {
        Ok(self.store.get(id)?)
    }

    pub fn update(&mut self, id: TransactionId, update: TransactionUpdate) -> Result<&Transaction> {
        if update.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            bail!("description must not be empty");
        }
        Ok(self.store.update(id, update)?)
    }

    pub fn delete(&mut self, id: TransactionId) -> Result<Transaction> {
        Ok(self.store.delete(id)?)
    }

    /// All transactions, or those of one category, in insertion order.
    pub fn history(&self, filter: Option<Category>) -> Vec<&Transaction> {
        match filter {
            Some(category) => self.store.filter_by_category(category).collect(),
            None => self.store.iter().collect(),
        }
    }

    pub fn summary(&self) -> SpendingSummary {
        SpendingSummary::from_transactions(self.store.iter())
    }
}
