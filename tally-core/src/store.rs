//! In-memory transaction store.
//!
//! Records are kept in insertion order. Ids come from a counter owned by the
//! store, so an id freed by `delete` is never handed out again.

use thiserror::Error;

use crate::category::Category;
use crate::transaction::{NewTransaction, Transaction, TransactionId, TransactionUpdate};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("transaction {0} not found")]
    NotFound(TransactionId),

    #[error("amount must be a finite, non-negative number (got {0})")]
    InvalidAmount(f64),
}

#[derive(Debug, Clone)]
pub struct TransactionStore {
    records: Vec<Transaction>,
    next_id: u64,
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Assign the next id and append to the end.
    pub fn append(&mut self, new: NewTransaction) -> Result<&Transaction, StoreError> {
        check_amount(new.amount)?;
        Ok(self.push(new))
    }

    /// Append every row, or none of them if any row is invalid.
    pub fn append_all(
        &mut self,
        rows: Vec<NewTransaction>,
    ) -> Result<Vec<TransactionId>, StoreError> {
        for row in &rows {
            check_amount(row.amount)?;
        }
        Ok(rows.into_iter().map(|row| self.push(row).id).collect())
    }

    pub fn get(&self, id: TransactionId) -> Result<&Transaction, StoreError> {
        self.records
            .iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Change description, amount and/or category in place.
    pub fn update(
        &mut self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<&Transaction, StoreError> {
        if let Some(amount) = update.amount {
            check_amount(amount)?;
        }
        let record = self
            .records
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(description) = update.description {
            record.description = description;
        }
        if let Some(amount) = update.amount {
            record.amount = amount;
        }
        if let Some(category) = update.category {
            record.category = category;
        }
        Ok(record)
    }

    /// Remove and return the record.
    pub fn delete(&mut self, id: TransactionId) -> Result<Transaction, StoreError> {
        let pos = self
            .records
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.records.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.records.iter()
    }

    pub fn filter_by_category(&self, category: Category) -> impl Iterator<Item = &Transaction> {
        self.records.iter().filter(move |t| t.category == category)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push(&mut self, new: NewTransaction) -> &Transaction {
        let id = TransactionId(self.next_id);
        self.next_id += 1;
        self.records.push(Transaction {
            id,
            date: new.date,
            description: new.description,
            amount: new.amount,
            category: new.category,
        });
        &self.records[self.records.len() - 1]
    }
}

fn check_amount(amount: f64) -> Result<(), StoreError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::InvalidAmount(amount))
    }
}
