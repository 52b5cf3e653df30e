//! Transaction Read Model
//!
//! Transactions are written by the investment paths, which live outside
//! this service. Admin only reads them for reporting.

use chrono::{DateTime, Utc};
use kernel::id::{TransactionId, UserId};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    /// Free-form kind code written by the originating path
    /// (e.g. "investment", "deposit", "withdrawal").
    pub kind: String,
    pub status: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}
