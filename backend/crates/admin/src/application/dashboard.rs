//! Dashboard & Reporting Queries

use std::sync::Arc;

use auth::domain::entity::audit_log::AuditLog;
use auth::domain::repository::{AuditLogFilter, AuditLogRepository};
use kernel::page::{PageMeta, PageQuery};

use crate::domain::repository::{
    DashboardRepository, DashboardStats, TransactionEntry, TransactionFilter,
    TransactionRepository,
};
use crate::error::AdminResult;

/// Read-only admin reporting use case
pub struct AdminReports<D, R>
where
    D: DashboardRepository + TransactionRepository,
    R: AuditLogRepository + Send + Sync + 'static,
{
    repo: Arc<D>,
    audit_logs: Arc<R>,
}

impl<D, R> AdminReports<D, R>
where
    D: DashboardRepository + TransactionRepository,
    R: AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<D>, audit_logs: Arc<R>) -> Self {
        Self { repo, audit_logs }
    }

    pub async fn dashboard(&self) -> AdminResult<DashboardStats> {
        self.repo.dashboard_stats().await
    }

    /// Transactions, newest first, optionally filtered by kind/status.
    pub async fn transactions(
        &self,
        filter: &TransactionFilter,
        page: &PageQuery,
    ) -> AdminResult<(Vec<TransactionEntry>, PageMeta)> {
        let (entries, total) = self.repo.list_transactions(filter, page).await?;
        Ok((entries, PageMeta::new(page, total)))
    }

    /// Audit trail, newest first, optionally filtered by action and
    /// entity type.
    pub async fn audit_logs(
        &self,
        filter: &AuditLogFilter,
        page: &PageQuery,
    ) -> AdminResult<(Vec<AuditLog>, PageMeta)> {
        let (entries, total) = self.audit_logs.list(filter, page).await?;
        Ok((entries, PageMeta::new(page, total)))
    }
}
