use crate::ports::RentalStatus;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::errors::{RentalApplicationError, Result};
use super::rental_service::ServiceDependencies;

/// 管理者ダッシュボード用のレンタル集計
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentalStatistics {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub completed: usize,
    /// 判断済み（承認・完了・却下）のうち承認された割合（%、小数1桁）
    ///
    /// 判断済みのレンタルがなければ`None`。
    pub approval_rate: Option<Decimal>,
}

impl RentalStatistics {
    /// ステータスの列から集計する
    pub fn from_statuses(statuses: impl IntoIterator<Item = RentalStatus>) -> Self {
        let mut stats = RentalStatistics {
            total: 0,
            pending: 0,
            approved: 0,
            rejected: 0,
            completed: 0,
            approval_rate: None,
        };

        for status in statuses {
            stats.total += 1;
            match status {
                RentalStatus::Pending => stats.pending += 1,
                RentalStatus::Approved => stats.approved += 1,
                RentalStatus::Rejected => stats.rejected += 1,
                RentalStatus::Completed => stats.completed += 1,
            }
        }

        let granted = stats.approved + stats.completed;
        let decided = granted + stats.rejected;
        if decided > 0 {
            let rate = Decimal::from(granted as u64) * Decimal::ONE_HUNDRED
                / Decimal::from(decided as u64);
            stats.approval_rate =
                Some(rate.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero));
        }

        stats
    }
}

/// 全レンタルのステータス別件数と承認率を集計する
pub async fn rental_statistics(deps: &ServiceDependencies) -> Result<RentalStatistics> {
    let rentals = deps
        .rental_read_model
        .list(None)
        .await
        .map_err(RentalApplicationError::ReadModelError)?;

    Ok(RentalStatistics::from_statuses(
        rentals.iter().map(|view| view.status),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_counts_each_status() {
        let stats = RentalStatistics::from_statuses([
            RentalStatus::Pending,
            RentalStatus::Pending,
            RentalStatus::Approved,
            RentalStatus::Rejected,
            RentalStatus::Completed,
        ]);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_approval_rate_rounds_to_one_decimal() {
        let stats = RentalStatistics::from_statuses([
            RentalStatus::Approved,
            RentalStatus::Rejected,
            RentalStatus::Rejected,
        ]);
        assert_eq!(stats.approval_rate, Some(Decimal::new(333, 1)));
    }

    #[test]
    fn test_approval_rate_ignores_pending() {
        let stats = RentalStatistics::from_statuses([RentalStatus::Pending]);
        assert_eq!(stats.approval_rate, None);

        let stats =
            RentalStatistics::from_statuses([RentalStatus::Pending, RentalStatus::Completed]);
        assert_eq!(stats.approval_rate, Some(Decimal::ONE_HUNDRED));
    }
}
