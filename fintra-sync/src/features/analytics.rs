use super::{labelled, Feature};
use async_trait::async_trait;
use fintra_client::RemoteDataService;
use fintra_core::{
    aggregate_items, spending_per_category, AggregatedItem, Expense, FintraResult, Money,
    NetWorthPoint, NetWorthRange, TopUp, Workspace,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Spending breakdowns and net-worth history over `range`.
#[derive(Debug, Clone, Copy)]
pub struct Analytics {
    pub range: NetWorthRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub expenses: Vec<Expense>,
    pub top_ups: Vec<TopUp>,
    pub net_worth_history: Vec<NetWorthPoint>,
}

impl AnalyticsSnapshot {
    pub fn spending_by_category(&self) -> BTreeMap<String, Money> {
        spending_per_category(&self.expenses)
    }

    pub fn top_items(&self) -> Vec<AggregatedItem> {
        aggregate_items(&self.expenses)
    }
}

#[async_trait]
impl Feature for Analytics {
    type Snapshot = AnalyticsSnapshot;
    const KEY: &'static str = "fintra_analytics_data";
    const NAME: &'static str = "Analytics";

    fn cache_feature(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            Self::KEY,
            self.range.start,
            self.range.end,
            self.range.interval.as_db_str()
        )
    }

    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<AnalyticsSnapshot> {
        self.range.validate()?;
        let id = workspace.id;
        let (expenses, top_ups, net_worth_history) = tokio::try_join!(
            labelled("Expenses", remote.get_expenses(id)),
            labelled("Top-ups", remote.get_top_ups(id)),
            labelled("Net worth", remote.get_net_worth_history(id, self.range)),
        )?;
        Ok(AnalyticsSnapshot {
            expenses,
            top_ups,
            net_worth_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cache_feature_includes_range() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let year = Analytics {
            range: NetWorthRange::trailing_year(today),
        };
        assert_eq!(
            year.cache_feature(),
            "fintra_analytics_data_2023-06-30_2024-06-30_month"
        );

        let mut daily = year;
        daily.range.interval = fintra_core::NetWorthInterval::Day;
        assert_ne!(year.cache_feature(), daily.cache_feature());
    }
}
