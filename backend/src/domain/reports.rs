//! Read models for the role dashboards, the reports overview and the
//! notifications centre.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use futures_util::try_join;
use mockable::{Clock, DefaultClock};
use serde::Serialize;

use crate::domain::ports::{
    ApprovalFilter, AssetGrouping, AssetOrder, AssetQuery, GroupCount, LicenseOrder,
    LicenseQuery, MaintenanceOrder, MaintenanceQuery,
};
use crate::domain::{
    Asset, DateRange, Employee, Error, InventoryPorts, Maintenance, Money, SoftwareLicense, User,
};

/// Rows shown in each dashboard list.
pub const DASHBOARD_LIST_LIMIT: i64 = 5;
/// Look-ahead of the notifications centre.
pub const CENTRE_WINDOW_DAYS: u32 = 30;
/// Rows per list in the notifications centre.
pub const CENTRE_LIST_LIMIT: i64 = 20;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One calendar-month bucket, aggregated across years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket<T> {
    pub month: &'static str,
    pub value: T,
}

/// A group-by bucket with nulls shown as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledCount {
    pub label: String,
    pub count: i64,
}

impl From<GroupCount> for LabelledCount {
    fn from(value: GroupCount) -> Self {
        Self {
            label: value.display_label().to_owned(),
            count: value.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsOverview {
    pub total_assets: i64,
    pub total_employees: i64,
    pub total_licenses: i64,
    pub maintenance_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    #[serde(flatten)]
    pub totals: ReportsOverview,
    pub pending_maintenance: Vec<Maintenance>,
    pub recent_approved: Vec<Maintenance>,
    pub assets_by_type: Vec<LabelledCount>,
    pub monthly_costs: Vec<MonthBucket<Money>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItDashboard {
    pub recent_maintenance: Vec<Maintenance>,
    pub assets_in_repair: i64,
    pub licenses_expiring: Vec<SoftwareLicense>,
    pub license_expiry_by_month: Vec<MonthBucket<i64>>,
    pub monthly_costs: Vec<MonthBucket<Money>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboard {
    pub total_assets: i64,
    pub maintenance_cost: Money,
    pub licenses_expiring: Vec<SoftwareLicense>,
    pub warranties_expiring: Vec<Asset>,
    pub license_count: i64,
    pub assets_by_status: Vec<LabelledCount>,
}

/// Assets held by the employee record matching the user's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub employee: Option<Employee>,
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCentre {
    pub window_days: u32,
    pub licenses_expiring: Vec<SoftwareLicense>,
    pub warranties_expiring: Vec<Asset>,
}

/// Aggregations over the inventory repositories.
#[derive(Clone)]
pub struct ReportService {
    ports: InventoryPorts,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(ports: InventoryPorts) -> Self {
        Self {
            ports,
            clock: Arc::new(DefaultClock),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    pub async fn overview(&self) -> Result<ReportsOverview, Error> {
        let all_assets = AssetQuery::default();
        let all_licenses = LicenseQuery::default();
        let (total_assets, total_employees, total_licenses, maintenance_count) = try_join!(
            self.ports.assets.count(&all_assets),
            self.ports.employees.count(),
            self.ports.licenses.count(&all_licenses),
            self.ports.maintenance.count(),
        )?;
        Ok(ReportsOverview {
            total_assets,
            total_employees,
            total_licenses,
            maintenance_count,
        })
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, Error> {
        let totals = self.overview().await?;
        let pending_maintenance = self
            .ports
            .maintenance
            .list(&MaintenanceQuery {
                approval: Some(ApprovalFilter::Pending),
                order: MaintenanceOrder::DateDesc,
                limit: Some(DASHBOARD_LIST_LIMIT),
            })
            .await?;
        let recent_approved = self
            .ports
            .maintenance
            .list(&MaintenanceQuery {
                approval: Some(ApprovalFilter::Approved),
                order: MaintenanceOrder::ApprovedAtDesc,
                limit: Some(DASHBOARD_LIST_LIMIT),
            })
            .await?;
        let assets_by_type = self
            .ports
            .assets
            .group_count(AssetGrouping::Type)
            .await?
            .into_iter()
            .map(LabelledCount::from)
            .collect();
        Ok(AdminDashboard {
            totals,
            pending_maintenance,
            recent_approved,
            assets_by_type,
            monthly_costs: self.monthly_costs().await?,
        })
    }

    pub async fn it_dashboard(&self) -> Result<ItDashboard, Error> {
        let recent_maintenance = self
            .ports
            .maintenance
            .list(&MaintenanceQuery {
                approval: None,
                order: MaintenanceOrder::DateDesc,
                limit: Some(DASHBOARD_LIST_LIMIT),
            })
            .await?;
        let assets_in_repair = self
            .ports
            .assets
            .count(&AssetQuery {
                status: Some("Repair".to_owned()),
                ..AssetQuery::default()
            })
            .await?;
        let upcoming = self
            .ports
            .licenses
            .list(&LicenseQuery {
                expiring_from: Some(self.today()),
                ..LicenseQuery::default()
            })
            .await?;
        Ok(ItDashboard {
            recent_maintenance,
            assets_in_repair,
            licenses_expiring: self.soonest_licenses().await?,
            license_expiry_by_month: license_expiry_by_month(&upcoming),
            monthly_costs: self.monthly_costs().await?,
        })
    }

    pub async fn manager_dashboard(&self) -> Result<ManagerDashboard, Error> {
        let total_assets = self.ports.assets.count(&AssetQuery::default()).await?;
        let maintenance_cost = self.ports.maintenance.total_cost().await?;
        let warranties_expiring = self
            .ports
            .assets
            .list(&AssetQuery {
                order: AssetOrder::WarrantyExpiryAsc,
                limit: Some(DASHBOARD_LIST_LIMIT),
                ..AssetQuery::default()
            })
            .await?;
        let license_count = self.ports.licenses.count(&LicenseQuery::default()).await?;
        let assets_by_status = self
            .ports
            .assets
            .group_count(AssetGrouping::Status)
            .await?
            .into_iter()
            .map(LabelledCount::from)
            .collect();
        Ok(ManagerDashboard {
            total_assets,
            maintenance_cost,
            licenses_expiring: self.soonest_licenses().await?,
            warranties_expiring,
            license_count,
            assets_by_status,
        })
    }

    /// Match the user to an employee by contact, case-insensitively.
    pub async fn employee_dashboard(&self, user: &User) -> Result<EmployeeDashboard, Error> {
        let Some(employee) = self.ports.employees.find_by_contact(user.email()).await? else {
            return Ok(EmployeeDashboard {
                employee: None,
                assets: Vec::new(),
            });
        };
        let assets = self
            .ports
            .assets
            .list(&AssetQuery {
                assigned_to: Some(employee.id),
                ..AssetQuery::default()
            })
            .await?;
        Ok(EmployeeDashboard {
            employee: Some(employee),
            assets,
        })
    }

    pub async fn notification_centre(&self) -> Result<NotificationCentre, Error> {
        let window = DateRange::days_from(self.today(), CENTRE_WINDOW_DAYS);
        let licenses_expiring = self
            .ports
            .licenses
            .list(&LicenseQuery {
                limit: Some(CENTRE_LIST_LIMIT),
                ..LicenseQuery::expiring(window)
            })
            .await?;
        let warranties_expiring = self
            .ports
            .assets
            .list(&AssetQuery {
                limit: Some(CENTRE_LIST_LIMIT),
                ..AssetQuery::warranty_expiring(window)
            })
            .await?;
        Ok(NotificationCentre {
            window_days: CENTRE_WINDOW_DAYS,
            licenses_expiring,
            warranties_expiring,
        })
    }

    async fn soonest_licenses(&self) -> Result<Vec<SoftwareLicense>, Error> {
        Ok(self
            .ports
            .licenses
            .list(&LicenseQuery {
                order: LicenseOrder::ExpiryAsc,
                limit: Some(DASHBOARD_LIST_LIMIT),
                ..LicenseQuery::default()
            })
            .await?)
    }

    async fn monthly_costs(&self) -> Result<Vec<MonthBucket<Money>>, Error> {
        let records = self
            .ports
            .maintenance
            .list(&MaintenanceQuery::default())
            .await?;
        Ok(monthly_costs(&records))
    }
}

/// Sum of costs per calendar month; undated records are left out.
pub fn monthly_costs(records: &[Maintenance]) -> Vec<MonthBucket<Money>> {
    let mut totals = [Money::ZERO; 12];
    for record in records {
        if let Some(date) = record.date {
            let slot = &mut totals[date.month0() as usize];
            *slot = slot.saturating_add(record.cost);
        }
    }
    MONTHS
        .into_iter()
        .zip(totals)
        .map(|(month, value)| MonthBucket { month, value })
        .collect()
}

/// Licences per expiry month; licences without a date are left out.
pub fn license_expiry_by_month(licenses: &[SoftwareLicense]) -> Vec<MonthBucket<i64>> {
    let mut counts = [0_i64; 12];
    for date in licenses.iter().filter_map(|license| license.expiry_date) {
        counts[date.month0() as usize] += 1;
    }
    MONTHS
        .into_iter()
        .zip(counts)
        .map(|(month, value)| MonthBucket { month, value })
        .collect()
}
