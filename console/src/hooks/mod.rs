pub mod use_collection;
pub mod use_companies;
pub mod use_company;
pub mod use_dashboard;
pub mod use_employees;
pub mod use_platform_stats;
pub mod use_polling;
pub mod use_request;
pub mod use_security_events;
pub mod use_system_health;

pub use use_collection::{UseCollectionHandle, use_collection};
pub use use_companies::{CompaniesHandle, use_companies};
pub use use_company::{CompanyHandle, use_company};
pub use use_dashboard::{DashboardHandle, use_dashboard};
pub use use_employees::{EmployeesHandle, use_employees};
pub use use_platform_stats::{PlatformStatsHandle, use_platform_stats};
pub use use_polling::{PollInterval, use_polling};
pub use use_request::{UseRequestHandle, use_request};
pub use use_security_events::{SecurityEventsHandle, use_security_events};
pub use use_system_health::{SystemHealthHandle, use_system_health};
