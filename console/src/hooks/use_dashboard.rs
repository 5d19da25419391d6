use payloads::StatsPeriod;
use yew::prelude::*;

use crate::hooks::use_platform_stats::{
    PlatformStatsHandle, use_platform_stats,
};
use crate::hooks::use_polling::{PollInterval, use_polling};
use crate::hooks::use_system_health::{
    SystemHealthHandle, use_system_health,
};

/// Composition for the dashboard screen: platform stats and system
/// health load concurrently with all-settled semantics. A failure in one
/// surface never cancels or blocks the other, and each reports through
/// its own request state.
#[derive(Clone)]
pub struct DashboardHandle {
    pub stats: PlatformStatsHandle,
    pub health: SystemHealthHandle,
}

impl DashboardHandle {
    /// Fan out both refreshes and wait for all of them to settle.
    pub fn refresh_all(&self) {
        let stats = self.stats.refresh_future(false);
        let health = self.health.refresh_future(false);
        yew::platform::spawn_local(async move {
            futures::join!(stats, health);
        });
    }
}

#[hook]
pub fn use_dashboard(period: StatsPeriod) -> DashboardHandle {
    // The leaf hooks fetch on mount themselves; the dashboard owns the
    // shared poll cadence so the surfaces refresh together.
    let stats = use_platform_stats(period, None);
    let health = use_system_health(None);

    let handle = DashboardHandle { stats, health };

    {
        let handle = handle.clone();
        use_polling(
            Some(PollInterval::DASHBOARD),
            Callback::from(move |_| {
                let stats = handle.stats.refresh_future(true);
                let health = handle.health.refresh_future(true);
                yew::platform::spawn_local(async move {
                    futures::join!(stats, health);
                });
            }),
        );
    }

    handle
}
