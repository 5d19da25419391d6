use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use payloads::StatsPeriod;
use payloads::requests::StatsQuery;
use payloads::responses::PlatformStats;
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::use_polling::{PollInterval, use_polling};
use crate::hooks::use_request::{UseRequestHandle, use_request};

/// Aggregated platform statistics for one dashboard widget.
#[derive(Clone)]
pub struct PlatformStatsHandle {
    request: UseRequestHandle<PlatformStats>,
    period: Rc<RefCell<StatsPeriod>>,
}

impl PlatformStatsHandle {
    pub fn stats(&self) -> Option<PlatformStats> {
        self.request.data()
    }

    pub fn loading(&self) -> bool {
        self.request.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.request.error()
    }

    pub fn is_initial_loading(&self) -> bool {
        self.request.is_initial_loading()
    }

    pub fn refresh(&self) {
        yew::platform::spawn_local(self.refresh_future(false));
    }

    /// The refresh as a future, for fan-out joins with other dashboard
    /// surfaces. Reads the period current at call time.
    pub fn refresh_future(
        &self,
        silent: bool,
    ) -> impl Future<Output = ()> + 'static {
        let query = StatsQuery {
            period: *self.period.borrow(),
        };
        let operation =
            async move { get_api_client().company_stats(&query).await };
        let request = self.request.clone();
        async move {
            if silent {
                request.run_silent(operation).await;
            } else {
                request.run(operation).await;
            }
        }
    }
}

#[hook]
pub fn use_platform_stats(
    period: StatsPeriod,
    interval: Option<PollInterval>,
) -> PlatformStatsHandle {
    let request = use_request();
    let period_cell = use_mut_ref(|| period);
    *period_cell.borrow_mut() = period;

    let handle = PlatformStatsHandle {
        request,
        period: period_cell,
    };

    // Fetch on mount and when the stats window changes.
    {
        let handle = handle.clone();
        use_effect_with(period, move |_| {
            yew::platform::spawn_local(handle.refresh_future(false));
        });
    }

    {
        let handle = handle.clone();
        use_polling(
            interval,
            Callback::from(move |_| {
                yew::platform::spawn_local(handle.refresh_future(true));
            }),
        );
    }

    handle
}
