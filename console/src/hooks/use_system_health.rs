use std::future::Future;

use jiff::Timestamp;
use payloads::responses::SystemHealth;
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::use_polling::{PollInterval, use_polling};
use crate::hooks::use_request::{UseRequestHandle, use_request};

/// System health for the monitoring screen. The poll cadence is chosen
/// by the screen (10s/30s/60s/5m) and may be changed while mounted.
#[derive(Clone)]
pub struct SystemHealthHandle {
    request: UseRequestHandle<SystemHealth>,
    last_updated: UseStateHandle<Option<Timestamp>>,
}

impl SystemHealthHandle {
    pub fn health(&self) -> Option<SystemHealth> {
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

    /// When the monitor last heard back successfully.
    pub fn last_updated(&self) -> Option<Timestamp> {
        *self.last_updated
    }

    pub fn refresh(&self) {
        yew::platform::spawn_local(self.refresh_future(false));
    }

    /// The refresh as a future, for fan-out joins with other dashboard
    /// surfaces.
    pub fn refresh_future(
        &self,
        silent: bool,
    ) -> impl Future<Output = ()> + 'static {
        let request = self.request.clone();
        let last_updated = self.last_updated.clone();
        async move {
            let operation =
                async { get_api_client().system_health().await };
            let health = if silent {
                request.run_silent(operation).await
            } else {
                request.run(operation).await
            };
            if health.is_some() {
                last_updated.set(Some(Timestamp::now()));
            }
        }
    }
}

#[hook]
pub fn use_system_health(
    interval: Option<PollInterval>,
) -> SystemHealthHandle {
    let request = use_request();
    let last_updated = use_state(|| None::<Timestamp>);

    let handle = SystemHealthHandle {
        request,
        last_updated,
    };

    {
        let handle = handle.clone();
        use_effect_with((), move |_| {
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
