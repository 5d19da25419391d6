use payloads::ApiClient;

pub mod contexts;
pub mod data;
pub mod hooks;
pub mod logs;

// Global API client - configurable via environment or same-origin fallback
pub fn get_api_client() -> ApiClient {
    // Try environment variable first (set at build time)
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .unwrap_or_else(|| {
            // Fallback to same origin (current setup)
            let window = web_sys::window().unwrap();
            let location = window.location();
            location.origin().unwrap()
        });

    ApiClient {
        address,
        inner_client: reqwest::Client::new(),
    }
}
