//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use axum_test::TestServer;
use chimp::prelude::*;

pub const SNAPSHOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/site.json");
pub const CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/chimp.yaml");

pub struct TestApp {
    pub server: TestServer,
    pub credentials: Arc<SettingsCredentialStore>,
    pub key: String,
}

impl TestApp {
    /// Request with the active key attached
    pub fn get(&self, path: &str) -> axum_test::TestRequest {
        self.server.get(path).add_query_param("api_key", &self.key)
    }
}

pub fn demo_config() -> ExportConfig {
    ExportConfig::from_yaml_file(CONFIG).unwrap()
}

pub fn demo_host() -> InMemoryHost {
    InMemoryHost::from_json_file(SNAPSHOT).unwrap()
}

/// Serve the demo snapshot with a freshly activated key
pub fn demo_app() -> TestApp {
    app_with(demo_config(), demo_host())
}

pub fn app_with(config: ExportConfig, host: InMemoryHost) -> TestApp {
    let settings: Arc<dyn SettingsStore> = Arc::new(InMemorySettings::new());
    let credentials = Arc::new(SettingsCredentialStore::new(settings));
    let key = activate(credentials.as_ref()).unwrap().to_string();

    let router = ServerBuilder::new()
        .with_config(config)
        .with_host(HostServices::from_host(Arc::new(host)))
        .with_credentials(credentials.clone())
        .build()
        .unwrap();

    TestApp {
        server: TestServer::new(router),
        credentials,
        key,
    }
}
