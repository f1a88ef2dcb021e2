use billmock_kernel::domain::config::{ApiConfig, SslConfig};
use billmock_kernel::prelude::*;
use billmock_server::Server;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write_data(dir: &Path, broken: Option<Entity>) {
    for entity in Entity::ALL {
        let body = if broken == Some(entity) {
            "{\"id\":1}\n{\"id\": 2\n".to_owned()
        } else {
            format!("{{\"id\":\"{}_1\"}}\n", entity.name())
        };
        fs::write(dir.join(entity.file_name()), body).unwrap();
    }
}

fn gated_config(dir: &Path) -> ApiConfig {
    let mut cfg = ApiConfig::default();
    cfg.server.address = IpAddr::V4(Ipv4Addr::LOCALHOST);
    cfg.server.port = 0;
    cfg.data.dir = dir.to_path_buf();
    cfg.data.wait_for_load = true;
    cfg
}

#[tokio::test]
async fn builder_applies_data_dir_and_shares_store() {
    let tmp = TempDir::new().unwrap();
    let store = RecordStore::new();

    let server = Server::builder().data_dir(tmp.path()).port(0).store(store.clone()).build().unwrap();

    assert_eq!(server.state().config.data.dir, tmp.path());
    assert_eq!(server.state().config.server.port, 0);
    store.mark_ready();
    assert!(server.state().store.is_ready());
}

#[tokio::test]
async fn missing_tls_certificate_fails_build() {
    let tmp = TempDir::new().unwrap();
    let mut cfg = ApiConfig::default();
    cfg.server.ssl =
        Some(SslConfig { cert: tmp.path().join("cert.pem"), key: tmp.path().join("key.pem") });

    let err = Server::builder().config(cfg).build().unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"));
}

#[tokio::test]
async fn gated_startup_aborts_when_data_fails_to_load() {
    let tmp = TempDir::new().unwrap();
    write_data(tmp.path(), Some(Entity::Invoices));
    let store = RecordStore::new();

    let server = Server::builder().config(gated_config(tmp.path())).store(store.clone()).build().unwrap();
    let err = tokio::time::timeout(Duration::from_secs(5), server.run())
        .await
        .expect("startup should fail instead of serving")
        .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to load data"));
    assert!(!store.is_ready());
    assert_eq!(store.get_all(Entity::Customers).len(), 1);
    assert!(store.get_all(Entity::Plans).is_empty());
}

#[tokio::test]
async fn gated_startup_serves_once_data_is_ready() {
    let tmp = TempDir::new().unwrap();
    write_data(tmp.path(), None);
    let store = RecordStore::new();

    let server = Server::builder().config(gated_config(tmp.path())).store(store.clone()).build().unwrap();
    let running = tokio::spawn(server.run());

    tokio::time::timeout(Duration::from_secs(5), store.wait_ready())
        .await
        .expect("store should become ready");
    for entity in Entity::ALL {
        assert_eq!(store.get_all(entity).len(), 1, "{entity} not loaded");
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!running.is_finished(), "server should keep running after the gate opens");
    running.abort();
}
