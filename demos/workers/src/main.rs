use std::thread;

use lasi::shared_instance;
use tracing::info;
use uuid::Uuid;

struct AppConfig {
    id: Uuid,
    max_connections: usize,
}

impl AppConfig {
    fn load() -> Self {
        info!("loading configuration");
        Self {
            id: Uuid::new_v4(),
            max_connections: 256,
        }
    }
}

shared_instance!(CONFIG, AppConfig, AppConfig::load());

fn main() {
    tracing_subscriber::fmt().init();

    const WORKERS: usize = 8;

    info!("spawning {WORKERS} workers");
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            thread::spawn(move || {
                let config = CONFIG.instance();
                info!(
                    worker,
                    config_id = %config.id,
                    max_connections = config.max_connections,
                    constructions = CONFIG.constructions(),
                    "worker sees shared configuration"
                );
                config.id
            })
        })
        .collect();

    let ids: Vec<Uuid> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));

    info!(
        "all {} workers observed configuration {} (constructed {} time(s))",
        ids.len(),
        ids[0],
        CONFIG.constructions()
    );
}
