use analysis_service::config::AnalysisConfig;
use analysis_service::services::Database;
use analysis_service::startup::Application;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub db: Database,
    pub db_path: String,
    pub seed_path: String,
}

impl TestApp {
    /// Spawn the service with the default seed content `hello`.
    pub async fn spawn() -> Self {
        Self::spawn_with_seed(r#"{"gptOutput": "hello"}"#).await
    }

    /// Spawn the service with a caller-provided seed file body.
    pub async fn spawn_with_seed(seed_json: &str) -> Self {
        let db_path = format!("target/test-analysis-{}.db", Uuid::new_v4());
        let seed_path = format!("target/test-seed-{}.json", Uuid::new_v4());

        tokio::fs::create_dir_all("target")
            .await
            .expect("Failed to create target dir");
        tokio::fs::write(&seed_path, seed_json)
            .await
            .expect("Failed to write seed file");

        let mut config = AnalysisConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.database.path = db_path.clone();
        config.database.seed_path = seed_path.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            db,
            db_path,
            seed_path,
        }
    }

    /// Cleanup test resources (database file and seed file).
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_file(&self.db_path).await;
        let _ = tokio::fs::remove_file(&self.seed_path).await;
    }
}
