use consultation_service::config::ConsultationConfig;
use consultation_service::services::HistoryStore;
use consultation_service::startup::Application;
use std::time::Duration;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub history: HistoryStore,
    pub history_path: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn the application on a random port with the mock provider and a
    /// unique history file; `tweak` adjusts the loaded config (mock reply,
    /// delays, deadline) before the app is built.
    pub async fn spawn_with(tweak: impl FnOnce(&mut ConsultationConfig)) -> Self {
        std::env::set_var("CONSULT_PROVIDER", "mock");
        std::env::set_var("GOOGLE_API_KEY", "test-api-key");

        let history_path = format!("target/test-history-{}.json", Uuid::new_v4());

        let mut config = ConsultationConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.history.file_path = history_path.clone();
        tweak(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let history = app.history().clone();
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(app.run_until_stopped());

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            history,
            history_path,
        }
    }

    pub async fn post_prompt(&self, prompt: &str) -> reqwest::Response {
        let form = reqwest::multipart::Form::new()
            .text("userPrompt", prompt.to_string())
            .text("age", "not specified");
        self.post_form(form).await
    }

    pub async fn post_form(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/consultations", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn read_history(&self) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}/consultations/history", self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Cleanup test resources (the history log file).
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_file(&self.history_path).await;
    }
}
