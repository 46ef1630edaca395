// Dataset client - one-shot fetch of the full mission dataset
use crate::domain::dataset::Dataset;
use crate::infrastructure::retry::{RetryError, RetryPolicy};
use tokio::sync::watch;

#[derive(Debug)]
pub struct DatasetClient {
    http: reqwest::Client,
    server_url: String,
    policy: RetryPolicy,
    loaded: watch::Sender<bool>,
}

impl DatasetClient {
    pub fn new(server_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_url: server_url.into().trim_end_matches('/').to_string(),
            policy,
            loaded: watch::Sender::new(false),
        }
    }

    fn dataset_url(&self, name: &str) -> String {
        format!("{}/datasets/{}", self.server_url, urlencoding::encode(name))
    }

    /// Fetch with retries; the loaded flag only flips on success
    pub async fn fetch(&self, name: &str) -> Result<Dataset, RetryError<reqwest::Error>> {
        let url = self.dataset_url(name);
        let (http, target) = (&self.http, url.as_str());

        let dataset = self
            .policy
            .retry(move || async move {
                http.get(target)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Dataset>()
                    .await
            })
            .await
            .inspect_err(|e| tracing::error!("Giving up on dataset {}: {}", url, e))?;

        tracing::info!(
            "Loaded dataset {} ({} navigation samples, {} images)",
            name,
            dataset.navigation.len(),
            dataset.images.len()
        );
        self.loaded.send_replace(true);
        Ok(dataset)
    }

    pub fn is_loaded(&self) -> bool {
        *self.loaded.borrow()
    }

    pub fn loaded(&self) -> watch::Receiver<bool> {
        self.loaded.subscribe()
    }
}
