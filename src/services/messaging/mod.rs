pub mod twilio;

use async_trait::async_trait;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Send a message and return the provider-assigned message id.
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<String>;
}
