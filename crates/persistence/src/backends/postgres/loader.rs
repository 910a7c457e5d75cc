//! Table script execution for the data loader.

use async_trait::async_trait;

use super::PostgresBackend;
use super::backend::pg_error;
use crate::error::StorageResult;
use crate::loader::ScriptExecutor;

#[async_trait]
impl ScriptExecutor for PostgresBackend {
    async fn execute_script(&self, sql: &str) -> StorageResult<()> {
        let client = self.get_client().await?;
        client
            .batch_execute(sql)
            .await
            .map_err(|e| pg_error("Failed to execute script", e))
    }
}
