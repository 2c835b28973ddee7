use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::models::job::JobEnvelope;

const QUEUE_KEY: &str = "vision_scenarios:jobs";
const PROCESSING_KEY: &str = "vision_scenarios:processing";

/// Redis-backed job queue carrying serialized [`JobEnvelope`]s.
///
/// Delivery contract: at-least-once, no FIFO guarantee required by
/// consumers. `dequeue` moves the payload onto a processing list so a
/// crashed worker leaves the job recoverable; `complete` removes it once the
/// job reached a terminal state.
pub struct JobQueue {
    client: redis::Client,
}

impl JobQueue {
    pub fn new(redis_url: &str) -> Result<Self, QueueError> {
        let client = redis::Client::open(redis_url).map_err(QueueError::Redis)?;
        Ok(Self { client })
    }

    async fn conn(&self) -> Result<MultiplexedConnection, QueueError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(QueueError::Redis)
    }

    /// Enqueue a job envelope.
    pub async fn enqueue(&self, envelope: &JobEnvelope) -> Result<(), QueueError> {
        let payload = serde_json::to_string(envelope).map_err(QueueError::Serialize)?;
        self.conn()
            .await?
            .lpush::<_, _, ()>(QUEUE_KEY, &payload)
            .await
            .map_err(QueueError::Redis)
    }

    /// Dequeue an envelope for processing (pop with move to processing list).
    pub async fn dequeue(&self) -> Result<Option<JobEnvelope>, QueueError> {
        let result: Option<String> = self
            .conn()
            .await?
            .rpoplpush(QUEUE_KEY, PROCESSING_KEY)
            .await
            .map_err(QueueError::Redis)?;

        result
            .map(|payload| serde_json::from_str(&payload).map_err(QueueError::Serialize))
            .transpose()
    }

    /// Mark an envelope as consumed (remove from the processing list).
    pub async fn complete(&self, envelope: &JobEnvelope) -> Result<(), QueueError> {
        let payload = serde_json::to_string(envelope).map_err(QueueError::Serialize)?;
        self.conn()
            .await?
            .lrem::<_, _, ()>(PROCESSING_KEY, 1, &payload)
            .await
            .map_err(QueueError::Redis)
    }

    /// Check Redis connectivity (for health checks).
    pub async fn health_check(&self) -> Result<(), QueueError> {
        redis::cmd("PING")
            .query_async::<String>(&mut self.conn().await?)
            .await
            .map_err(QueueError::Redis)?;
        Ok(())
    }

    /// Get the current queue depth (pending jobs).
    pub async fn queue_depth(&self) -> Result<u64, QueueError> {
        self.conn()
            .await?
            .llen(QUEUE_KEY)
            .await
            .map_err(QueueError::Redis)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
