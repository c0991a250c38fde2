//! Redis record store
//!
//! Talks to Redis over a single multiplexed async connection. Every command
//! runs under the configured timeout and transient failures are retried
//! with exponential backoff before they reach the pipeline.

use crate::adapters::store::{RecordStore, ScanPage, StoreResult};
use crate::config::{RetryConfig, StoreConfig};
use crate::domain::StoreError;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{ErrorKind, RedisError, RedisResult, Script};
use secrecy::ExposeSecret;
use std::future::Future;
use std::time::Duration;

/// Atomically replace a value only if it still equals the expected one.
/// A missing key reads as `false` and never matches.
const COMPARE_AND_SET_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if current == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2])
    return 1
end
return 0
"#;

/// Redis-backed [`RecordStore`]
pub struct RedisStore {
    connection: MultiplexedConnection,
    timeout: Duration,
    retry: RetryConfig,
    compare_and_set_script: Script,
}

impl RedisStore {
    /// Open a multiplexed connection to the configured Redis server
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server cannot be reached
    /// within the configured timeout.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let url: &str = config.url.expose_secret().as_ref();
        let client = redis::Client::open(url)
            .map_err(|e| StoreError::ConnectionFailed(format!("Invalid store URL: {e}")))?;

        let timeout = Duration::from_secs(config.timeout_seconds);
        let connection = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| {
                StoreError::Timeout(format!(
                    "connecting to Redis took longer than {}s",
                    config.timeout_seconds
                ))
            })?
            .map_err(map_redis_error)?;

        tracing::debug!(
            timeout_secs = config.timeout_seconds,
            max_retries = config.retry.max_retries,
            "Opened Redis connection"
        );

        Ok(Self {
            connection,
            timeout,
            retry: config.retry.clone(),
            compare_and_set_script: Script::new(COMPARE_AND_SET_SCRIPT),
        })
    }

    /// Run a command with timeout and exponential backoff retry
    async fn with_retry<T, F, Fut>(&self, command: &str, operation: F) -> StoreResult<T>
    where
        F: Fn(MultiplexedConnection) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        let max_retries = self.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match tokio::time::timeout(self.timeout, operation(self.connection.clone()))
                .await
            {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => map_redis_error(e),
                Err(_) => StoreError::Timeout(format!(
                    "{command} took longer than {}s",
                    self.timeout.as_secs()
                )),
            };

            if !error.is_transient() || attempt >= max_retries {
                return Err(error);
            }

            let delay_ms = backoff_delay_ms(&self.retry, attempt);
            tracing::warn!(
                command = command,
                attempt = attempt,
                max_retries = max_retries,
                delay_ms = delay_ms,
                error = %error,
                "Retrying store command after error"
            );
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> StoreResult<()> {
        let reply: String = self
            .with_retry("PING", |mut conn| async move {
                redis::cmd("PING").query_async(&mut conn).await
            })
            .await?;

        if reply != "PONG" {
            return Err(StoreError::InvalidResponse(format!(
                "unexpected PING reply: {reply}"
            )));
        }
        Ok(())
    }

    async fn scan_page(
        &self,
        prefix: &str,
        cursor: Option<&str>,
        count: usize,
    ) -> StoreResult<ScanPage> {
        let start: u64 = match cursor {
            Some(cursor) => cursor.parse().map_err(|_| {
                StoreError::InvalidResponse(format!("invalid scan cursor '{cursor}'"))
            })?,
            None => 0,
        };
        let pattern = format!("{}*", escape_glob(prefix));
        let pattern = pattern.as_str();
        let count = count.max(1);

        let (next, raw_keys): (u64, Vec<Vec<u8>>) = self
            .with_retry("SCAN", |mut conn| async move {
                redis::cmd("SCAN")
                    .arg(start)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(count)
                    .query_async(&mut conn)
                    .await
            })
            .await?;

        Ok(ScanPage {
            keys: decode_keys(raw_keys),
            cursor: (next != 0).then(|| next.to_string()),
        })
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.with_retry("GET", |mut conn| async move {
            redis::cmd("GET").arg(key).query_async(&mut conn).await
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.with_retry("SET", |mut conn| async move {
            redis::cmd("SET").arg(key).arg(value).query_async(&mut conn).await
        })
        .await
    }

    async fn compare_and_set(&self, key: &str, expected: &str, value: &str) -> StoreResult<bool> {
        let script = &self.compare_and_set_script;
        let swapped: i64 = self
            .with_retry("EVALSHA", |mut conn| async move {
                script
                    .key(key)
                    .arg(expected)
                    .arg(value)
                    .invoke_async(&mut conn)
                    .await
            })
            .await?;
        Ok(swapped == 1)
    }
}

/// Map a Redis client error to a store error without leaking its type
fn map_redis_error(err: RedisError) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout(err.to_string())
    } else if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        StoreError::ConnectionFailed(err.to_string())
    } else if err.kind() == ErrorKind::TypeError {
        StoreError::InvalidResponse(err.to_string())
    } else {
        StoreError::CommandFailed(err.to_string())
    }
}

/// Keep keys that are valid UTF-8; anything else cannot be a lead key
/// this pipeline wrote, so it is logged and left alone.
fn decode_keys(raw_keys: Vec<Vec<u8>>) -> Vec<String> {
    raw_keys
        .into_iter()
        .filter_map(|raw| match String::from_utf8(raw) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!(
                    key = %String::from_utf8_lossy(e.as_bytes()),
                    "Skipping key that is not valid UTF-8"
                );
                None
            }
        })
        .collect()
}

/// Escape Redis glob metacharacters so the prefix matches literally
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn backoff_delay_ms(retry: &RetryConfig, attempt: usize) -> u64 {
    let factor = retry.backoff_multiplier.powf((attempt - 1) as f64);
    let delay_ms = (retry.initial_delay_ms as f64 * factor) as u64;
    delay_ms.min(retry.max_delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_glob() {
        assert_eq!(escape_glob("lead_"), "lead_");
        assert_eq!(escape_glob("a*b?c[d]e\\"), "a\\*b\\?c\\[d\\]e\\\\");
    }

    #[test]
    fn test_decode_keys_skips_invalid_utf8() {
        let raw = vec![
            b"lead_a".to_vec(),
            vec![b'l', b'e', b'a', b'd', b'_', 0xff, 0xfe],
            "lead_é".as_bytes().to_vec(),
        ];
        assert_eq!(decode_keys(raw), vec!["lead_a".to_string(), "lead_é".to_string()]);
    }

    #[test]
    fn test_backoff_delay_ms() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 350,
            backoff_multiplier: 2.0,
        };
        assert_eq!(backoff_delay_ms(&retry, 1), 100);
        assert_eq!(backoff_delay_ms(&retry, 2), 200);
        assert_eq!(backoff_delay_ms(&retry, 3), 350);
    }

    #[test]
    fn test_map_redis_error() {
        let err = RedisError::from((ErrorKind::TypeError, "not a string"));
        assert!(matches!(map_redis_error(err), StoreError::InvalidResponse(_)));

        let err = RedisError::from((ErrorKind::ResponseError, "WRONGTYPE"));
        assert!(matches!(map_redis_error(err), StoreError::CommandFailed(_)));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(
            map_redis_error(RedisError::from(io)),
            StoreError::ConnectionFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let config = StoreConfig::with_url("not-a-url");
        let result = RedisStore::connect(&config).await;
        assert!(matches!(result, Err(StoreError::ConnectionFailed(_))));
    }
}
