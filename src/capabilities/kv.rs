use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_KEY_LENGTH: usize = 128;
pub const MAX_VALUE_LENGTH: usize = 16 * 1024;
pub const MAX_BATCH_KEYS: usize = 32;

/// String-valued key/value storage, backed by whatever the shell has:
/// `localStorage` on web, `UserDefaults`/`SharedPreferences` on mobile.
///
/// Values are plain strings because every consumer in this crate stores
/// either a token or a small scalar rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KvOperation {
    Set { key: String, value: String },
    GetMulti { keys: Vec<String> },
}

impl Operation for KvOperation {
    type Output = KvResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KvOutput {
    Written,
    /// One slot per requested key, in request order. `None` means absent.
    Values(Vec<Option<String>>),
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum KvError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value for '{key}' exceeds {MAX_VALUE_LENGTH} bytes")]
    ValueTooLarge { key: String },

    #[error("storage error: {message}")]
    Storage { message: String, is_retryable: bool },
}

impl KvError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Storage { is_retryable, .. } => *is_retryable,
            Self::InvalidKey { .. } | Self::ValueTooLarge { .. } => false,
        }
    }
}

pub type KvResult = Result<KvOutput, KvError>;

pub fn validate_key(key: &str) -> Result<(), KvError> {
    if key.is_empty() {
        return Err(KvError::InvalidKey {
            key: String::new(),
            reason: "key cannot be empty".to_string(),
        });
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(KvError::InvalidKey {
            key: key.chars().take(32).collect(),
            reason: format!("key exceeds maximum length of {MAX_KEY_LENGTH}"),
        });
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(KvError::InvalidKey {
            key: key.to_string(),
            reason: "key contains invalid characters".to_string(),
        });
    }
    Ok(())
}

pub struct KeyValue<Ev> {
    context: CapabilityContext<KvOperation, Ev>,
}

impl<Ev> Capability<Ev> for KeyValue<Ev> {
    type Operation = KvOperation;
    type MappedSelf<MappedEv> = KeyValue<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        KeyValue::new(self.context.map_event(f))
    }
}

impl<Ev> KeyValue<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<KvOperation, Ev>) -> Self {
        Self { context }
    }

    /// Write `value` under `key`. Validation failures short-circuit without
    /// reaching the shell; the app still receives the error as an event.
    pub fn set<F>(&self, key: impl Into<String>, value: impl Into<String>, make_event: F)
    where
        F: Fn(KvResult) -> Ev + Send + Sync + 'static,
    {
        let key = key.into();
        let value = value.into();
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = match Self::check_write(&key, &value) {
                Ok(()) => ctx.request_from_shell(KvOperation::Set { key, value }).await,
                Err(e) => Err(e),
            };
            ctx.update_app(make_event(result));
        });
    }

    /// Read several keys in one round trip, resolved in request order.
    pub fn get_multi<F>(&self, keys: Vec<String>, make_event: F)
    where
        F: Fn(KvResult) -> Ev + Send + Sync + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = match Self::check_batch(&keys) {
                Ok(()) => ctx.request_from_shell(KvOperation::GetMulti { keys }).await,
                Err(e) => Err(e),
            };
            ctx.update_app(make_event(result));
        });
    }

    fn check_write(key: &str, value: &str) -> Result<(), KvError> {
        validate_key(key)?;
        if value.len() > MAX_VALUE_LENGTH {
            return Err(KvError::ValueTooLarge {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn check_batch(keys: &[String]) -> Result<(), KvError> {
        if keys.len() > MAX_BATCH_KEYS {
            return Err(KvError::Storage {
                message: format!(
                    "batch of {} keys exceeds limit of {MAX_BATCH_KEYS}",
                    keys.len()
                ),
                is_retryable: false,
            });
        }
        for key in keys {
            validate_key(key)?;
        }
        Ok(())
    }
}
