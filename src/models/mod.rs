pub mod calendar_events;
pub mod invoices;
pub mod meetings;
pub mod payment_methods;
pub mod projects;
pub mod users;

use serde::{Deserialize, Deserializer};

/// The central board entity.
pub type Project = projects::Model;

#[derive(Debug, Clone, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

impl LimitQuery {
    pub fn limit_or(&self, default: u64) -> u64 {
        self.limit.unwrap_or(default).clamp(1, 100)
    }

    /// The requested limit clamped to `1..=100`, or `None` for no limit.
    pub fn clamped(&self) -> Option<u64> {
        self.limit.map(|limit| limit.clamp(1, 100))
    }
}

/// Deserialize a nullable field so that an absent key stays `None` while an
/// explicit `null` becomes `Some(None)`. Pair with `#[serde(default)]`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
