//! Health check types shared by the storage adapters and the API.

use serde::{Deserialize, Serialize};

/// Health status for a service or component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Operational but not everything is available (e.g. empty ranking cache)
    Degraded,
    Unhealthy,
}

/// Health check result for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl ComponentHealth {
    pub fn healthy(component: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            component: component.into(),
            message: None,
            response_time_ms: None,
        }
    }

    pub fn degraded(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Degraded,
            component: component.into(),
            message: Some(message.into()),
            response_time_ms: None,
        }
    }

    pub fn unhealthy(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            component: component.into(),
            message: Some(message.into()),
            response_time_ms: None,
        }
    }

    pub fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Worst status wins; an empty set is healthy.
pub fn aggregate_status<'a>(
    components: impl IntoIterator<Item = &'a ComponentHealth>,
) -> HealthStatus {
    components
        .into_iter()
        .map(|c| c.status)
        .fold(HealthStatus::Healthy, |acc, s| match (acc, s) {
            (HealthStatus::Unhealthy, _) | (_, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
            (HealthStatus::Degraded, _) | (_, HealthStatus::Degraded) => HealthStatus::Degraded,
            _ => HealthStatus::Healthy,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_worst_wins() {
        let ok = ComponentHealth::healthy("catalogue");
        let meh = ComponentHealth::degraded("ranking_cache", "empty");
        let bad = ComponentHealth::unhealthy("catalogue", "down");

        assert_eq!(aggregate_status([&ok]), HealthStatus::Healthy);
        assert_eq!(aggregate_status([&ok, &meh]), HealthStatus::Degraded);
        assert_eq!(aggregate_status([&meh, &bad, &ok]), HealthStatus::Unhealthy);
        assert_eq!(aggregate_status([]), HealthStatus::Healthy);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&HealthStatus::Degraded).unwrap();
        assert_eq!(json, "\"degraded\"");
    }
}
