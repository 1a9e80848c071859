//! Monitored source declarations.

use serde::Deserialize;
use url::Url;

/// One monitored occupancy source, as declared in the application
/// configuration. The configured order is the order sources are read within
/// a sampling round.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Unique name used in logs and diagnostics.
    pub id: String,
    /// Endpoint the occupancy count is read from.
    pub url: Url,
}
