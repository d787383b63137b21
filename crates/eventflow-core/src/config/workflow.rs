//! Approval workflow, inbox, and message threading configuration.

use serde::{Deserialize, Serialize};

use crate::types::UserId;
use crate::types::limit::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

/// How notifications addressed to "the admin role" are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AdminFanout {
    /// One notification per active admin.
    #[default]
    Broadcast,
    /// A single notification to a designated admin inbox.
    Designated {
        /// The admin account that receives role-addressed notifications.
        user_id: UserId,
    },
}

/// Workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Maximum reply depth expanded when resolving a message thread.
    ///
    /// Counts reply levels below the root, not messages: `32` admits the
    /// root plus 32 levels of replies. Any reply past that sets `truncated`.
    #[serde(default = "default_max_thread_depth")]
    pub max_thread_depth: u32,
    /// Rows returned by inbox listings when the caller gives no limit.
    #[serde(default = "default_list_limit")]
    pub default_list_limit: u32,
    /// Upper bound on caller-supplied inbox limits.
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: u32,
    /// Delivery rule for admin-role notifications.
    #[serde(default)]
    pub admin_fanout: AdminFanout,
    /// Path prefix used to build event links in notifications.
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_thread_depth: default_max_thread_depth(),
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
            admin_fanout: AdminFanout::default(),
            link_base: default_link_base(),
        }
    }
}

fn default_max_thread_depth() -> u32 {
    32
}

fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

fn default_max_list_limit() -> u32 {
    MAX_LIST_LIMIT
}

fn default_link_base() -> String {
    "/events".to_string()
}
