//! User Model and role capabilities

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    OrderTaker,
    Crew,
    OrderTakerCrew,
}

/// Action a view or operation may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create orders and append items
    TakeOrders,
    /// Kitchen display: update item status
    PrepareOrders,
    /// Mark orders paid
    CollectPayment,
    /// Clock in / out
    TrackTime,
    /// Submit the daily sales summary
    SubmitDailySummary,
    ManageMenu,
    ManagePhotos,
    ManageExpenses,
    ManageInventory,
    ViewReports,
    /// Manage users and branches
    ManageUsers,
    /// Select any branch regardless of the access list
    AllBranches,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::OrderTaker => "order_taker",
            Role::Crew => "crew",
            Role::OrderTakerCrew => "order_taker_crew",
        }
    }

    /// Whether this role is allowed to perform `capability`
    pub fn allows(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Role::SuperAdmin => true,
            Role::OrderTaker => matches!(
                capability,
                TakeOrders | CollectPayment | SubmitDailySummary
            ),
            Role::Crew => matches!(capability, PrepareOrders | TrackTime | ManageInventory),
            Role::OrderTakerCrew => matches!(
                capability,
                TakeOrders
                    | CollectPayment
                    | SubmitDailySummary
                    | PrepareOrders
                    | TrackTime
                    | ManageInventory
            ),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User entity as returned by the API (the password hash never leaves the server)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    /// Branches this user may select
    #[serde(default)]
    pub branch_access: Vec<String>,
    #[serde(default)]
    pub preferred_branch: Option<String>,
}

impl User {
    pub fn can(&self, capability: Capability) -> bool {
        self.role.allows(capability)
    }

    /// Whether the user may work in `branch_id`
    pub fn has_branch_access(&self, branch_id: &str) -> bool {
        self.can(Capability::AllBranches) || self.branch_access.iter().any(|b| b == branch_id)
    }

    /// Branch to select right after login
    pub fn default_branch(&self) -> Option<&str> {
        self.preferred_branch
            .as_deref()
            .filter(|b| self.has_branch_access(b))
            .or_else(|| self.branch_access.first().map(String::as_str))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
