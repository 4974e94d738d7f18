use serde::{Deserialize, Serialize};

/// Application pages a role may open.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Dashboard,
    Requests,
    Approval,
    Fulfillment,
    Report,
    Rejections,
    Export,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Requests => "requests",
            Self::Approval => "approval",
            Self::Fulfillment => "fulfillment",
            Self::Report => "report",
            Self::Rejections => "rejections",
            Self::Export => "export",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User role controlling which pages are reachable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Viewer,
    StaffA,
    StaffB,
    StaffC,
}

const ALL_PAGES: &[Page] = &[
    Page::Dashboard,
    Page::Requests,
    Page::Approval,
    Page::Fulfillment,
    Page::Report,
    Page::Rejections,
    Page::Export,
];

impl Role {
    /// Parse a raw role string from session storage.
    ///
    /// Role strings arrive in inconsistent shapes ("Staff A", "staff_a",
    /// "ADMIN"); normalization lowercases, trims, and turns spaces into
    /// underscores. Unknown or missing roles fall back to viewer.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let normalized = raw.unwrap_or("").trim().to_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "admin" => Self::Admin,
            "staff_a" => Self::StaffA,
            "staff_b" => Self::StaffB,
            "staff_c" => Self::StaffC,
            "viewer" | "" => Self::Viewer,
            other => {
                tracing::warn!(role = other, "unknown role, falling back to viewer");
                Self::Viewer
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
            Self::StaffA => "staff_a",
            Self::StaffB => "staff_b",
            Self::StaffC => "staff_c",
        }
    }

    /// Human-readable role label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Viewer => "Viewer",
            Self::StaffA => "Staff A",
            Self::StaffB => "Staff B",
            Self::StaffC => "Staff C",
        }
    }

    /// Pages this role is allowed to open.
    pub fn allowed_pages(&self) -> &'static [Page] {
        match self {
            Self::Admin | Self::StaffC => ALL_PAGES,
            Self::Viewer => &[Page::Requests, Page::Export],
            Self::StaffA => &[Page::Requests, Page::Report, Page::Rejections, Page::Export],
            Self::StaffB => {
                &[Page::Requests, Page::Approval, Page::Fulfillment, Page::Report, Page::Export]
            },
        }
    }

    pub fn may_open(&self, page: Page) -> bool {
        self.allowed_pages().contains(&page)
    }
}

/// Current user identity, read from session context.
///
/// The core only ever reads this; it is written by whatever login shell
/// hosts the tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub username: String,
    pub full_name: Option<String>,
    pub role: Role,
}

impl Actor {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), full_name: None, role }
    }

    /// Read the actor from `PROCURA_USER` / `PROCURA_FULL_NAME` /
    /// `PROCURA_ROLE`, with the same defaults the session layer uses.
    pub fn from_env() -> Self {
        let username =
            std::env::var("PROCURA_USER").ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(
                || "User".to_owned(),
            );
        let full_name = std::env::var("PROCURA_FULL_NAME").ok().filter(|v| !v.trim().is_empty());
        let role = Role::from_raw(std::env::var("PROCURA_ROLE").ok().as_deref());
        Self { username, full_name, role }
    }

    /// Name shown in greetings; falls back to the username.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}
