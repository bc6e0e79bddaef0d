use serde::{Deserialize, Serialize};

use crate::id::MemberId;

/// A member of the organization: one vertex of the graph.
///
/// `ambassador` and `former_ambassador` are tri-state on purpose: `None` is
/// "never set", which is what freshly joined members carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub city: String,
    pub previous_city: Option<String>,
    pub age: f64,
    pub ambassador: Option<bool>,
    pub former_ambassador: Option<bool>,
}

impl Member {
    pub fn new(id: MemberId, city: impl Into<String>, age: f64) -> Self {
        Self {
            id,
            city: city.into(),
            previous_city: None,
            age,
            ambassador: None,
            former_ambassador: None,
        }
    }

    pub fn is_ambassador(&self) -> bool {
        self.ambassador == Some(true)
    }

    /// Sitting or former ambassador.
    pub fn has_served(&self) -> bool {
        self.is_ambassador() || self.former_ambassador == Some(true)
    }

    /// Strip the title, remembering that it was held.
    pub fn demote(&mut self) {
        self.ambassador = None;
        self.former_ambassador = Some(true);
    }
}
