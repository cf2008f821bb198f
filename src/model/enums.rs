//! Capability tiers and scoped roles.

// self
use crate::_prelude::*;

/// Capability tier ladder, ordered by level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapabilityTier {
	/// Level 0.
	Guest,
	/// Level 1.
	Basic,
	/// Level 2.
	Internal,
	/// Level 3.
	Advanced,
	/// Level 4.
	Senior,
	/// Level 5.
	Admin,
}
impl CapabilityTier {
	/// Every tier, lowest first.
	pub const ALL: [Self; 6] =
		[Self::Guest, Self::Basic, Self::Internal, Self::Advanced, Self::Senior, Self::Admin];

	/// Numeric level.
	pub const fn level(self) -> i32 {
		match self {
			Self::Guest => 0,
			Self::Basic => 1,
			Self::Internal => 2,
			Self::Advanced => 3,
			Self::Senior => 4,
			Self::Admin => 5,
		}
	}

	/// Human-readable label.
	pub const fn display_name(self) -> &'static str {
		match self {
			Self::Guest => "Guest",
			Self::Basic => "Basic",
			Self::Internal => "Internal Access",
			Self::Advanced => "Advanced",
			Self::Senior => "Senior",
			Self::Admin => "Administrator",
		}
	}

	/// Tier for a numeric level.
	pub fn from_level(level: i32) -> Option<Self> {
		Self::ALL.into_iter().find(|tier| tier.level() == level)
	}

	/// Whether `self` grants at least `required`.
	pub fn is_at_least(self, required: Self) -> bool {
		self.level() >= required.level()
	}
}
impl Display for CapabilityTier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.display_name())
	}
}

/// Role inside a department.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentRole {
	/// Department head.
	Head,
	/// Content manager.
	ContentManager,
	/// Rank-and-file member.
	Member,
}
impl DepartmentRole {
	/// Tier level the role grants inside its department.
	pub const fn effective_tier(self) -> i32 {
		match self {
			Self::Head => 4,
			Self::ContentManager => 3,
			Self::Member => 2,
		}
	}

	/// Wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Head => "head",
			Self::ContentManager => "content_manager",
			Self::Member => "member",
		}
	}
}

/// Role inside a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
	/// Project lead.
	Lead,
	/// Project member.
	Member,
}
impl ProjectRole {
	/// Tier level the role grants inside its project.
	pub const fn effective_tier(self) -> i32 {
		match self {
			Self::Lead => 4,
			Self::Member => 2,
		}
	}

	/// Wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Lead => "lead",
			Self::Member => "member",
		}
	}
}
