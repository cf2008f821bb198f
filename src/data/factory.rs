//! Randomized valid and deliberately invalid request bodies.

// crates.io
use rand::{Rng, seq::IndexedRandom};
use uuid::Uuid;
// self
use crate::model::{
	AssignPartnerLevelRequest, ChangePasswordRequest, ClubRequest, CreateUserRequest,
	DocumentRequest, ForgotPasswordRequest, LoginRequest, NotificationSettingsRequest,
	ProjectRequest, RegisterRequest, ResetPasswordRequest, UpdateStatusRequest, UpdateTierRequest,
	UserUpdateRequest,
};

const EMAIL_DOMAIN: &str = "test.sc.kpi.ua";
const FIRST_NAMES: &[&str] =
	&["Olena", "Taras", "Iryna", "Andrii", "Sofiia", "Dmytro", "Kateryna", "Bohdan", "Mariia", "Oleh"];
const LAST_NAMES: &[&str] = &[
	"Shevchenko", "Kovalenko", "Bondarenko", "Tkachenko", "Kravchenko", "Melnyk", "Boiko", "Oliinyk",
];
const TEAM_NAMES: &[&str] =
	&["Robotics", "Debate", "Chess", "Hiking", "Photography", "Astronomy", "Theatre", "Esports"];
const APP_NAMES: &[&str] =
	&["Campus Map", "Study Buddy", "Dorm Hub", "Lab Queue", "Event Radar", "Mentor Match"];
const WORDS: &[&str] = &[
	"student", "council", "faculty", "meeting", "schedule", "budget", "event", "volunteer",
	"initiative", "report", "campus", "committee", "proposal", "review", "semester",
];

/// Namespace for test request builders.
#[derive(Clone, Copy, Debug)]
pub struct TestDataFactory;
impl TestDataFactory {
	/// Login body with a random e-mail and a policy-compliant password.
	pub fn valid_login_request() -> LoginRequest {
		LoginRequest::new(Self::random_email(), Self::valid_password())
	}

	/// Login body rejected by validation.
	pub fn invalid_login_request() -> LoginRequest {
		LoginRequest::new("invalid-email", "")
	}

	/// Register body with random identity.
	pub fn valid_register_request() -> RegisterRequest {
		Self::register_request_with_email(Self::random_email())
	}

	/// Register body rejected by validation.
	pub fn invalid_register_request() -> RegisterRequest {
		RegisterRequest {
			email: String::new(),
			password: "short".into(),
			first_name: String::new(),
			last_name: String::new(),
		}
	}

	/// Register body with a chosen password.
	pub fn register_request_with_password(password: impl Into<String>) -> RegisterRequest {
		RegisterRequest { password: password.into(), ..Self::valid_register_request() }
	}

	/// Register body with chosen names.
	pub fn register_request_with_names(
		first_name: impl Into<String>,
		last_name: impl Into<String>,
	) -> RegisterRequest {
		RegisterRequest {
			first_name: first_name.into(),
			last_name: last_name.into(),
			..Self::valid_register_request()
		}
	}

	/// Register body with a chosen e-mail.
	pub fn register_request_with_email(email: impl Into<String>) -> RegisterRequest {
		RegisterRequest {
			email: email.into(),
			password: Self::valid_password(),
			first_name: Self::first_name(),
			last_name: Self::last_name(),
		}
	}

	/// Profile update with random names.
	pub fn valid_user_update_request() -> UserUpdateRequest {
		UserUpdateRequest { first_name: Some(Self::first_name()), last_name: Some(Self::last_name()) }
	}

	/// Tier update with a random level below admin.
	pub fn valid_update_tier_request() -> UpdateTierRequest {
		UpdateTierRequest { tier: rand::rng().random_range(0..5) }
	}

	/// Status update.
	pub fn valid_update_status_request(active: bool) -> UpdateStatusRequest {
		UpdateStatusRequest { active }
	}

	/// Admin create-user body at tier 1.
	pub fn valid_create_user_request() -> CreateUserRequest {
		Self::create_user_request_with_tier(1)
	}

	/// Admin create-user body at a chosen tier.
	pub fn create_user_request_with_tier(tier: i32) -> CreateUserRequest {
		CreateUserRequest {
			email: Self::random_email(),
			password: Self::valid_password(),
			first_name: Self::first_name(),
			last_name: Self::last_name(),
			tier,
		}
	}

	/// Partner assignment at the `basic` level.
	pub fn valid_assign_partner_request() -> AssignPartnerLevelRequest {
		Self::assign_partner_request("basic")
	}

	/// Partner assignment at a chosen level.
	pub fn assign_partner_request(level: impl Into<String>) -> AssignPartnerLevelRequest {
		AssignPartnerLevelRequest { partner_id: Self::random_id(), level: level.into() }
	}

	/// Password change away from `current_password`.
	pub fn valid_change_password_request(
		current_password: impl Into<String>,
	) -> ChangePasswordRequest {
		ChangePasswordRequest {
			current_password: current_password.into(),
			new_password: format!("NewTest@{}", Self::digits(6)),
		}
	}

	/// Club body with a random name ending in ` Club`.
	pub fn valid_club_request() -> ClubRequest {
		ClubRequest { name: format!("{} Club", pick(TEAM_NAMES)), description: Self::sentence(10) }
	}

	/// Club body with blank fields.
	pub fn invalid_club_request() -> ClubRequest {
		ClubRequest::default()
	}

	/// Project body with a random name ending in ` Project`.
	pub fn valid_project_request() -> ProjectRequest {
		ProjectRequest {
			name: format!("{} Project", pick(APP_NAMES)),
			description: Self::sentence(10),
		}
	}

	/// Project body with blank fields.
	pub fn invalid_project_request() -> ProjectRequest {
		ProjectRequest::default()
	}

	/// `REPORT` document body.
	pub fn valid_document_request() -> DocumentRequest {
		DocumentRequest {
			title: Self::sentence(4),
			content: (0..3).map(|_| Self::sentence(12)).collect::<Vec<_>>().join(" "),
			kind: "REPORT".into(),
		}
	}

	/// Document body with blank fields.
	pub fn invalid_document_request() -> DocumentRequest {
		DocumentRequest::default()
	}

	/// Settings with e-mail on and the other channels random.
	pub fn valid_notification_settings_request() -> NotificationSettingsRequest {
		let mut rng = rand::rng();

		NotificationSettingsRequest {
			email_enabled: true,
			telegram_enabled: rng.random(),
			push_enabled: rng.random(),
		}
	}

	/// Forgot-password body.
	pub fn valid_forgot_password_request(email: impl Into<String>) -> ForgotPasswordRequest {
		ForgotPasswordRequest { email: email.into() }
	}

	/// Reset body pairing `token` with a fresh password.
	pub fn valid_reset_password_request(token: impl Into<String>) -> ResetPasswordRequest {
		ResetPasswordRequest { token: token.into(), new_password: Self::valid_password() }
	}

	/// `length` repetitions of `a`.
	pub fn long_string(length: usize) -> String {
		"a".repeat(length)
	}

	/// Unique address under the test domain.
	pub fn random_email() -> String {
		format!("{}.{}@{EMAIL_DOMAIN}", pick(FIRST_NAMES).to_lowercase(), Uuid::new_v4().simple())
	}

	/// Random UUID string.
	pub fn random_id() -> String {
		Uuid::new_v4().to_string()
	}

	/// `Test@` followed by six digits.
	pub fn valid_password() -> String {
		format!("Test@{}", Self::digits(6))
	}

	fn first_name() -> String {
		pick(FIRST_NAMES).to_owned()
	}

	fn last_name() -> String {
		pick(LAST_NAMES).to_owned()
	}

	fn digits(count: usize) -> String {
		let mut rng = rand::rng();

		(0..count).map(|_| char::from(b'0' + rng.random_range(0..10_u8))).collect()
	}

	fn sentence(words: usize) -> String {
		let mut sentence = (0..words).map(|_| pick(WORDS)).collect::<Vec<_>>().join(" ");

		if let Some(first) = sentence.get_mut(..1) {
			first.make_ascii_uppercase();
		}

		sentence.push('.');

		sentence
	}
}

fn pick(pool: &[&'static str]) -> &'static str {
	pool.choose(&mut rand::rng()).copied().unwrap_or_default()
}
