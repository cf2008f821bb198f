//! JSON schema validation of response bodies against the bundled `schemas/` set.

// crates.io
use jsonschema::Validator;
use serde_json::Value;
// self
use crate::{_prelude::*, http::ApiResponse};

/// RFC 9457 problem detail schema name.
pub const PROBLEM_DETAIL: &str = "problem-detail.json";
/// Actuator health schema name.
pub const HEALTH_RESPONSE: &str = "health-response.json";

const BUNDLED: [(&str, &str); 2] = [
	(PROBLEM_DETAIL, include_str!("../schemas/problem-detail.json")),
	(HEALTH_RESPONSE, include_str!("../schemas/health-response.json")),
];

/// Compiled schemas addressed by file name.
pub struct SchemaValidator {
	schemas: HashMap<String, Validator>,
}
impl SchemaValidator {
	/// Compiles every bundled schema.
	pub fn bundled() -> Result<Self> {
		let mut validator = Self { schemas: HashMap::new() };

		for (name, source) in BUNDLED {
			let schema = serde_json::from_str::<Value>(source)
				.map_err(|e| Error::deserialize("JSON schema", source, e))?;

			validator.register(name, &schema)?;
		}

		Ok(validator)
	}

	/// Compiles and stores `schema` under `name`, replacing any previous entry.
	pub fn register(&mut self, name: impl Into<String>, schema: &Value) -> Result<()> {
		let name = name.into();
		let compiled = compile(&name, schema)?;

		self.schemas.insert(name, compiled);

		Ok(())
	}

	/// Whether a schema is known under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.schemas.contains_key(name)
	}

	/// Validates the response body against the named schema.
	pub fn validate(&self, name: &str, response: &ApiResponse) -> Result<()> {
		let endpoint = describe(response);
		let Some(validator) = self.schemas.get(name) else {
			return Err(Error::SchemaValidation {
				schema: name.to_owned(),
				endpoint,
				violations: vec![format!("Schema `{name}` is not registered.")],
			});
		};
		let body = parse_body(name, &endpoint, response)?;

		check(validator, name, endpoint, &body)
	}

	/// Validates the body as an RFC 9457 problem detail.
	pub fn validate_problem_detail(&self, response: &ApiResponse) -> Result<()> {
		self.validate(PROBLEM_DETAIL, response)
	}

	/// Validates the body as an actuator health document.
	pub fn validate_health(&self, response: &ApiResponse) -> Result<()> {
		self.validate(HEALTH_RESPONSE, response)
	}

	/// Validates the body against an ad-hoc schema.
	pub fn validate_with(schema: &Value, response: &ApiResponse) -> Result<()> {
		let endpoint = describe(response);
		let validator = compile("inline", schema)?;
		let body = parse_body("inline", &endpoint, response)?;

		check(&validator, "inline", endpoint, &body)
	}
}
impl Debug for SchemaValidator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SchemaValidator").field("schemas", &self.schemas.keys()).finish()
	}
}

fn compile(name: &str, schema: &Value) -> Result<Validator> {
	jsonschema::validator_for(schema).map_err(|e| Error::SchemaValidation {
		schema: name.to_owned(),
		endpoint: String::new(),
		violations: vec![format!("Invalid schema: {e}")],
	})
}

fn check(validator: &Validator, name: &str, endpoint: String, body: &Value) -> Result<()> {
	let violations = validator
		.iter_errors(body)
		.map(|e| format!("{} at `{}`", e, e.instance_path))
		.collect::<Vec<_>>();

	if violations.is_empty() {
		return Ok(());
	}

	tracing::warn!(schema = name, endpoint = %endpoint, count = violations.len(), "Schema violations.");

	Err(Error::SchemaValidation { schema: name.to_owned(), endpoint, violations })
}

fn parse_body(name: &str, endpoint: &str, response: &ApiResponse) -> Result<Value> {
	serde_json::from_str(response.text()).map_err(|e| Error::SchemaValidation {
		schema: name.to_owned(),
		endpoint: endpoint.to_owned(),
		violations: vec![format!("Body is not valid JSON: {e}")],
	})
}

fn describe(response: &ApiResponse) -> String {
	format!("{} {} -> {}", response.method(), response.path(), response.status())
}
