use once_cell::sync::Lazy;
use regex::Regex;

/// `local@domain.tld`: no whitespace anywhere, exactly one `@` before the
/// domain, and at least one `.` after it.
// the pattern literal is fixed, so compilation cannot fail at runtime
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.\S+$").unwrap());

/// Why an address was refused. There is exactly one kind today; deliverability
/// and domain checks are deliberately not performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("malformed address")]
    MalformedAddress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(InvalidReason),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool { matches!(self, Self::Valid) }
}

/// Judge the syntactic shape of `input`. Leading/trailing whitespace is
/// ignored; empty input is always invalid.
///
/// This is pure and deterministic, so the controller can run it before
/// committing to an asynchronous submission.
pub fn validate(input: &str) -> ValidationOutcome {
    let trimmed = input.trim();
    match !trimmed.is_empty() && EMAIL_SHAPE.is_match(trimmed) {
        true => ValidationOutcome::Valid,
        false => ValidationOutcome::Invalid(InvalidReason::MalformedAddress),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A trimmed address that has passed `validate`. Must be instantiated with
/// `SubscriberEmail::parse`.
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, InvalidReason> {
        match validate(&email) {
            ValidationOutcome::Valid => Ok(Self(email.trim().to_owned())),
            ValidationOutcome::Invalid(reason) => Err(reason),
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
