mod email_input;
mod subscriber_email;
mod subscription_request;
mod subscription_state;
// allow external `use` statements to skip `subscriber_email` etc
pub use email_input::EmailInput;
pub use subscriber_email::validate;
pub use subscriber_email::InvalidReason;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_email::ValidationOutcome;
pub use subscription_request::AttemptId;
pub use subscription_request::SubscriptionRequest;
pub use subscription_state::SubscriptionState;
