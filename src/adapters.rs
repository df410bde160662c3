pub mod api_errors;
pub mod http;
pub mod resend;
pub mod stripe;
pub mod stripe_client;
