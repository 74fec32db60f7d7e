// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod health;
mod metrics;
mod otp;
mod root;
mod scores;
mod shared_types;
mod users;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, record_http_metrics};
pub use root::root_handler;

// Registration and user lookup handlers
pub use users::{get_user, list_users, register_user};

// OTP lifecycle handlers
pub use otp::{request_otp, verify_otp};

// Score and ranking handlers
pub use scores::{add_score, get_rank, get_weekly_scores};
