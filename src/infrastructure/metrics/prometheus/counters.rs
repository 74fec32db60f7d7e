use metrics::{counter, histogram};
use std::time::Instant;

/// Increment the counter for completed registrations.
pub fn increment_user_registered() {
    counter!("users_registered_total").increment(1);
}

/// Increment the counter for successful phone verifications.
pub fn increment_phone_verified() {
    counter!("phones_verified_total").increment(1);
}

/// Increment the counter for accepted score submissions.
pub fn increment_score_submitted() {
    counter!("scores_submitted_total").increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant) {
    let elapsed = start.elapsed();
    histogram!("http_request_duration_seconds").record(elapsed);
}
