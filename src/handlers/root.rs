use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Arena API 👋
Version: {version}

Available endpoints:
  - POST /register                  - Register a user (issues an OTP)
  - POST /request-otp/{{phone}}       - Reissue an OTP for a phone number
  - POST /verify-otp                - Verify a phone number with an OTP
  - GET  /users                     - List all users
  - GET  /users/{{id}}                - Fetch a user by id
  - POST /scores                    - Submit a score (max 3 per day)
  - GET  /scores/rank/{{user_id}}     - Today's rank and score
  - GET  /scores/weekly/{{user_id}}   - This week's scores
  - GET  /health                    - Light health check
  - GET  /health?mode=full          - Full health check (includes PostgreSQL)
  - GET  /metrics                   - Prometheus metrics

This API demonstrates phone-OTP registration, daily score submission with
ranking, and weekly score aggregation.
"#
    )
}
