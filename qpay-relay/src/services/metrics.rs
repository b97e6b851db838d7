use metrics::counter;

/// Record the outcome of a session token request.
pub fn record_session(outcome: &'static str) {
    counter!("qpay_sessions_total", "outcome" => outcome).increment(1);
}

/// Record the outcome of a status query.
pub fn record_status_query(outcome: &'static str) {
    counter!("qpay_status_queries_total", "outcome" => outcome).increment(1);
}

/// Record a received callback by payment outcome and verification verdict.
pub fn record_callback(outcome: &'static str, verification: &'static str) {
    counter!(
        "qpay_callbacks_total",
        "outcome" => outcome,
        "verification" => verification
    )
    .increment(1);
}
