pub mod callback;

pub use callback::{CallbackParseError, CallbackPayload};

use chrono::{DateTime, Duration, Utc};

/// Path segment QPay serves its hosted 3D payment page under.
pub const PAYMENT_PAGE_PATH: &str = "/post/sale3d/";

/// Session tokens are advertised as valid for seven days.
pub const SESSION_LIFETIME_DAYS: i64 = 7;

/// A session request that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    /// Amount as the client sent it, already rendered as form text.
    pub amount: String,
    pub currency: String,
    /// Sent upstream as the merchant payment id.
    pub order_number: String,
    pub customer_email: String,
    pub return_url: String,
}

/// A token issued by QPay together with what the client needs to use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub session_token: String,
    pub payment_url: String,
    pub expires_at: DateTime<Utc>,
    pub order_number: String,
}

impl SessionResult {
    pub fn issue(
        api_url: &str,
        session_token: String,
        order_number: String,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let payment_url = format!(
            "{}{}{}",
            api_url.trim_end_matches('/'),
            PAYMENT_PAGE_PATH,
            session_token
        );

        Self {
            session_token,
            payment_url,
            expires_at: issued_at + Duration::days(SESSION_LIFETIME_DAYS),
            order_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn payment_url_points_at_hosted_page() {
        let issued_at = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let result = SessionResult::issue(
            "https://qpos-test.qpay.com.tr/qpay/api/v2",
            "tok_abc".to_string(),
            "ORDER-1".to_string(),
            issued_at,
        );

        assert_eq!(
            result.payment_url,
            "https://qpos-test.qpay.com.tr/qpay/api/v2/post/sale3d/tok_abc"
        );
        assert_eq!(result.order_number, "ORDER-1");
    }

    #[test]
    fn trailing_slash_on_base_url_is_not_doubled() {
        let result = SessionResult::issue(
            "https://gateway.example/api/",
            "t".to_string(),
            "O".to_string(),
            Utc::now(),
        );
        assert_eq!(result.payment_url, "https://gateway.example/api/post/sale3d/t");
    }

    #[test]
    fn expiry_is_exactly_seven_days_after_issue() {
        let issued_at = Utc.with_ymd_and_hms(2026, 3, 28, 23, 30, 0).unwrap();
        let result = SessionResult::issue("https://x", "t".into(), "o".into(), issued_at);

        assert_eq!(
            (result.expires_at - issued_at).num_seconds(),
            7 * 24 * 3600
        );
    }
}
