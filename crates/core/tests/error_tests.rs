// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants and Display formatting
// ═══════════════════════════════════════════════════════════════════

use portfolio_insight_core::errors::CoreError;

mod display {
    use super::*;

    #[test]
    fn invalid_rate() {
        let err = CoreError::InvalidRate("USD → KRW conversion requires a positive rate".into());
        assert_eq!(
            err.to_string(),
            "Invalid exchange rate: USD → KRW conversion requires a positive rate"
        );
    }

    #[test]
    fn insufficient_data() {
        let err = CoreError::InsufficientData("need at least 2 instruments".into());
        assert_eq!(
            err.to_string(),
            "Insufficient data for optimization: need at least 2 instruments"
        );
    }

    #[test]
    fn optimization_failed_with_target() {
        let err = CoreError::OptimizationFailed { target: Some(0.08) };
        let msg = err.to_string();
        assert!(msg.contains("did not converge"), "{msg}");
        assert!(msg.contains("0.08"), "{msg}");
        assert!(msg.contains("lower target"), "{msg}");
    }

    #[test]
    fn optimization_failed_without_target() {
        let err = CoreError::OptimizationFailed { target: None };
        assert!(err.to_string().contains("None"));
    }

    #[test]
    fn missing_price_data() {
        let err = CoreError::MissingPriceData {
            symbol: "ZZZ".into(),
        };
        assert_eq!(err.to_string(), "No price history available for ZZZ");
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("name is required".into());
        assert_eq!(err.to_string(), "Validation failed: name is required");
    }

    #[test]
    fn holding_not_found() {
        let err = CoreError::HoldingNotFound("abc-123".into());
        assert_eq!(err.to_string(), "Holding not found: abc-123");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "Frankfurter".into(),
            message: "timeout".into(),
        };
        assert_eq!(err.to_string(), "API error (Frankfurter): timeout");
    }

    #[test]
    fn network_error() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}

mod semantics {
    use super::*;

    #[test]
    fn optimization_failed_carries_the_attempted_target() {
        // Callers render an actionable retry hint from this field.
        let err = CoreError::OptimizationFailed { target: Some(0.15) };
        match err {
            CoreError::OptimizationFailed { target } => assert_eq!(target, Some(0.15)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&CoreError::Network("x".into()));
    }
}
