//! Temporal and destination validation of a verified response.
//!
//! Every rule is checked and every violation reported; a response is only
//! acceptable when the list comes back empty. Absent bounds are skipped.
//!
//! With `early = now - skew` and `late = now + skew`, a response is rejected
//! when:
//!
//! | bound | rejected if |
//! |-------|-------------|
//! | `SubjectConfirmationData/@NotBefore` | `early < NotBefore` |
//! | `SubjectConfirmationData/@NotOnOrAfter` | `late >= NotOnOrAfter` |
//! | `Conditions/@NotBefore` | `early < NotBefore` |
//! | `Conditions/@NotOnOrAfter` | `early >= NotOnOrAfter` |
//! | `AuthnStatement/@SessionNotOnOrAfter` | `early >= SessionNotOnOrAfter` |

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::error::{SamlError, SamlResult, ValidationIssue};
use crate::types::{SamlResponse, SAML_NS};
use crate::xml::Element;

/// Validates response freshness and destination.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    acs: String,
    clock_skew: Duration,
}

impl ResponseValidator {
    /// Creates a validator for responses destined for `acs`, with the
    /// default 60 second skew.
    #[must_use]
    pub fn new(acs: impl Into<String>) -> Self {
        Self {
            acs: acs.into(),
            clock_skew: Duration::seconds(sporto_core::DEFAULT_CLOCK_SKEW_SECS as i64),
        }
    }

    /// Sets the tolerated clock skew.
    #[must_use]
    pub fn with_clock_skew_secs(mut self, secs: u64) -> Self {
        self.clock_skew = Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000));
        self
    }

    /// Validates against the current time.
    pub fn validate(&self, response: &SamlResponse) -> SamlResult<()> {
        self.validate_at(response, Utc::now())
    }

    /// Validates against `now`.
    pub fn validate_at(&self, response: &SamlResponse, now: DateTime<Utc>) -> SamlResult<()> {
        let issues = self.issues_at(response, now);
        if issues.is_empty() {
            tracing::debug!("response conditions valid");
            return Ok(());
        }

        tracing::warn!(count = issues.len(), "response failed validation");
        Err(SamlError::Validation(issues))
    }

    /// Returns every violated rule at `now`.
    #[must_use]
    pub fn issues_at(&self, response: &SamlResponse, now: DateTime<Utc>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        // An empty Destination counts as absent.
        if let Some(destination) = response.destination().filter(|d| !d.is_empty()) {
            if destination != self.acs {
                issues.push(ValidationIssue::DestinationMismatch {
                    destination: destination.to_string(),
                });
            }
        }

        let Some(assertion) = response.assertion() else {
            return issues;
        };

        // A skew past chrono's range saturates to the ends of time.
        let early = now.checked_sub_signed(self.clock_skew).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let late = now.checked_add_signed(self.clock_skew).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let confirmation = assertion.find(&[
            (SAML_NS, "Subject"),
            (SAML_NS, "SubjectConfirmation"),
            (SAML_NS, "SubjectConfirmationData"),
        ]);
        let conditions = assertion.child(SAML_NS, "Conditions");
        let authn_statement = assertion.child(SAML_NS, "AuthnStatement");

        let mut check = |element: Option<&Element>,
                         attribute: &str,
                         label: &'static str,
                         violated: &dyn Fn(DateTime<Utc>) -> bool,
                         issue: ValidationIssue| {
            let Some(value) = element.and_then(|e| e.attr(attribute)) else {
                return;
            };
            match parse_instant(value) {
                Some(bound) if violated(bound) => issues.push(issue),
                Some(_) => {}
                None => issues.push(ValidationIssue::InvalidTimestamp {
                    attribute: label,
                    value: value.to_string(),
                }),
            }
        };

        check(
            confirmation,
            "NotBefore",
            "SubjectConfirmationData/@NotBefore",
            &|bound| early < bound,
            ValidationIssue::SubjectConfirmationNotYetValid,
        );
        check(
            confirmation,
            "NotOnOrAfter",
            "SubjectConfirmationData/@NotOnOrAfter",
            &|bound| late >= bound,
            ValidationIssue::SubjectConfirmationExpired,
        );
        check(
            conditions,
            "NotBefore",
            "Conditions/@NotBefore",
            &|bound| early < bound,
            ValidationIssue::ConditionsNotYetValid,
        );
        check(
            conditions,
            "NotOnOrAfter",
            "Conditions/@NotOnOrAfter",
            &|bound| early >= bound,
            ValidationIssue::ConditionsExpired,
        );
        check(
            authn_statement,
            "SessionNotOnOrAfter",
            "AuthnStatement/@SessionNotOnOrAfter",
            &|bound| early >= bound,
            ValidationIssue::SessionExpired,
        );

        issues
    }
}

/// Parses an `xs:dateTime` as a UTC instant.
///
/// Values without an offset are taken as UTC. Fractional seconds are kept.
#[must_use]
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
