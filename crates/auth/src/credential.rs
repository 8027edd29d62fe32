//! Bearer credential extraction from the `Authorization` header.

use crate::error::AuthError;

const BEARER_SCHEME: &str = "Bearer";

/// Opaque bearer string taken from a request header.
///
/// No structure is assumed until the identity provider verified it. `Debug`
/// redacts the token so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Extract the bearer credential from an `Authorization` header value.
///
/// The header must be exactly two space-separated tokens, the first being the
/// literal `Bearer`. Anything else (other schemes, lower-case `bearer`, extra
/// spaces, trailing tokens) is malformed.
pub fn parse_authorization(header: Option<&str>) -> Result<Credential, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential)?;

    let mut parts = header.split(' ');
    let scheme = parts.next();
    let token = parts.next();

    match (scheme, token, parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(Credential::new(token)),
        _ => Err(AuthError::MalformedCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_header_is_missing_credential() {
        assert_eq!(parse_authorization(None), Err(AuthError::MissingCredential));
    }

    #[test]
    fn well_formed_header_yields_token() {
        let c = parse_authorization(Some("Bearer abc.def.ghi")).unwrap();
        assert_eq!(c.as_str(), "abc.def.ghi");
    }

    #[test]
    fn malformed_headers_are_rejected() {
        for header in [
            "",
            "Token abc",
            "Bearer",
            "Bearer ",
            "Bearer  ",
            "bearer abc",
            "BEARER abc",
            "Bearer a b",
            " Bearer abc",
            "Bearer  abc",
            "Basic dXNlcjpwYXNz",
        ] {
            assert_eq!(
                parse_authorization(Some(header)),
                Err(AuthError::MalformedCredential),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn debug_does_not_print_the_token() {
        let c = Credential::new("super-secret");
        assert!(!format!("{c:?}").contains("super-secret"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: any single space-free token after `Bearer ` is accepted verbatim.
        #[test]
        fn bearer_with_one_token_is_accepted(token in "[A-Za-z0-9._~+/=-]{1,256}") {
            let header = format!("Bearer {token}");
            let c = parse_authorization(Some(&header)).unwrap();
            prop_assert_eq!(c.as_str(), token.as_str());
        }

        /// Property: headers whose scheme is not exactly `Bearer` are malformed.
        #[test]
        fn other_schemes_are_malformed(
            scheme in "[A-Za-z]{1,10}",
            token in "[A-Za-z0-9]{1,32}"
        ) {
            prop_assume!(scheme != "Bearer");
            let header = format!("{scheme} {token}");
            prop_assert_eq!(
                parse_authorization(Some(&header)),
                Err(AuthError::MalformedCredential)
            );
        }

        /// Property: a header containing more than one space is never accepted.
        #[test]
        fn extra_separators_are_malformed(
            token in "[A-Za-z0-9]{0,16}",
            tail in "[A-Za-z0-9]{0,16}"
        ) {
            let header = format!("Bearer {token} {tail}");
            prop_assert_eq!(
                parse_authorization(Some(&header)),
                Err(AuthError::MalformedCredential)
            );
        }
    }
}
