//! `tenantry-auth`: authentication gateway (bearer credential → principal).
//!
//! This crate is intentionally decoupled from HTTP and from any concrete
//! identity provider. The API layer feeds it the raw `Authorization` header and
//! turns [`AuthError`] into a response; infra supplies [`IdentityProvider`]
//! implementations.

pub mod credential;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod principal;
pub mod provider;

pub use credential::{Credential, parse_authorization};
pub use error::{AuthError, AuthErrorBody, CODE_PREFIX};
pub use gateway::{AuthStage, Authenticator};
pub use identity::{ClaimSet, VerifiedIdentity};
pub use principal::{Principal, PrincipalId};
pub use provider::{IdentityProvider, PasswordSignIn, ProviderError, normalize};
