/*!
 * Session token services
 *
 * Responsibility:
 * - derive the HS512 signing key from the configured secret (signing_key)
 * - mint access/refresh pairs (token_issuer, token_service)
 * - verify tokens, classify failures, rebuild principals (token_verifier)
 *
 * HTTP concerns (header placement, status codes) stay in api/ and middleware/.
 */

pub mod claims;
pub mod error;
pub mod header;
pub mod principal;
pub mod signing_key;
pub mod token_issuer;
pub mod token_service;
pub mod token_verifier;

pub use claims::Claims;
pub use error::TokenError;
pub use principal::Principal;
pub use signing_key::{KeyError, SigningKey};
pub use token_issuer::{IssuedTokenPair, TokenIssuer};
pub use token_service::TokenService;
pub use token_verifier::TokenVerifier;
