//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` and `IdentityProvider` ports:
//!
//! - `supabase` - Hosted identity provider lookup
//! - `local_token` - Self-issued HMAC tokens
//! - `fallback` - Provider first, local token second
//! - `mock` - Test implementations that don't require external services

mod fallback;
mod local_token;
mod mock;
mod supabase;

pub use fallback::{FallbackSessionValidator, ProviderCheck};
pub use local_token::{parse_hmac_algorithm, LocalClaims, LocalTokenConfig, LocalTokenSigner};
pub use mock::{MockIdentityProvider, MockSessionValidator};
pub use supabase::{SupabaseConfig, SupabaseIdentityProvider};
