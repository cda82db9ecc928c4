//! E-filing provider transport
//!
//! The workflow talks to the provider only through the [`EfileProvider`]
//! trait, so the authenticator, account resolver, and submission service can
//! be exercised against fakes.
//!
//! ## Implementations
//!
//! - [`TylerClient`]: Tyler/uslegalpro REST API over `reqwest`
//!
//! Every implementation returns classified errors ([`crate::Error`]); raw
//! transport failures never leave this module.

mod traits;
mod tyler;
mod wire;

pub use traits::{EfileProvider, FilingRequest, FilingResponse};
pub use tyler::TylerClient;
