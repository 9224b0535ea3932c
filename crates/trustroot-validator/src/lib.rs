//! TRC Update Validator
//!
//! Decides whether a candidate TRC (Trust Root Configuration) is a valid
//! successor of the currently trusted TRC of an isolation domain, and
//! reports what the update changed.
//!
//! ## Update classes
//!
//! - **Regular**: signed with online keys, rotates online or issuing keys.
//! - **Sensitive**: signed with offline keys, may change membership,
//!   attributes, the voting quorum and offline keys.
//!
//! A rejected update is discarded and the previous TRC stays the trust
//! anchor. Validation is pure: nothing is retained between calls.
//!
//! ## Example
//!
//! ```ignore
//! use trustroot_validator::{validate, UpdateType};
//!
//! let info = validate(&prev, &next)?;
//! if info.update_type == UpdateType::Sensitive {
//!     reload_authorizations(&info.attribute_changes);
//! }
//! ```

pub mod chain;
pub mod config;
pub mod core;
pub mod error;
pub mod info;
pub mod report;
pub mod validator;

pub use chain::{is_predecessor_acceptable, validate_chain, ChainError};
pub use config::{Cli, CliConfig, OutputFormat};
pub use error::{ErrorCategory, UpdateError};
pub use info::{AsToKeyMeta, AttributeChange, AttributeChanges, KeyChanges, UpdateInfo, UpdateType};
pub use validator::{validate, UpdateValidator};
