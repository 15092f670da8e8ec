//! `kindaebay-accounts`: account registration, identity rules and sessions.
//!
//! The registration validator is pure; the baseline identity rules it relies
//! on are a trait ([`IdentityRules`]) so they can be swapped for a test
//! double. Storage sits behind [`AccountDirectory`].

pub mod account;
pub mod common_passwords;
pub mod directory;
pub mod identity;
pub mod login;
pub mod password;
pub mod registration;
pub mod service;
pub mod session;
pub mod similarity;

pub use account::Account;
pub use common_passwords::CommonPasswords;
pub use directory::{AccountDirectory, InMemoryAccountDirectory};
pub use identity::{CandidateAccount, IdentityRules, StandardIdentityRules};
pub use login::{LoginError, LoginForm};
pub use password::{PasswordError, PasswordHasher};
pub use registration::{RegistrationForm, RegistrationPolicy, RegistrationValidator, ValidRegistration};
pub use service::{AccountService, RegisterError};
pub use session::{SessionClaims, SessionError, SessionManager};
