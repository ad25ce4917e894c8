//! Value Object Module

pub mod anti_forgery_token;
pub mod cookie_role;
pub mod email;
pub mod operation;
pub mod session_credential;

pub use anti_forgery_token::AntiForgeryToken;
pub use cookie_role::{CookiePolicy, CookieRole, CookieWrite};
pub use email::Email;
pub use operation::Operation;
pub use session_credential::SessionCredential;
