pub mod clock;
pub mod password;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use password::{CredentialVerifier, PasswordError};
pub use token::{Claims, IssuedToken, Principal, TokenCodec, TokenError};
