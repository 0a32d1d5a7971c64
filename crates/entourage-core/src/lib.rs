pub mod domain;
pub mod error;
pub mod outcome;
pub mod signup;
pub mod theme;

pub use domain::*;
pub use error::CoreError;
pub use outcome::{SignupOutcome, SignupResponse};
pub use signup::SignupPayload;
pub use theme::{
    ColorSchemeTarget, MemoryStorage, PreferenceStorage, SubscriptionId, Theme, ThemeStore,
};
