// Core swipe/match exports
pub mod effects;
pub mod engine;
pub mod error;
pub mod match_key;
pub mod validator;

pub use effects::{EffectQueue, EffectReceiver, EffectStats, EffectStatsSnapshot, EffectWorker, SideEffect};
pub use engine::SwipeMatchEngine;
pub use error::{SwipeError, ValidationError};
pub use match_key::{canonical_pair, derive_key};
pub use validator::validate;
