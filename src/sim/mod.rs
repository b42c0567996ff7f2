//! Deterministic simulation module
//!
//! All gameplay logic lives here. The module stays pure and deterministic:
//! - Seeded RNG only (the match owns one `Pcg32`)
//! - Fixed, documented order of operations per tick
//! - No rendering or platform dependencies

pub mod ability;
pub mod arena;
pub mod ball;
pub mod comeback;
pub mod effect;
pub mod item;
pub mod name;
pub mod physics;
pub mod state;
pub mod tick;

pub use ability::{AbilityInstance, AbilityKind};
pub use arena::{Arena, FieldEntity};
pub use ball::Ball;
pub use comeback::ComebackState;
pub use effect::{Effect, EffectKind};
pub use item::{Item, ItemCategory, ItemKind, ItemSpawner};
pub use name::{Attributes, NameAnalysis, NameFactors, Tier, analyze_name, simple_hash};
pub use state::{MatchOutcome, MatchSnapshot, MatchState};
pub use tick::tick;
