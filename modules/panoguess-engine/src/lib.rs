pub mod bootstrap;
pub mod pool;
pub mod round;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use bootstrap::build_pool;
pub use pool::LocationPool;
pub use round::{EngineConfig, EngineError, GameEngine, GuessRejected, Phase, Round, RoundResult, RoundStart};
pub use session::{SessionSummary, SessionTracker};
pub use traits::{LocationLookup, PanoramaViewer, StatsStore};
