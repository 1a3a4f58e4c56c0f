pub mod league;
pub mod nfl_state;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use league::League;
pub use nfl_state::NflState;

/// Domain payload served by a data accessor.
///
/// The serde schema is the first shape check; `validate` covers what the
/// schema cannot express.
pub trait Payload: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    fn validate(&self) -> Result<(), String>;
}
