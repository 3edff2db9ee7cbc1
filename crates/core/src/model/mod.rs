mod checkpoint;
mod ids;
mod option;
mod session;

pub use checkpoint::{Checkpoint, CheckpointError, CheckpointSchedule};
pub use ids::{AnswerId, ParseAnswerIdError, SessionId};
pub use option::{OptionState, SoundOption};
pub use session::{GateSession, PlaybackSession};
