//! Platform-independent pieces of the portfolio site: the command console and
//! its command table, section reveal sequencing, and the background
//! animations. Nothing here touches the DOM or a real clock; hosts feed in
//! elapsed time, frame timestamps and seeds.

pub mod commands;
pub mod console;
pub mod effects;
pub mod profile;
pub mod rain;
pub mod reveal;
pub mod timers;
pub mod trail;

pub use commands::{CommandTable, Env, Output, Resolution};
pub use console::{Console, ConsoleState, Key, ScrollbackLine, Submitted};
pub use effects::{Effect, EffectKind};
pub use profile::{PROFILE, Profile};
pub use rain::Rain;
pub use reveal::{RevealEvent, RevealPhase, RevealSequencer, SectionKind};
pub use timers::Timers;
pub use trail::Trail;
