pub mod dialogue;
pub mod report;
pub mod schema;

pub use self::dialogue::{
    Action, Dialogue, DialogueState, Frame, ServiceCall, SlotMention, Speaker, Turn,
    NO_ACTIVE_INTENT,
};
pub use self::report::MetadataReport;
pub use self::schema::{IntentSchema, Service, SlotSchema};
