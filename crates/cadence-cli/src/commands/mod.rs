use cadence_core::service::RecurrenceService;
use std::sync::Arc;
use uuid::Uuid;

pub mod add;
pub mod agenda;
pub mod complete;
pub mod delete;
pub mod list;
pub mod occurrences;
pub mod serve;
pub mod show;

/// Everything a command needs: the engine, who is asking and how to print.
pub struct CommandContext {
    pub service: Arc<RecurrenceService>,
    pub owner: Uuid,
    pub json: bool,
}
