pub mod dispatcher;
pub mod event_mapper;
pub mod sync_processor;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::SyncDispatcher;
pub use event_mapper::{map_event, MappedAction};
pub use sync_processor::SyncProcessor;
