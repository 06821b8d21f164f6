//! Tradução do nome do evento do Todoist para a mudança de estado do registro

pub const ITEM_COMPLETED: &str = "item:completed";
pub const ITEM_UNCOMPLETED: &str = "item:uncompleted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedAction {
    SetDone(bool),
    NoOp,
}

/// Comparação exata, sensível a maiúsculas; qualquer outro evento é NoOp
pub fn map_event(event_name: &str) -> MappedAction {
    match event_name {
        ITEM_COMPLETED => MappedAction::SetDone(true),
        ITEM_UNCOMPLETED => MappedAction::SetDone(false),
        _ => MappedAction::NoOp,
    }
}
