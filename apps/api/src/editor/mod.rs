// Editing core: pure mutators over document snapshots, the drag-reorder
// state machine, and the session store that owns each live document.

pub mod drag;
pub mod handlers;
pub mod mutators;
pub mod seed;
pub mod session;
pub mod validation;
