use crate::game::TickOutcome;

/// Events emitted by the tick loop that renderers can handle
#[derive(Debug, Clone)]
pub enum RenderEvent {
    /// Loop started
    Started,

    /// One tick was applied
    Ticked(TickOutcome),

    /// Loop finished, either by tick count or game over
    Completed,
}
