use tasker_chain::channel;
use tasker_chain::executors::{AsyncExecutor, InlineExecutor, QueueExecutor, StrandExecutor};

/// Identifier type shared by every test channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    A,
    B,
    Ordered,
    Worker,
    Immediate,
}

channel! {
    /// Queue channel driven explicitly by tests
    pub struct ChannelA: Lane = Lane::A => QueueExecutor;
    pub struct ChannelB: Lane = Lane::B => QueueExecutor;
    pub struct StrandLane: Lane = Lane::Ordered => StrandExecutor;
    pub struct AsyncLane: Lane = Lane::Worker => AsyncExecutor;
    pub struct InlineLane: Lane = Lane::Immediate => InlineExecutor;
}
