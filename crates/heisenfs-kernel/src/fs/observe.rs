//! The observation state machine.
//!
//! Each file remembers which operation last observed it. The edge table below
//! lists the transitions seen when ordinary shell commands run against the
//! mount:
//!
//! ```text
//! touch <f>         create stat set_times stat release
//!                   stat open set_times stat release
//! truncate -s <f>   create stat truncate stat release
//!                   stat open truncate stat release
//! echo hi > <f>     create stat write release
//!                   stat open truncate stat write write release
//! echo hi >> <f>    create stat write write release
//!                   stat open write write release
//! cat <f>           stat open read read stat release
//! ls -l <f>         stat
//! ls                list (every entry)
//! ```
//!
//! A pair missing from the table is an *anomaly*. The file still moves to the
//! operation's resulting state: observation always perturbs the observed.

use heisenfs_types::{ObservationState, Operation};
use heisenfs_types::{ObservationState as S, Operation as Op};

/// One allowed edge: observing a file in `from` with `op` leads to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: ObservationState,
    pub op: Operation,
    pub to: ObservationState,
}

const fn edge(from: ObservationState, op: Operation, to: ObservationState) -> Edge {
    Edge { from, op, to }
}

/// Every documented transition.
pub const EDGES: &[Edge] = &[
    edge(S::New, Op::Create, S::Created),
    edge(S::New, Op::StatQuery, S::StatQueried),
    edge(S::New, Op::List, S::Listed),
    edge(S::Created, Op::StatQuery, S::StatQueried),
    edge(S::Created, Op::Release, S::Released),
    edge(S::Created, Op::List, S::Listed),
    edge(S::StatQueried, Op::StatQuery, S::StatQueried),
    edge(S::StatQueried, Op::SetTimes, S::TimesSet),
    edge(S::StatQueried, Op::Open, S::Opened),
    edge(S::StatQueried, Op::Truncate, S::Truncated),
    edge(S::StatQueried, Op::Write, S::Written),
    edge(S::StatQueried, Op::Release, S::Released),
    edge(S::StatQueried, Op::List, S::Listed),
    edge(S::TimesSet, Op::StatQuery, S::StatQueried),
    edge(S::Opened, Op::SetTimes, S::TimesSet),
    edge(S::Opened, Op::Truncate, S::Truncated),
    edge(S::Opened, Op::Read, S::Read),
    edge(S::Opened, Op::Write, S::Written),
    edge(S::Opened, Op::Release, S::Released),
    edge(S::Truncated, Op::StatQuery, S::StatQueried),
    edge(S::Read, Op::Read, S::Read),
    edge(S::Read, Op::StatQuery, S::StatQueried),
    edge(S::Written, Op::Write, S::Written),
    edge(S::Written, Op::Release, S::Released),
    edge(S::Released, Op::StatQuery, S::StatQueried),
    edge(S::Released, Op::List, S::Listed),
    edge(S::Listed, Op::StatQuery, S::StatQueried),
    edge(S::Listed, Op::List, S::Listed),
];

/// The outcome of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ObservationState,
    pub op: Operation,
    pub to: ObservationState,
    /// True when `(from, op)` is not in [`EDGES`].
    pub anomaly: bool,
}

/// Look up the documented edge for `(current, op)`, if any.
pub fn find_edge(current: ObservationState, op: Operation) -> Option<&'static Edge> {
    EDGES.iter().find(|e| e.from == current && e.op == op)
}

/// Compute the next state for a file in `current` observed by `op`.
///
/// Never refuses: an undocumented pair still lands on `op`'s resulting state,
/// flagged as an anomaly.
pub fn next_state(current: ObservationState, op: Operation) -> Transition {
    match find_edge(current, op) {
        Some(e) => Transition {
            from: current,
            op,
            to: e.to,
            anomaly: false,
        },
        None => Transition {
            from: current,
            op,
            to: op.resulting_state(),
            anomaly: true,
        },
    }
}
