// Live practice interviews over a WebSocket, plus post-interview feedback.
//
// session.rs holds the turn-counting state machine and is I/O-free apart
// from the `Outbox` it writes events to; socket.rs drives it from axum.

pub mod feedback;
pub mod handlers;
pub mod session;
pub mod socket;
