// Email-only identity. There are no passwords or sessions: the client keeps
// the returned id and passes it on subsequent calls.

pub mod handlers;
