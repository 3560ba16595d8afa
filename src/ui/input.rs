use std::io;

use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use termion::{event::Key, input::TermRead};

/// Pump raw-mode key events from stdin into a channel the UI loop can
/// select on. The reader blocks on stdin for the life of the process;
/// main exits the process to reclaim it.
pub fn key_events() -> UnboundedReceiver<Key> {
  let (key_tx, key_rx) = unbounded();

  tokio::task::spawn_blocking(move || {
    for key in io::stdin().keys().flatten() {
      if key_tx.unbounded_send(key).is_err() {
        break;
      }
    }
  });

  key_rx
}
