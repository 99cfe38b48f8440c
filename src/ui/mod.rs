use anyhow::Error;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget};

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let top = err.to_string();
    let _ = writeln!(stderr, "error:");
    for line in top.lines() {
        if line.is_empty() {
            let _ = writeln!(stderr);
        } else {
            let _ = writeln!(stderr, "  {line}");
        }
    }

    let causes = cause_messages(err);
    if !causes.is_empty() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }
}

// Exit-code wrappers repeat the message they wrap; print each message once.
fn cause_messages(err: &Error) -> Vec<String> {
    let mut seen = err.to_string();
    let mut out = Vec::new();
    for cause in err.chain().skip(1) {
        let msg = cause.to_string();
        if msg != seen {
            out.push(msg.clone());
        }
        seen = msg;
    }
    out
}

/// Spinner on stderr, only when requested and stderr is a terminal.
pub fn spinner(enabled: bool, message: &'static str) -> Option<ProgressBar> {
    if !enabled || !io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}
