use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use nix::libc;
use pcm_engine::CancelToken;
use std::sync::OnceLock;

static CANCEL: OnceLock<CancelToken> = OnceLock::new();

extern "C" fn on_termination(_: libc::c_int) {
    if let Some(token) = CANCEL.get() {
        token.cancel();
    }
}

/// Cancels `token` on SIGINT or SIGTERM.
///
/// The handlers are installed without `SA_RESTART` so a blocked readiness wait
/// returns `EINTR` and the loop observes the token right away.
///
/// Only one token per process can be wired to the handlers; a second call
/// fails with `EALREADY` and leaves the first token in place.
pub fn cancel_on_termination(token: &CancelToken) -> nix::Result<()> {
    CANCEL
        .set(token.clone())
        .map_err(|_| nix::errno::Errno::EALREADY)?;

    let action = SigAction::new(
        SigHandler::Handler(on_termination),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        unsafe { sigaction(signal, &action) }?;
    }
    Ok(())
}
