//! Keeps the process panic hook quiet for panics the dispatcher catches.
//!
//! The hook installed here defers to the previous one unless the panicking
//! thread is currently polling a future wrapped by [`silenced`]. The flag is
//! set per poll, so it follows the future across runtime worker threads.

use std::cell::Cell;
use std::future::Future;
use std::panic;
use std::pin::pin;
use std::sync::Once;
use std::task::Poll;

use futures::future::poll_fn;

thread_local! {
    static CATCHING: Cell<u32> = const { Cell::new(0) };
}

static INSTALL: Once = Once::new();

fn install_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CATCHING.with(Cell::get) == 0 {
                previous(info);
            }
        }));
    });
}

struct CatchScope;

impl CatchScope {
    fn enter() -> Self {
        CATCHING.with(|depth| depth.set(depth.get() + 1));
        CatchScope
    }
}

impl Drop for CatchScope {
    fn drop(&mut self) {
        CATCHING.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Drive `future` with panic reporting suppressed; the caller must catch.
pub(super) async fn silenced<F: Future>(future: F) -> F::Output {
    install_hook();
    let mut future = pin!(future);
    poll_fn(|cx| -> Poll<F::Output> {
        let _scope = CatchScope::enter();
        future.as_mut().poll(cx)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::panic::AssertUnwindSafe;

    fn explode() -> u32 {
        panic!("inside")
    }

    #[tokio::test]
    async fn scope_is_released_after_panic() {
        let caught = AssertUnwindSafe(silenced(async { explode() }))
            .catch_unwind()
            .await;
        let payload = caught.err().unwrap();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"inside"));
        assert_eq!(CATCHING.with(Cell::get), 0);
    }

    #[tokio::test]
    async fn passes_output_through() {
        assert_eq!(silenced(async { 41 + 1 }).await, 42);
        assert_eq!(CATCHING.with(Cell::get), 0);
    }
}
