//!
//! Two-phase cursor placement.
//!
//! An edit computes where the cursor should go, but the display
//! can only place it after it shows the new value. So the edit
//! hands out a [CursorRequest], and the display applies it when
//! it's ready.
//!
//! Every request carries a [CancelToken]. A newer request or
//! disposing the field cancels the older one, and applying a
//! cancelled request does nothing.
//!

use crate::upos_type;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag.
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel. All clones see this.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Cursor position waiting to be applied by the display.
#[derive(Debug, Clone)]
pub struct CursorRequest {
    pos: upos_type,
    token: CancelToken,
}

impl CursorRequest {
    pub fn new(pos: upos_type) -> Self {
        Self {
            pos,
            token: CancelToken::new(),
        }
    }

    /// Requested cursor position.
    #[inline]
    pub fn pos(&self) -> upos_type {
        self.pos
    }

    /// Token of this request.
    #[inline]
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Apply the request with the given function.
    ///
    /// Returns false and doesn't call f if the request has
    /// been cancelled in the meantime.
    pub fn apply(self, f: impl FnOnce(upos_type)) -> bool {
        if self.token.is_cancelled() {
            false
        } else {
            f(self.pos);
            true
        }
    }
}

/// The latest cursor request of a field.
///
/// The field keeps a clone of the token of the request it
/// handed out, that way it can cancel a request it doesn't
/// own anymore.
#[derive(Debug, Default)]
pub(crate) struct PendingCursor {
    request: Option<CursorRequest>,
    handed_out: Option<CancelToken>,
}

impl PendingCursor {
    /// Replace the current request. Cancels any older one.
    pub(crate) fn schedule(&mut self, pos: upos_type) {
        self.cancel();
        self.request = Some(CursorRequest::new(pos));
    }

    /// Cancel the current request, whether it has been
    /// handed out or not.
    pub(crate) fn cancel(&mut self) {
        if let Some(request) = self.request.take() {
            request.token.cancel();
        }
        if let Some(token) = self.handed_out.take() {
            token.cancel();
        }
    }

    /// Hand out the current request.
    pub(crate) fn take(&mut self) -> Option<CursorRequest> {
        let request = self.request.take()?;
        self.handed_out = Some(request.token.clone());
        Some(request)
    }

    /// Position of the request not yet handed out.
    pub(crate) fn peek(&self) -> Option<upos_type> {
        self.request.as_ref().map(|v| v.pos)
    }
}
