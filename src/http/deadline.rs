//! Per-operation I/O deadlines.
//!
//! [`DeadlineStream`] fails a single read or write that makes no progress
//! within its limit. A peer that keeps moving bytes is never cut off, however
//! long the whole transfer takes.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::time::{Sleep, sleep};

pub struct DeadlineStream<S> {
    inner: S,
    read_limit: Duration,
    write_limit: Duration,
    read_timer: Option<Pin<Box<Sleep>>>,
    write_timer: Option<Pin<Box<Sleep>>>,
}

impl<S> DeadlineStream<S> {
    pub fn new(inner: S, read_limit: Duration, write_limit: Duration) -> Self {
        Self {
            inner,
            read_limit,
            write_limit,
            read_timer: None,
            write_timer: None,
        }
    }
}

/// Arms `timer` on the first pending poll and reports whether it has fired.
fn expired(timer: &mut Option<Pin<Box<Sleep>>>, limit: Duration, cx: &mut Context<'_>) -> bool {
    let timer = timer.get_or_insert_with(|| Box::pin(sleep(limit)));
    timer.as_mut().poll(cx).is_ready()
}

fn timed_out(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, format!("timed out {what}"))
}

impl<S: AsyncRead + Unpin> AsyncRead for DeadlineStream<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(res) => {
                this.read_timer = None;
                Poll::Ready(res)
            }
            Poll::Pending if expired(&mut this.read_timer, this.read_limit, cx) => {
                this.read_timer = None;
                Poll::Ready(Err(timed_out("reading request")))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for DeadlineStream<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(res) => {
                this.write_timer = None;
                Poll::Ready(res)
            }
            Poll::Pending if expired(&mut this.write_timer, this.write_limit, cx) => {
                this.write_timer = None;
                Poll::Ready(Err(timed_out("writing response")))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_flush(cx) {
            Poll::Ready(res) => {
                this.write_timer = None;
                Poll::Ready(res)
            }
            Poll::Pending if expired(&mut this.write_timer, this.write_limit, cx) => {
                this.write_timer = None;
                Poll::Ready(Err(timed_out("writing response")))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
