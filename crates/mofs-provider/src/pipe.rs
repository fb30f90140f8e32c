use std::io::{self, Read};
use std::thread;

use bytes::{Buf, Bytes};
use crossbeam_channel::{bounded, Receiver};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Chunks buffered between producer and reader.
const PIPE_DEPTH: usize = 4;

/// Read end of a blob pipe.
///
/// Returns `Ok(0)` once the producer has sent everything and dropped its
/// sender. Dropping the reader early makes the producer stop at its next
/// send.
#[derive(Debug)]
pub struct PipeReader {
    rx: Receiver<Bytes>,
    current: Bytes,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while !self.current.has_remaining() {
            match self.rx.recv() {
                Ok(chunk) => self.current = chunk,
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.current.remaining());
        self.current.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }
}

/// Stream `data` through a bounded channel from a dedicated thread.
pub fn spawn_pipe(data: Bytes, chunk_size: usize) -> ProviderResult<PipeReader> {
    let chunk_size = chunk_size.max(1);
    let (tx, rx) = bounded::<Bytes>(PIPE_DEPTH);
    thread::Builder::new()
        .name("mofs-pipe".into())
        .spawn(move || {
            let total = data.len();
            let mut sent = 0;
            while sent < total {
                let end = (sent + chunk_size).min(total);
                if tx.send(data.slice(sent..end)).is_err() {
                    debug!(sent, total, "pipe reader went away");
                    return;
                }
                sent = end;
            }
            debug!(total, "pipe drained");
        })
        .map_err(ProviderError::Pipe)?;
    Ok(PipeReader {
        rx,
        current: Bytes::new(),
    })
}
