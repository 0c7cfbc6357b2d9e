//! Byte chunks -> lines
//!
//! Network chunks split lines (and UTF-8 sequences) at arbitrary points, so
//! bytes are buffered until a `\n` arrives and only then decoded.

use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::{stream, StreamExt};

/// Split a byte stream on `\n`, dropping a trailing `\r`.
///
/// An unterminated final line is emitted at end of input. After an error
/// item the stream ends.
pub fn lines(input: BoxStream<'static, Bytes>) -> BoxStream<'static, String> {
    let stream = stream::unfold(Framer::new(input), |mut framer| async move {
        let item = framer.next_line().await?;
        Some((item, framer))
    });

    Box::pin(stream)
}

struct Framer {
    input: BoxStream<'static, Bytes>,
    buf: Vec<u8>,
    // bytes of `buf` already known to hold no newline
    scanned: usize,
    eof: bool,
}

impl Framer {
    fn new(input: BoxStream<'static, Bytes>) -> Self {
        Self {
            input,
            buf: Vec::new(),
            scanned: 0,
            eof: false,
        }
    }

    async fn next_line(&mut self) -> Option<Result<String>> {
        loop {
            if let Some(pos) = self.buf[self.scanned..].iter().position(|b| *b == b'\n') {
                let idx = self.scanned + pos;
                let mut line: Vec<u8> = self.buf.drain(..=idx).collect();
                self.scanned = 0;
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Some(Ok(into_string(line)));
            }
            self.scanned = self.buf.len();

            if self.eof {
                if self.buf.is_empty() {
                    return None;
                }
                self.scanned = 0;
                return Some(Ok(into_string(std::mem::take(&mut self.buf))));
            }

            match self.input.next().await {
                Some(Ok(bytes)) => self.buf.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    self.buf.clear();
                    self.scanned = 0;
                    self.eof = true;
                    return Some(Err(e));
                }
                None => self.eof = true,
            }
        }
    }
}

fn into_string(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(parts: Vec<&'static [u8]>) -> Vec<String> {
        let input: Vec<Result<Bytes>> = parts.into_iter().map(|p| Ok(Bytes::from_static(p))).collect();
        lines(Box::pin(stream::iter(input)))
            .map(|l| l.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn joins_lines_across_chunks() {
        let out = collect(vec![&b"data: ab"[..], &b"c\r\n\nda"[..], &b"ta: d\n"[..]]).await;
        assert_eq!(out, vec!["data: abc", "", "data: d"]);
    }

    #[tokio::test]
    async fn keeps_multibyte_characters_split_between_chunks() {
        // "é" is 0xC3 0xA9
        let out = collect(vec![&b"caf\xC3"[..], &b"\xA9\n"[..]]).await;
        assert_eq!(out, vec!["café"]);
    }

    #[tokio::test]
    async fn flushes_unterminated_tail() {
        let out = collect(vec![&b"one\ntwo"[..]]).await;
        assert_eq!(out, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn long_line_in_small_chunks() {
        let mut parts: Vec<&'static [u8]> = vec![&b"x"[..]; 5000];
        parts.push(&b"\nnext\n"[..]);
        let out = collect(parts).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 5000);
        assert_eq!(out[1], "next");
    }

    #[tokio::test]
    async fn error_ends_the_stream() {
        use crate::transport::TransportError;
        use crate::Error;

        let input: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"one\npartial")),
            Err(Error::Transport(TransportError::Other("reset".into()))),
            Ok(Bytes::from_static(b"never\n")),
        ];
        let out: Vec<Result<String>> = lines(Box::pin(stream::iter(input))).collect().await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_ref().unwrap(), "one");
        assert!(out[1].is_err());
    }

    #[tokio::test]
    async fn empty_body_yields_nothing() {
        assert!(collect(vec![]).await.is_empty());
    }
}
