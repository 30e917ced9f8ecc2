//! Reads BinON objects from an async byte stream.

use std::io;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::Decoder;
use crate::error::BinonError;
use crate::types::Object;

/// Minimum read-ahead.
const READ_CHUNK: usize = 8 * 1024;

/// Reads consecutive self-terminating objects from an `AsyncRead` stream.
///
/// A partially received object is decoded again from its first byte once
/// enough input has arrived. Retries wait for at least the shortfall the last
/// attempt reported, and each read may fill up to the size already buffered,
/// so a large string or buffer decodes about twice. A container of many small
/// elements trickling in from a slow peer can still be decoded once per read.
pub struct ObjectReader<R> {
    reader: R,
    buf: BytesMut,
    decoder: Decoder,
    /// Buffered length below which decoding cannot succeed.
    want: usize,
}

impl<R: AsyncRead + Unpin> ObjectReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_decoder(reader, Decoder::default())
    }

    /// Uses `decoder` (and its limits) for every object read.
    pub fn with_decoder(reader: R, decoder: Decoder) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(READ_CHUNK),
            decoder,
            want: 0,
        }
    }

    /// Reads the next object.
    ///
    /// Returns `None` when the stream ends cleanly between objects. A stream
    /// that ends partway through an object is an I/O error.
    pub async fn read_object(&mut self) -> Result<Option<Object>, BinonError> {
        loop {
            if !self.buf.is_empty() && self.buf.len() >= self.want {
                let mut cursor = &self.buf[..];
                match self.decoder.decode(&mut cursor) {
                    Ok(obj) => {
                        let used = self.buf.len() - cursor.len();
                        self.buf.advance(used);
                        self.want = 0;
                        tracing::trace!(bytes = used, "decoded object");
                        return Ok(Some(obj));
                    }
                    Err(e) if e.is_incomplete() => {
                        self.want = self.buf.len() + e.shortfall().unwrap_or(1);
                        tracing::trace!(
                            buffered = self.buf.len(),
                            want = self.want,
                            "object incomplete"
                        );
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "malformed object on stream");
                        return Err(e);
                    }
                }
            }

            self.buf.reserve(READ_CHUNK.max(self.buf.len()));
            let n = self.reader.read_buf(&mut self.buf).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(BinonError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("stream closed inside an object ({} bytes buffered)", self.buf.len()),
                )));
            }
        }
    }

    /// Bytes received but not yet consumed by a decoded object.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn read_consecutive_objects() {
        let data: Vec<u8> = vec![
            0x41, 0x05, // UInt 5
            0x81, 0x02, b'h', b'i', // "hi"
            0x21, // true
        ];
        let mut reader = ObjectReader::new(Cursor::new(data));
        assert_eq!(reader.read_object().await.unwrap(), Some(Object::from(5u64)));
        assert_eq!(reader.read_object().await.unwrap(), Some(Object::from("hi")));
        assert_eq!(reader.read_object().await.unwrap(), Some(Object::Bool(true)));
        assert_eq!(reader.read_object().await.unwrap(), None);
    }

    #[tokio::test]
    async fn object_split_across_reads() {
        let (mut tx, rx) = tokio::io::duplex(64);
        let mut reader = ObjectReader::new(rx);
        let task = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            tx.write_all(&[0x91, 0x02, 0x31]).await.unwrap();
            tx.flush().await.unwrap();
            tokio::task::yield_now().await;
            tx.write_all(&[0x07, 0x10]).await.unwrap();
        });
        let obj = reader.read_object().await.unwrap().unwrap();
        assert_eq!(
            obj,
            Object::List(vec![Object::from(7i64), Object::Bool(false)])
        );
        task.await.unwrap();
    }

    #[tokio::test]
    async fn large_list_arrives_in_pieces() {
        let items: Vec<Object> = (0..20_000u64).map(Object::from).collect();
        let list = Object::List(items);
        let bytes = crate::codec::to_bytes(&list).unwrap();

        let (mut tx, rx) = tokio::io::duplex(4096);
        let mut reader = ObjectReader::new(rx);
        let task = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            for piece in bytes.chunks(1000) {
                tx.write_all(piece).await.unwrap();
            }
            tx.write_all(&[0x00]).await.unwrap();
        });
        assert_eq!(reader.read_object().await.unwrap(), Some(list));
        assert_eq!(reader.read_object().await.unwrap(), Some(Object::Null));
        assert_eq!(reader.read_object().await.unwrap(), None);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn large_string_waits_for_its_payload() {
        let text = "x".repeat(100_000);
        let bytes = crate::codec::to_bytes(&Object::from(text.clone())).unwrap();

        let (mut tx, rx) = tokio::io::duplex(512);
        let mut reader = ObjectReader::new(rx);
        let task = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            tx.write_all(&bytes).await.unwrap();
        });
        let obj = reader.read_object().await.unwrap().unwrap();
        assert_eq!(obj.as_str(), Some(text.as_str()));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn truncated_stream_is_io_error() {
        let mut reader = ObjectReader::new(Cursor::new(vec![0x81u8, 0x04, b'a']));
        let err = reader.read_object().await.unwrap_err();
        assert!(matches!(err, BinonError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[tokio::test]
    async fn malformed_object_is_reported() {
        let mut reader = ObjectReader::new(Cursor::new(vec![0xF0u8]));
        assert!(matches!(
            reader.read_object().await,
            Err(BinonError::BadCodeByte(0xF0))
        ));
    }

    #[tokio::test]
    async fn decoder_limits_apply() {
        let decoder = Decoder::new().max_len(2);
        let mut reader = ObjectReader::with_decoder(Cursor::new(vec![0x71u8, 0x03, 1, 2, 3]), decoder);
        assert!(matches!(
            reader.read_object().await,
            Err(BinonError::LengthLimit { .. })
        ));
    }
}
