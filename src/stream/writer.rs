//! Writes BinON objects to an async byte stream.

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::codec::encode_object;
use crate::error::BinonError;
use crate::types::Object;

/// Writes objects back to back to an `AsyncWrite` stream.
///
/// Each object is fully encoded before any byte reaches the stream, so a
/// failed encode writes nothing.
pub struct ObjectWriter<W> {
    writer: W,
    buf: BytesMut,
}

impl<W: AsyncWrite + Unpin> ObjectWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: BytesMut::new(),
        }
    }

    pub async fn write_object(&mut self, obj: &Object) -> Result<(), BinonError> {
        self.buf.clear();
        encode_object(&mut self.buf, obj)?;
        self.writer.write_all(&self.buf).await?;
        tracing::trace!(bytes = self.buf.len(), "wrote object");
        Ok(())
    }

    /// Flushes the underlying writer.
    pub async fn flush(&mut self) -> Result<(), BinonError> {
        self.writer.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodeByte;
    use crate::stream::ObjectReader;
    use crate::types::StrictList;

    #[tokio::test]
    async fn write_objects_back_to_back() {
        let mut output = Vec::new();
        let mut writer = ObjectWriter::new(&mut output);
        writer.write_object(&Object::from(0u64)).await.unwrap();
        writer.write_object(&Object::from("a")).await.unwrap();
        writer.flush().await.unwrap();
        assert_eq!(output, vec![0x40, 0x81, 0x01, b'a']);
    }

    #[tokio::test]
    async fn failed_encode_writes_nothing() {
        let mut output = Vec::new();
        let mut writer = ObjectWriter::new(&mut output);
        let bad = StrictList::with_items(CodeByte::INT, vec![Object::from("x")]);
        assert!(writer.write_object(&Object::StrictList(bad)).await.is_err());
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn writer_to_reader() {
        let (tx, rx) = tokio::io::duplex(16);
        let objects = vec![
            Object::List(vec![Object::from(1i64); 20]),
            Object::from(vec![0xAAu8; 40]),
            Object::Null,
        ];
        let sent = objects.clone();
        let task = tokio::spawn(async move {
            let mut writer = ObjectWriter::new(tx);
            for obj in &sent {
                writer.write_object(obj).await.unwrap();
            }
        });
        let mut reader = ObjectReader::new(rx);
        for expected in objects {
            assert_eq!(reader.read_object().await.unwrap(), Some(expected));
        }
        task.await.unwrap();
        assert_eq!(reader.read_object().await.unwrap(), None);
    }
}
