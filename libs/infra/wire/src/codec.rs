// [libs/infra/wire/src/codec.rs]
//! Big-endian length-prefixed framing around a [`Message`].

use crate::errors::WireError;
use crate::message::Message;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Default ceiling on a single frame's declared length, in bytes.
pub const DEFAULT_MAX_MESSAGE_BYTES: u32 = 16 * 1024 * 1024;

/// Reads exactly one framed message from `reader`.
///
/// A short read at either the length-prefix or body stage, an oversized
/// declared length, or a body that fails to decode are all fatal: the
/// caller should drop the connection on any `Err`.
pub async fn read_message<R>(reader: &mut R, max_message_bytes: u32) -> Result<Message, WireError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf);

    if len > max_message_bytes {
        return Err(WireError::FrameTooLarge {
            declared: len,
            max: max_message_bytes,
        });
    }

    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;

    let message = bincode::deserialize(&body)?;
    Ok(message)
}

/// Serializes `message`, prefixes it with its big-endian u32 length, and
/// writes prefix and body in a single buffered write.
pub async fn write_message<W>(writer: &mut W, message: &Message) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
{
    let body = bincode::serialize(message)?;
    let len = u32::try_from(body.len()).map_err(|_| WireError::FrameTooLarge {
        declared: u32::MAX,
        max: u32::MAX,
    })?;

    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&body);

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ServerHelloOpcode;
    use std::io::Cursor;

    #[tokio::test]
    async fn round_trips_a_message() {
        let original = Message::ClientHello {
            client_proto: "1.0".into(),
        };

        let mut buf = Vec::new();
        write_message(&mut buf, &original).await.unwrap();

        let mut cursor = Cursor::new(buf);
        let decoded = read_message(&mut cursor, DEFAULT_MAX_MESSAGE_BYTES).await.unwrap();
        assert_eq!(decoded, original);
    }

    #[tokio::test]
    async fn rejects_declared_length_over_max() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&100u32.to_be_bytes());
        buf.extend_from_slice(&[0u8; 100]);

        let mut cursor = Cursor::new(buf);
        let err = read_message(&mut cursor, 10).await.unwrap_err();
        assert!(matches!(err, WireError::FrameTooLarge { .. }));
    }

    #[tokio::test]
    async fn short_body_is_io_error() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&100u32.to_be_bytes());
        buf.extend_from_slice(&[0u8; 10]);

        let mut cursor = Cursor::new(buf);
        let err = read_message(&mut cursor, DEFAULT_MAX_MESSAGE_BYTES).await.unwrap_err();
        assert!(matches!(err, WireError::Io(_)));
    }

    #[tokio::test]
    async fn server_hello_round_trips_with_opcode() {
        let original = Message::ServerHello {
            server_proto: "1.0".into(),
            opcode: ServerHelloOpcode::CLIENT_HELLO_OK,
            data: vec![1, 2, 3, 4],
        };
        let mut buf = Vec::new();
        write_message(&mut buf, &original).await.unwrap();
        let mut cursor = Cursor::new(buf);
        let decoded = read_message(&mut cursor, DEFAULT_MAX_MESSAGE_BYTES).await.unwrap();
        assert_eq!(decoded, original);
    }
}
