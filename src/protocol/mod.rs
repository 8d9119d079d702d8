pub mod messages;
pub mod request;

use crate::config::Endpoint;
use byteorder::{BigEndian, WriteBytesExt};
use log::debug;
use request::{KafkaDeserializable, KafkaRequest, KafkaSerializable};
use std::io::{Cursor, Error, ErrorKind, Result};
use tokio::net::TcpStream;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const INITIAL_BUFFER_SIZE: usize = 64 * 1024;
const MAX_RESPONSE_SIZE: usize = 64 * 1024 * 1024;

pub struct KafkaConnection {
    conn: TcpStream,
    client_id: String,
    correlation_id: i32,
    incoming: Vec<u8>,
    outgoing: Cursor<Vec<u8>>
}

impl KafkaConnection {
    pub async fn connect(endpoint: &Endpoint, client_id: &str) -> Result<KafkaConnection> {
        let conn = TcpStream::connect((endpoint.host.as_str(), endpoint.port)).await?;
        Ok(KafkaConnection::with_stream(conn, client_id))
    }

    pub fn with_stream(conn: TcpStream, client_id: &str) -> KafkaConnection {
        KafkaConnection {
            conn,
            client_id: client_id.to_owned(),
            correlation_id: 0,
            incoming: vec!(0; INITIAL_BUFFER_SIZE),
            outgoing: Cursor::new(Vec::with_capacity(INITIAL_BUFFER_SIZE))
        }
    }

    pub async fn send <R: KafkaRequest>(&mut self, request: &R) -> Result<R::Response> {
        self.correlation_id = self.correlation_id.wrapping_add(1);
        self.send_req(request).await?;
        self.read_resp().await
    }

    async fn send_req <R: KafkaRequest>(&mut self, request: &R) -> Result<()> {
        self.outgoing.get_mut().clear();
        self.outgoing.set_position(0);
        WriteBytesExt::write_i32::<BigEndian>(&mut self.outgoing, 0)?;
        WriteBytesExt::write_i16::<BigEndian>(&mut self.outgoing, R::api_key())?;
        WriteBytesExt::write_i16::<BigEndian>(&mut self.outgoing, R::api_version())?;
        WriteBytesExt::write_i32::<BigEndian>(&mut self.outgoing, self.correlation_id)?;
        self.client_id.serialize(&mut self.outgoing)?;
        request.serialize(&mut self.outgoing)?;
        let size = self.outgoing.position() as usize;
        self.outgoing.set_position(0);
        WriteBytesExt::write_i32::<BigEndian>(&mut self.outgoing, (size - 4) as i32)?;
        self.conn.write_all(&self.outgoing.get_ref()[0..size]).await?;
        self.conn.flush().await?;
        Ok(())
    }

    async fn read_resp <R: KafkaDeserializable>(&mut self) -> Result<R> {
        let len = self.conn.read_i32().await?;
        if len < 4 || len as usize > MAX_RESPONSE_SIZE {
            return Err(Error::new(ErrorKind::InvalidData, format!("invalid response size {}", len)));
        }
        let len = len as usize;
        if self.incoming.len() < len {
            self.incoming.resize(len, 0);
        }
        self.conn.read_exact(&mut self.incoming[0..len]).await?;

        let mut frame = Cursor::new(&self.incoming[0..len]);
        let correlation_id = i32::deserialize(&mut frame)?;
        if correlation_id != self.correlation_id {
            return Err(Error::new(ErrorKind::InvalidData, format!(
                "response correlation id {} does not match request {}", correlation_id, self.correlation_id)));
        }
        R::deserialize(&mut frame)
    }
}

/// Connects to the first bootstrap endpoint that accepts a connection.
///
/// Each endpoint is tried once, in order. When none of them can be reached the
/// error from the last attempt is returned.
pub async fn connect_any(endpoints: &[Endpoint], client_id: &str) -> Result<KafkaConnection> {
    let mut err: Option<Error> = None;

    for endpoint in endpoints {
        match KafkaConnection::connect(endpoint, client_id).await {
            Ok(conn) => {
                debug!("connected to bootstrap endpoint {}", endpoint);
                return Ok(conn);
            },
            Err(e) => {
                debug!("unable to connect to {}: {}", endpoint, e);
                err = Some(e);
            }
        }
    }

    Err(err.unwrap_or_else(|| Error::new(ErrorKind::InvalidInput, "no bootstrap endpoints configured")))
}
