use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tungstenite::client::IntoClientRequest;
use tungstenite::{Message, WebSocket};

use crate::error::{Error, Result};

use super::protocol::{Connector, DeviceLink, Reply, Request};

/// Connects to a usb2snes-compatible websocket server (QUsb2Snes, SNI).
#[derive(Debug, Clone)]
pub struct WsConnector {
    endpoint: String,
    timeout: Duration,
}

impl WsConnector {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

fn failed(e: impl std::fmt::Display) -> Error {
    Error::DeviceQueryFailed(e.to_string())
}

fn ws_error(e: tungstenite::Error) -> Error {
    match e {
        tungstenite::Error::Io(io)
            if matches!(io.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
        {
            Error::DeviceQueryTimeout
        }
        other => failed(other),
    }
}

impl Connector for WsConnector {
    type Link = WsLink;

    fn connect(&self) -> Result<WsLink> {
        let request = self.endpoint.as_str().into_client_request().map_err(failed)?;
        let host = request
            .uri()
            .host()
            .ok_or_else(|| failed(format!("no host in {}", self.endpoint)))?;
        let port = request.uri().port_u16().unwrap_or(80);
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(failed)?
            .next()
            .ok_or_else(|| failed(format!("cannot resolve {host}")))?;

        let stream = TcpStream::connect_timeout(&addr, self.timeout).map_err(failed)?;
        stream.set_read_timeout(Some(self.timeout)).map_err(failed)?;
        stream.set_write_timeout(Some(self.timeout)).map_err(failed)?;

        let (socket, _) = tungstenite::client(request, stream).map_err(failed)?;
        Ok(WsLink { socket })
    }
}

pub struct WsLink {
    socket: WebSocket<TcpStream>,
}

impl WsLink {
    fn send(&mut self, request: &Request) -> Result<()> {
        let text = serde_json::to_string(request)?;
        self.socket.send(Message::text(text)).map_err(ws_error)
    }

    fn next_message(&mut self) -> Result<Message> {
        loop {
            match self.socket.read().map_err(ws_error)? {
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
                Message::Close(_) => return Err(failed("server closed the connection")),
                message => return Ok(message),
            }
        }
    }
}

impl DeviceLink for WsLink {
    fn device_list(&mut self) -> Result<Vec<String>> {
        self.send(&Request::device_list())?;
        match self.next_message()? {
            Message::Text(text) => {
                let reply: Reply = serde_json::from_str(text.as_str()).map_err(failed)?;
                Ok(reply.results)
            }
            _ => Err(failed("unexpected binary reply to DeviceList")),
        }
    }

    fn attach(&mut self, device: &str) -> Result<()> {
        self.send(&Request::attach(device))
    }

    fn read_memory(&mut self, address: &str, size: usize) -> Result<Vec<u8>> {
        self.send(&Request::get_address(address, size))?;

        // The bytes may arrive split over several binary frames.
        let mut bytes = Vec::with_capacity(size);
        while bytes.len() < size {
            match self.next_message()? {
                Message::Binary(data) => bytes.extend_from_slice(&data),
                _ => return Err(failed("unexpected text reply to GetAddress")),
            }
        }
        bytes.truncate(size);
        Ok(bytes)
    }
}
