//! Module `client`
//!
//! Defines `SessionClient`, the state machine driving one submission from
//! connection through handshake, language negotiation, uploads, query and
//! shutdown.
//!
//! Every operation suspends until its write is accepted or its response
//! line arrives; there is no timeout or cancellation here. Callers needing a
//! bounded wait wrap the future in `tokio::time::timeout`. Shutting the
//! underlying stream down from elsewhere surfaces as a transport error on the
//! pending operation.

use log::{debug, info, warn};
use std::net::SocketAddr;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpSocket, TcpStream, lookup_host};
use url::Url;

use crate::error::SessionError;
use crate::protocol::{Command, Language, parse_language_ack, parse_query_result, read_response_line};
use crate::session::{Operation, SessionOptions, Stage};
use crate::transfer::{load_source_file, write_file_frame};

/// Public MOSS service address.
pub const DEFAULT_SERVER_ADDRESS: &str = "moss.stanford.edu:7690";

/// Set id reserved for base files.
pub const BASE_SET_ID: u32 = 0;

/// One client-side submission session over an exclusively owned stream.
///
/// The stream type defaults to TCP; any `AsyncRead + AsyncWrite` stream can
/// be attached instead.
pub struct SessionClient<S = TcpStream> {
    stage: Stage,
    server_address: String,
    identity: String,
    language: Language,
    next_set_id: u32,
    options: SessionOptions,
    result_location: Option<Url>,
    connection: Option<BufReader<S>>,
    closed: bool,
}

impl<S> SessionClient<S> {
    /// Creates a disconnected session after validating the language tag.
    pub fn new(language: &str, identity: impl Into<String>) -> Result<Self, SessionError> {
        let language = language.parse::<Language>()?;
        Ok(Self {
            stage: Stage::Disconnected,
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            identity: identity.into(),
            language,
            next_set_id: 1,
            options: SessionOptions::default(),
            result_location: None,
            connection: None,
            closed: false,
        })
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Set id the next non-base upload will receive.
    pub fn next_set_id(&self) -> u32 {
        self.next_set_id
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The report URL, once a query has succeeded.
    pub fn result_location(&self) -> Option<&Url> {
        self.result_location.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // --------------------
    // Setter methods
    // --------------------

    /// Mutable options, available until the query has been sent.
    pub fn options_mut(&mut self) -> Result<&mut SessionOptions, SessionError> {
        if self.closed {
            return Err(SessionError::SessionClosed);
        }
        if !self.stage.accepts_option_changes() {
            return Err(SessionError::InvalidStage {
                operation: Operation::SendQuery,
                stage: self.stage,
            });
        }
        Ok(&mut self.options)
    }

    /// Changes the `host:port` dialled by `connect`. Only legal before connecting.
    pub fn set_server_address(&mut self, address: impl Into<String>) -> Result<(), SessionError> {
        self.guard(Operation::Connect)?;
        self.server_address = address.into();
        Ok(())
    }

    /// Checks `operation` against the stage table and returns the stage it
    /// leads to on success.
    fn guard(&self, operation: Operation) -> Result<Stage, SessionError> {
        if self.closed {
            return Err(SessionError::SessionClosed);
        }
        match self.stage.after(operation) {
            Some(next) => Ok(next),
            None if operation == Operation::Connect => Err(SessionError::AlreadyConnected),
            None => Err(SessionError::InvalidStage {
                operation,
                stage: self.stage,
            }),
        }
    }
}

impl<S> SessionClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Adopts an already open stream in place of dialling `server_address`.
    pub fn attach(&mut self, stream: S) -> Result<(), SessionError> {
        let next = self.guard(Operation::Connect)?;
        self.connection = Some(BufReader::new(stream));
        self.stage = next;
        Ok(())
    }

    /// Sends the identity and handshake options.
    pub async fn send_initialization(&mut self) -> Result<(), SessionError> {
        let next = self.guard(Operation::SendInitialization)?;

        let commands = [
            Command::Moss(self.identity.clone()),
            Command::Directory(self.options.directory_mode),
            Command::Experimental(self.options.experimental),
            Command::MaxMatches(self.options.max_matches),
            Command::Show(self.options.show_limit),
        ];
        for command in &commands {
            self.send_command(command).await?;
        }

        self.stage = next;
        Ok(())
    }

    /// Sends the session language and waits for the server to accept it.
    pub async fn send_language(&mut self) -> Result<(), SessionError> {
        let next = self.guard(Operation::SendLanguage)?;

        self.send_command(&Command::Language(self.language)).await?;
        let reply = self.read_response().await?;
        if let Err(e) = parse_language_ack(&reply) {
            warn!("Server rejected language {}: {:?}", self.language, reply);
            return Err(e);
        }

        info!("Server accepted language {}", self.language);
        self.stage = next;
        Ok(())
    }

    /// Like [`send_language`](Self::send_language), announcing `language`
    /// instead of the one given at construction.
    pub async fn send_language_as(&mut self, language: Language) -> Result<(), SessionError> {
        self.guard(Operation::SendLanguage)?;
        self.language = language;
        self.send_language().await
    }

    /// Uploads one source file. Base files go under set id 0 and are excluded
    /// from pairwise comparison; every other file gets the next set id.
    pub async fn upload_file(
        &mut self,
        path: impl AsRef<Path>,
        is_base_file: bool,
    ) -> Result<(), SessionError> {
        let next = self.guard(Operation::UploadFile)?;
        let file = load_source_file(path.as_ref()).await?;

        let set_id = if is_base_file {
            BASE_SET_ID
        } else {
            self.next_set_id
        };
        let language = self.language;
        write_file_frame(self.stream()?, set_id, language, &file).await?;

        if !is_base_file {
            self.next_set_id += 1;
        }
        self.stage = next;
        Ok(())
    }

    /// Submits the query and returns the report location.
    ///
    /// A non-`http` reply leaves the session in `AwaitingResults`, from which
    /// only `close` is legal.
    pub async fn send_query(&mut self) -> Result<Url, SessionError> {
        let next = self.guard(Operation::SendQuery)?;
        if self.next_set_id == 1 {
            return Err(SessionError::NoFilesUploaded);
        }

        self.send_command(&Command::Query(self.options.comment.clone()))
            .await?;
        self.stage = Stage::AwaitingResults;

        let reply = self.read_response().await?;
        let url = parse_query_result(&reply).inspect_err(|_| {
            warn!("Query failed, server replied {:?}", reply);
        })?;

        info!("Results available at {}", url);
        self.result_location = Some(url.clone());
        self.stage = next;
        Ok(url)
    }

    /// Sends `end` and releases the stream. The stream is released even when
    /// the `end` write fails; the last error encountered is returned.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        let next = self.guard(Operation::Close)?;

        let mut outcome = self.send_command(&Command::End).await;
        if let Some(mut stream) = self.connection.take() {
            if let Err(e) = stream.shutdown().await {
                outcome = Err(e.into());
            }
        }
        if let Err(e) = &outcome {
            warn!("Session closed with error: {}", e);
        }

        self.stage = next;
        self.closed = true;
        outcome
    }

    fn stream(&mut self) -> Result<&mut BufReader<S>, SessionError> {
        self.connection.as_mut().ok_or_else(|| {
            SessionError::Transport(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "session has no open stream",
            ))
        })
    }

    async fn send_command(&mut self, command: &Command) -> Result<(), SessionError> {
        let line = command.encode()?;
        debug!("> {}", line.trim_end());

        let stream = self.stream()?;
        stream.write_all(line.as_bytes()).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn read_response(&mut self) -> Result<String, SessionError> {
        let reply = read_response_line(self.stream()?).await?;
        debug!("< {}", reply);
        Ok(reply)
    }
}

impl SessionClient<TcpStream> {
    /// Dials `server_address` with TCP keep-alive enabled.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        self.guard(Operation::Connect)?;

        let addrs: Vec<SocketAddr> = lookup_host(self.server_address.as_str()).await?.collect();
        let mut last_error = None;
        for addr in addrs {
            let socket = if addr.is_ipv4() {
                TcpSocket::new_v4()?
            } else {
                TcpSocket::new_v6()?
            };
            socket.set_keepalive(true)?;

            match socket.connect(addr).await {
                Ok(stream) => {
                    info!("Connected to MOSS server at {}", addr);
                    return self.attach(stream);
                }
                Err(e) => {
                    debug!("Connection to {} failed: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(SessionError::Transport(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("{} did not resolve to any address", self.server_address),
            )
        })))
    }

    /// Standard opening sequence: connect, send initialization, send
    /// language. Stops at the first failure and keeps whatever progress was
    /// made.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        self.connect().await?;
        self.send_initialization().await?;
        self.send_language().await?;
        Ok(())
    }
}
