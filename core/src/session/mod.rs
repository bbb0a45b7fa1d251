//! Session event loop
//!
//! One [`Session`] owns the deck, the telemetry reactor and the console
//! interpreter. Telemetry, console lines and card lookup completions all arrive
//! on the session task and are handled one at a time, so the deck is never
//! touched concurrently.

use std::sync::Arc;

use deckwatch_types::{AppConfig, Card, LogLine};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::catalog::CardCatalog;
use crate::command::{CommandInterpreter, Outcome};
use crate::deck::{CardResolver, DeckModel, Resolution};
use crate::error::EngineError;
use crate::telemetry::{
    EventBatch, InfoUpdate, MatchLifecycle, Subscription, TelemetryReactor, TelemetryUpdate,
};


const COMMAND_BUFFER: usize = 256;
const RESOLUTION_BUFFER: usize = 256;

/// Rendering surface supplied by the host.
pub trait OverlaySink: Send + 'static {
    fn render(&mut self, deck: &[Card]);
    fn append_log_line(&mut self, line: LogLine);
}

#[derive(Debug, Clone)]
pub enum SessionCommand {
    Info(InfoUpdate),
    Events(EventBatch),
    Console(String),
    Shutdown,
}

impl From<TelemetryUpdate> for SessionCommand {
    fn from(update: TelemetryUpdate) -> Self {
        match update {
            TelemetryUpdate::Info(info) => Self::Info(info),
            TelemetryUpdate::Events(batch) => Self::Events(batch),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session has shut down")]
pub struct SessionClosed;

/// Cloneable front for a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn new(cmd_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { cmd_tx }
    }

    pub async fn send(&self, update: TelemetryUpdate) -> Result<(), SessionClosed> {
        self.command(update.into()).await
    }

    /// Submit a line of console input
    pub async fn submit_line(&self, line: impl Into<String>) -> Result<(), SessionClosed> {
        self.command(SessionCommand::Console(line.into())).await
    }

    pub async fn shutdown(&self) -> Result<(), SessionClosed> {
        self.command(SessionCommand::Shutdown).await
    }

    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    async fn command(&self, cmd: SessionCommand) -> Result<(), SessionClosed> {
        self.cmd_tx.send(cmd).await.map_err(|_| SessionClosed)
    }
}

pub struct Session<C, S> {
    deck: DeckModel,
    reactor: TelemetryReactor,
    interpreter: CommandInterpreter,
    resolver: CardResolver<C>,
    resolutions: mpsc::Receiver<Resolution>,
    sink: S,
    mirror_telemetry: bool,
    highlight_events: Vec<String>,
}

impl<C: CardCatalog, S: OverlaySink> Session<C, S> {
    pub fn new(catalog: Arc<C>, sink: S, config: &AppConfig) -> Self {
        let (resolver, resolutions) = CardResolver::channel(catalog, RESOLUTION_BUFFER);
        Self {
            deck: DeckModel::new(),
            reactor: TelemetryReactor::new(Subscription::default()),
            interpreter: CommandInterpreter::new(),
            resolver,
            resolutions,
            sink,
            mirror_telemetry: config.mirror_telemetry,
            highlight_events: config.highlight_events.clone(),
        }
    }

    pub fn deck(&self) -> &DeckModel {
        &self.deck
    }

    pub fn lifecycle(&self) -> MatchLifecycle {
        self.reactor.lifecycle()
    }

    pub fn active_deck(&self) -> Option<&[Card]> {
        self.reactor.active_deck()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle one command. Returns false once the session should stop.
    pub fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Info(update) => self.on_info_update(update),
            SessionCommand::Events(batch) => self.on_event_batch(batch),
            SessionCommand::Console(line) => self.on_console_line(&line),
            SessionCommand::Shutdown => return false,
        }
        true
    }

    fn on_info_update(&mut self, update: InfoUpdate) {
        if self.mirror_telemetry {
            self.sink.append_log_line(LogLine::plain(update.to_json()));
        }

        if self
            .reactor
            .on_info_update(&update, &mut self.deck, &self.resolver)
            .is_some()
        {
            self.render_deck();
        }
    }

    fn on_event_batch(&mut self, batch: EventBatch) {
        if self.mirror_telemetry {
            let mut line = LogLine::plain(batch.to_json());
            line.highlight = batch.contains_any(&self.highlight_events);
            self.sink.append_log_line(line);
        }

        if let Some(active) = self.reactor.on_event_batch(&batch, &self.deck) {
            self.sink.append_log_line(LogLine::highlighted("MATCH STARTED"));
            self.sink.render(active);
        }
    }

    fn on_console_line(&mut self, line: &str) {
        let outcome = self.interpreter.parse_and_execute(line, &mut self.deck);
        let Some(message) = outcome.message() else {
            return;
        };

        self.sink
            .append_log_line(LogLine::from_spans(self.interpreter.tag_tokens(line)));

        match outcome {
            Outcome::Executed(_) => {
                self.sink.append_log_line(LogLine::plain(message));
                self.render_deck();
            }
            Outcome::Rejected(err) => {
                debug!(error = %EngineError::from(err), "Rejected console command");
                self.sink.append_log_line(LogLine::highlighted(message));
            }
            Outcome::Blank => {}
        }
    }

    /// Apply one card lookup completion.
    pub fn apply_resolution(&mut self, resolution: Resolution) {
        match self.deck.complete(resolution) {
            Ok(()) => self.render_deck(),
            Err(e @ EngineError::StaleResolution { .. }) => {
                debug!(error = %e, "Discarding stale card resolution");
            }
            Err(e) => {
                warn!(error = %e, "Card omitted from deck");
            }
        }
    }

    /// Render the deck after a change, keeping the active deck in step while in a match.
    fn render_deck(&mut self) {
        match self.reactor.refresh_active_deck(&self.deck) {
            Some(active) => self.sink.render(active),
            None => self.sink.render(self.deck.cards()),
        }
    }

    /// Wait for every outstanding lookup of the current rebuild.
    pub async fn settle(&mut self) {
        while self.deck.is_rebuilding() {
            match self.resolutions.recv().await {
                Some(resolution) => self.apply_resolution(resolution),
                None => break,
            }
        }
    }

    /// Run until shutdown or until every handle is dropped, then hand the sink back.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> S {
        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(cmd) => {
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    None => break,
                },
                Some(resolution) = self.resolutions.recv() => {
                    self.apply_resolution(resolution);
                }
            }
        }

        debug!("Session loop finished");
        self.sink
    }
}

/// Start a session on its own task.
pub fn spawn_session<C: CardCatalog, S: OverlaySink>(
    catalog: Arc<C>,
    sink: S,
    config: &AppConfig,
) -> (SessionHandle, JoinHandle<S>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let session = Session::new(catalog, sink, config);
    let handle = tokio::spawn(session.run(cmd_rx));
    (SessionHandle::new(cmd_tx), handle)
}
