//! Session controller implementation
//!
//! Each iteration runs in a fixed order: sample the joystick, update the
//! paddle target, receive and draw one state frame, check for the end of
//! the match, then send the paddle update. The controller owns the link
//! and the display, and closes the link exactly once when the session ends.

use crate::config::{DisplayGeometry, Endpoint, InputTuning, SessionConfig};
use crate::game::{BallMotion, GameState, Outcome};
use crate::input::PaddleTarget;
use crate::net::{FrameFault, JoinStatus, LinkMonitor, LinkStatus, NetClient, ServerUpdate};
use crate::state::{AbortReason, SessionEvent, SessionState};
use crate::traits::{DisplayError, GameDisplay, Joystick, Link, LinkError};

/// Fatal session errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// Could not open the connection
    ConnectFailed,
    /// Join request failed or the acknowledgement was unreadable
    JoinFailed,
    /// No opponent joined in time
    JoinTimeout,
    /// Too many consecutive inbound faults
    LinkLost,
    /// Operation not valid in the current state
    NotPlaying(SessionState),
}

impl From<AbortReason> for SessionError {
    fn from(reason: AbortReason) -> Self {
        match reason {
            AbortReason::ConnectFailed => SessionError::ConnectFailed,
            AbortReason::JoinFailed => SessionError::JoinFailed,
            AbortReason::JoinTimeout => SessionError::JoinTimeout,
            AbortReason::LinkLost => SessionError::LinkLost,
        }
    }
}

/// Report of one playing iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Iteration {
    /// Paddle target sent this iteration
    pub paddle_y: i16,
    /// Outcome of receiving the state frame
    pub frame: Result<(), FrameFault>,
    /// Outcome of drawing the frame (Ok when nothing was drawn)
    pub display: Result<(), DisplayError>,
    /// Outcome of sending the paddle update
    pub send: Result<(), LinkError>,
    /// Link health after this iteration
    pub link: LinkStatus,
}

/// Result of a successful [`Session::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Match still in progress
    Continue(Iteration),
    /// Match over; the terminal screen was drawn and the link closed
    Finished {
        outcome: Outcome,
        display: Result<(), DisplayError>,
    },
}

/// Hooks for reporting session progress
///
/// All methods default to doing nothing. The firmware implements this to
/// log progress.
pub trait SessionObserver {
    /// Connection opened
    fn on_connected(&mut self) {}

    /// Lobby screen redrawn while waiting for an opponent
    fn on_lobby_tick(&mut self, _waited_ms: u32, _display: Result<(), DisplayError>) {}

    /// Join acknowledged
    fn on_joined(&mut self, _status: &str) {}

    /// One playing iteration completed
    fn on_iteration(&mut self, _iteration: &Iteration) {}

    /// Match over
    fn on_finished(&mut self, _outcome: Outcome, _display: Result<(), DisplayError>) {}
}

impl SessionObserver for () {}

/// One game session
pub struct Session<J: Joystick, L: Link, D: GameDisplay> {
    joystick: J,
    client: NetClient<L>,
    display: D,
    state: SessionState,
    target: PaddleTarget,
    /// Last valid snapshot; a bad frame never replaces it
    last_state: Option<GameState>,
    monitor: LinkMonitor,
    lobby_ball: BallMotion,
    endpoint: Endpoint,
    config: SessionConfig,
    tuning: InputTuning,
}

impl<J: Joystick, L: Link, D: GameDisplay> Session<J, L, D> {
    /// Create a session; nothing touches the link until [`Session::connect`]
    pub fn new(
        joystick: J,
        link: L,
        display: D,
        endpoint: Endpoint,
        config: SessionConfig,
        tuning: InputTuning,
        geometry: DisplayGeometry,
    ) -> Self {
        Self {
            joystick,
            client: NetClient::new(link, config.player_name),
            display,
            state: SessionState::Connecting,
            target: PaddleTarget::new(&tuning, &geometry),
            last_state: None,
            monitor: LinkMonitor::new(config.max_consecutive_faults),
            lobby_ball: BallMotion::new(geometry),
            endpoint,
            config,
            tuning,
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current paddle target
    pub fn paddle_target(&self) -> i16 {
        self.target.value()
    }

    /// Last valid state frame
    pub fn last_state(&self) -> Option<&GameState> {
        self.last_state.as_ref()
    }

    /// Link health
    pub fn link_status(&self) -> LinkStatus {
        self.monitor.status()
    }

    /// Access the link (for diagnostics and tests)
    pub fn link(&self) -> &L {
        self.client.link()
    }

    /// Access the display
    pub fn display(&self) -> &D {
        &self.display
    }

    fn require(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::NotPlaying(self.state))
        }
    }

    /// Enter a terminal failure state and release the link
    async fn abort(&mut self, reason: AbortReason) -> SessionError {
        self.state = self.state.transition(SessionEvent::Fatal(reason));
        // The session is over whether or not the close succeeds
        let _ = self.client.close().await;
        SessionError::from(reason)
    }

    /// Open the connection to the server
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        self.require(SessionState::Connecting)?;
        if self.client.connect(&self.endpoint).await.is_err() {
            return Err(self.abort(AbortReason::ConnectFailed).await);
        }
        self.state = self.state.transition(SessionEvent::Connected);
        Ok(())
    }

    /// Send the join request and wait for the acknowledgement
    ///
    /// The wait is split into lobby ticks; the lobby screen is redrawn on
    /// each tick until the server admits us or the join timeout elapses.
    pub async fn join<O: SessionObserver>(
        &mut self,
        observer: &mut O,
    ) -> Result<JoinStatus, SessionError> {
        self.require(SessionState::AwaitingJoinAck)?;
        if self.client.send_join().await.is_err() {
            return Err(self.abort(AbortReason::JoinFailed).await);
        }

        let tick_ms = self.config.lobby_tick_ms.max(1);
        let mut waited_ms: u32 = 0;
        loop {
            match self.client.poll_join_ack(tick_ms).await {
                Ok(status) => {
                    self.state = self.state.transition(SessionEvent::JoinAcknowledged);
                    return Ok(status);
                }
                Err(FrameFault::Timeout) => {
                    waited_ms = waited_ms.saturating_add(tick_ms);
                    if waited_ms >= self.config.join_timeout_ms {
                        return Err(self.abort(AbortReason::JoinTimeout).await);
                    }
                    self.lobby_ball.advance();
                    let display = self.display.show_lobby(&self.lobby_ball).await;
                    observer.on_lobby_tick(waited_ms, display);
                }
                Err(_) => return Err(self.abort(AbortReason::JoinFailed).await),
            }
        }
    }

    /// Draw the terminal screen, close the link and stop playing
    async fn finish(&mut self, outcome: Outcome) -> Step {
        self.state = self.state.transition(SessionEvent::MatchDecided(outcome));
        let display = self.display.show_outcome(outcome).await;
        // The match is decided whether or not the close succeeds
        let _ = self.client.close().await;
        Step::Finished { outcome, display }
    }

    /// Count a fault; abort once the link counts as lost
    async fn record_fault(&mut self) -> Result<(), SessionError> {
        if self.monitor.record_fault() == LinkStatus::Lost {
            return Err(self.abort(AbortReason::LinkLost).await);
        }
        Ok(())
    }

    /// Run one iteration of the game loop
    ///
    /// Outside of `Playing` this returns `NotPlaying` without touching the
    /// joystick, the link or the display.
    pub async fn step(&mut self) -> Result<Step, SessionError> {
        self.require(SessionState::Playing)?;

        let sample = self.joystick.sample();
        let delta = sample.normalize(&self.tuning);
        let paddle_y = self.target.apply(delta, &self.tuning);

        let mut display = Ok(());
        let frame = match self.client.receive_update(self.config.frame_timeout_ms).await {
            Ok(ServerUpdate::State(state)) => {
                self.monitor.record_frame();
                self.last_state = Some(state);
                display = self.display.show_frame(&state).await;
                if let Some(outcome) =
                    state.outcome(self.config.local_side, self.config.winning_score)
                {
                    return Ok(self.finish(outcome).await);
                }
                Ok(())
            }
            Ok(ServerUpdate::Winner(outcome)) => {
                self.monitor.record_frame();
                return Ok(self.finish(outcome).await);
            }
            Err(fault) => {
                self.record_fault().await?;
                Err(fault)
            }
        };

        let send = self.client.send_paddle(paddle_y).await;
        // At most one fault is counted per iteration
        if send.is_err() && frame.is_ok() {
            self.record_fault().await?;
        }

        Ok(Step::Continue(Iteration {
            paddle_y,
            frame,
            display,
            send,
            link: self.monitor.status(),
        }))
    }

    /// Run the whole session and return the outcome of the match
    pub async fn run<O: SessionObserver>(&mut self, observer: &mut O) -> Result<Outcome, SessionError> {
        self.connect().await?;
        observer.on_connected();

        let status = self.join(observer).await?;
        observer.on_joined(&status);

        loop {
            match self.step().await? {
                Step::Continue(iteration) => observer.on_iteration(&iteration),
                Step::Finished { outcome, display } => {
                    observer.on_finished(outcome, display);
                    return Ok(outcome);
                }
            }
        }
    }
}
