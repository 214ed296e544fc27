//! Origin-seeking navigation
//!
//! The server never learns the field layout; everything it knows comes from
//! the coordinates echoed in `OK <x> <y>` replies. Navigation therefore
//! starts by priming: two moves (plus a corrective turn when the first move
//! is swallowed by an obstacle) whose position samples fix the heading.
//! After that the navigator walks the x axis to zero, then the y axis,
//! sidestepping obstacles with a fixed five-turn maneuver.
//!
//! Every motion command spends from a per-session budget so a rover that
//! keeps reporting impossible positions cannot hold a worker forever.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, instrument};

use crate::core::frame::{parse_ok_body, MessageKind, ServerCommand};
use crate::error::{ProtocolError, Result};
use crate::service::Connection;

/// Cardinal heading on the grid. North increases y, East increases x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Heading after one clockwise turn.
    pub fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Heading after one counter-clockwise turn.
    pub fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Infer the heading from two consecutive position samples.
    ///
    /// Identical samples fall back to North; callers avoid that case by
    /// re-sampling after a turn.
    pub fn from_samples(prev: (i64, i64), curr: (i64, i64)) -> Self {
        if curr.0 < prev.0 {
            Self::West
        } else if curr.0 > prev.0 {
            Self::East
        } else if curr.1 < prev.1 {
            Self::South
        } else {
            Self::North
        }
    }
}

/// Rover pose as reported over the wire: grid coordinates plus heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotPosition {
    pub x: i64,
    pub y: i64,
    pub heading: Heading,
}

impl RobotPosition {
    pub fn from_samples(prev: (i64, i64), curr: (i64, i64)) -> Self {
        Self {
            x: curr.0,
            y: curr.1,
            heading: Heading::from_samples(prev, curr),
        }
    }

    pub fn coords(self) -> (i64, i64) {
        (self.x, self.y)
    }

    pub fn is_origin(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Motion command budget for one session.
#[derive(Debug, Clone, Copy)]
pub struct CommandBudget {
    remaining: u32,
}

impl CommandBudget {
    pub fn new(limit: u32) -> Self {
        Self { remaining: limit }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    fn spend(&mut self) -> Result<()> {
        match self.remaining.checked_sub(1) {
            Some(left) => {
                self.remaining = left;
                Ok(())
            }
            None => Err(ProtocolError::CommandLimitExceeded),
        }
    }
}

/// Steers one authenticated rover to the origin.
///
/// A navigator only exists once the pose is known, so every method can rely
/// on valid coordinates and heading.
pub struct Navigator<'a, S> {
    conn: &'a mut Connection<S>,
    position: RobotPosition,
    budget: CommandBudget,
}

async fn motion<S>(
    conn: &mut Connection<S>,
    budget: &mut CommandBudget,
    cmd: ServerCommand,
) -> Result<(i64, i64)>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    budget.spend()?;
    conn.send(cmd).await?;
    let body = conn.recv(MessageKind::Ok).await?;
    parse_ok_body(&body).ok_or(ProtocolError::Syntax)
}

impl<'a, S> Navigator<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Establish the rover's pose with the opening moves.
    ///
    /// Two moves normally suffice. When both samples coincide the first
    /// move ran into an obstacle, so one corrective left turn and a third
    /// move produce a usable pair.
    #[instrument(skip(conn, budget), level = "debug")]
    pub async fn prime(
        conn: &'a mut Connection<S>,
        mut budget: CommandBudget,
    ) -> Result<Navigator<'a, S>> {
        let mut prev = motion(conn, &mut budget, ServerCommand::Move).await?;
        let mut curr = motion(conn, &mut budget, ServerCommand::Move).await?;
        if curr == prev {
            motion(conn, &mut budget, ServerCommand::TurnLeft).await?;
            prev = curr;
            curr = motion(conn, &mut budget, ServerCommand::Move).await?;
        }

        let position = RobotPosition::from_samples(prev, curr);
        debug!(x = position.x, y = position.y, heading = ?position.heading, "pose established");
        Ok(Self {
            conn,
            position,
            budget,
        })
    }

    pub fn position(&self) -> RobotPosition {
        self.position
    }

    /// Advance one cell; the reply fixes the new coordinates.
    pub async fn move_forward(&mut self) -> Result<(i64, i64)> {
        let (x, y) = self.command(ServerCommand::Move).await?;
        self.position.x = x;
        self.position.y = y;
        Ok((x, y))
    }

    pub async fn turn_left(&mut self) -> Result<(i64, i64)> {
        let (x, y) = self.command(ServerCommand::TurnLeft).await?;
        self.position.x = x;
        self.position.y = y;
        self.position.heading = self.position.heading.left();
        Ok((x, y))
    }

    pub async fn turn_right(&mut self) -> Result<(i64, i64)> {
        let (x, y) = self.command(ServerCommand::TurnRight).await?;
        self.position.x = x;
        self.position.y = y;
        self.position.heading = self.position.heading.right();
        Ok((x, y))
    }

    async fn command(&mut self, cmd: ServerCommand) -> Result<(i64, i64)> {
        motion(self.conn, &mut self.budget, cmd).await
    }

    async fn face(&mut self, target: Heading) -> Result<()> {
        while self.position.heading != target {
            self.turn_right().await?;
        }
        Ok(())
    }

    /// Sidestep the obstacle directly ahead: one cell out to the left, two
    /// cells forward, one cell back in. Heading ends where it started.
    ///
    /// Returns `true` when one of the intermediate cells was the origin.
    pub async fn bypass_obstacle(&mut self) -> Result<bool> {
        self.turn_left().await?;
        self.move_forward().await?;
        if self.position.is_origin() {
            return Ok(true);
        }
        self.turn_right().await?;
        self.move_forward().await?;
        if self.position.is_origin() {
            return Ok(true);
        }
        self.move_forward().await?;
        if self.position.is_origin() {
            return Ok(true);
        }
        self.turn_right().await?;
        self.move_forward().await?;
        if self.position.is_origin() {
            return Ok(true);
        }
        self.turn_left().await?;
        Ok(false)
    }

    /// Walk the rover to (0, 0), x axis first, sidestepping obstacles.
    ///
    /// The loop re-reads the reported position every iteration, so a
    /// bypass that lands on the far side of an axis flips the walk
    /// direction instead of marching away from the origin.
    #[instrument(skip(self), level = "debug")]
    pub async fn seek_origin(&mut self) -> Result<()> {
        while !self.position.is_origin() {
            let (x, y) = self.position.coords();

            if x != 0 {
                let target = if x < 0 { Heading::East } else { Heading::West };
                self.face(target).await?;
                self.advance_while(|p| p.x != 0).await?;
            } else if y != 0 && self.bypass_obstacle().await? {
                return Ok(());
            }

            let (x, y) = self.position.coords();
            if y != 0 {
                let target = if y > 0 { Heading::South } else { Heading::North };
                self.face(target).await?;
                self.advance_while(|p| p.y != 0).await?;
            } else if x != 0 && self.bypass_obstacle().await? {
                return Ok(());
            }
        }
        Ok(())
    }

    /// March forward while the predicate holds, stopping early when a move
    /// is swallowed by an obstacle (position unchanged) or the origin is
    /// reached.
    async fn advance_while<F>(&mut self, off_axis: F) -> Result<()>
    where
        F: Fn(RobotPosition) -> bool,
    {
        while off_axis(self.position) {
            let before = self.position.coords();
            let after = self.move_forward().await?;
            if after == before || after == (0, 0) {
                break;
            }
        }
        Ok(())
    }
}
