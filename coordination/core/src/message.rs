// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use coordination_config::NodeId;

use crate::error::{CoordinationError, CoordinationResult};

/// Round number of one proposal attempt. Rounds are partitioned across the
/// committee by residue, so a round uniquely identifies its proposer.
pub type Round = u64;

/// Destination id denoting broadcast to all acceptors.
pub const BROADCAST: NodeId = 0;

/// Wire commands exchanged with acceptors. The coordinator emits INVITE and
/// NOMINATE and consumes RSVP; the remaining phases of the protocol belong to
/// the acceptor and learner roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Command {
    Invite,
    Rsvp,
    Nominate,
}

impl Command {
    fn from_wire(token: &str) -> CoordinationResult<Self> {
        match token {
            "INVITE" => Ok(Command::Invite),
            "RSVP" => Ok(Command::Rsvp),
            "NOMINATE" => Ok(Command::Nominate),
            _ => Err(CoordinationError::UnknownCommand(token.to_string())),
        }
    }
}

/// A logical protocol message. Framing and delivery belong to the transport;
/// only the colon-delimited text form `<from>:<to>:<cmd>:<body...>` is fixed
/// here, with `*` denoting the broadcast destination. Body subfields are also
/// colon-delimited, so the body is the remainder of the line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub from: NodeId,
    pub to: NodeId,
    pub cmd: Command,
    pub body: String,
}

impl Message {
    /// Phase-1a message opening `round`, addressed to all acceptors.
    pub fn invite(from: NodeId, round: Round) -> Self {
        Self {
            from,
            to: BROADCAST,
            cmd: Command::Invite,
            body: format!("{round}"),
        }
    }

    /// Phase-2a message proposing `value` for `round`, addressed to all
    /// acceptors. The value is inserted verbatim after the round; values
    /// containing the delimiter are rejected at the interface boundary.
    pub fn nominate(from: NodeId, round: Round, value: &str) -> Self {
        Self {
            from,
            to: BROADCAST,
            cmd: Command::Nominate,
            body: format!("{round}:{value}"),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.from)?;
        match self.to {
            BROADCAST => write!(f, "*")?,
            to => write!(f, "{to}")?,
        }
        write!(f, ":{}:{}", self.cmd, self.body)
    }
}

fn parse_id(field: &str, wire: &str) -> CoordinationResult<NodeId> {
    if field == "*" {
        return Ok(BROADCAST);
    }
    field
        .parse()
        .map_err(|_| CoordinationError::MalformedMessage(wire.to_string()))
}

impl FromStr for Message {
    type Err = CoordinationError;

    fn from_str(wire: &str) -> CoordinationResult<Self> {
        let mut parts = wire.splitn(4, ':');
        let (Some(from), Some(to), Some(cmd), Some(body)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CoordinationError::MalformedMessage(wire.to_string()));
        };
        Ok(Self {
            from: parse_id(from, wire)?,
            to: parse_id(to, wire)?,
            cmd: Command::from_wire(cmd)?,
            body: body.to_string(),
        })
    }
}

/// Parsed body of an RSVP: the round the acceptor is answering, the highest
/// round it has previously voted in (0 for none) and the value of that vote
/// (empty when it has never voted).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsvpBody {
    pub round: Round,
    pub vrnd: Round,
    pub vval: String,
}

impl RsvpBody {
    /// An RSVP body has exactly three colon-separated fields. Any other shape
    /// is corruption in the transport layer and is fatal to the coordinator.
    pub fn parse(body: &str) -> CoordinationResult<Self> {
        let malformed = || CoordinationError::MalformedBody {
            cmd: Command::Rsvp,
            body: body.to_string(),
        };
        let fields: Vec<&str> = body.split(':').collect();
        let [round, vrnd, vval] = fields.as_slice() else {
            return Err(malformed());
        };
        Ok(Self {
            round: round.parse().map_err(|_| malformed())?,
            vrnd: vrnd.parse().map_err(|_| malformed())?,
            vval: vval.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_outbound_messages() {
        assert_eq!(Message::invite(1, 1).to_string(), "1:*:INVITE:1");
        assert_eq!(Message::invite(3, 13).to_string(), "3:*:INVITE:13");
        assert_eq!(Message::nominate(1, 11, "foo").to_string(), "1:*:NOMINATE:11:foo");
        // Nominating an empty value keeps the delimiter.
        assert_eq!(Message::nominate(2, 2, "").to_string(), "2:*:NOMINATE:2:");
    }

    #[test]
    fn parse_round_trips() {
        for wire in ["1:*:INVITE:1", "2:1:RSVP:1:0:", "7:1:RSVP:11:3:bar", "1:*:NOMINATE:1:foo"] {
            let message: Message = wire.parse().unwrap();
            assert_eq!(message.to_string(), wire);
        }

        let message: Message = "6:1:RSVP:1:1:bar".parse().unwrap();
        assert_eq!(message.from, 6);
        assert_eq!(message.to, 1);
        assert_eq!(message.cmd, Command::Rsvp);
        assert_eq!(message.body, "1:1:bar");
    }

    #[test]
    fn parse_rejects_malformed_envelopes() {
        assert_eq!(
            "1:2:INVITE".parse::<Message>(),
            Err(CoordinationError::MalformedMessage("1:2:INVITE".to_string()))
        );
        assert_eq!(
            "x:2:INVITE:1".parse::<Message>(),
            Err(CoordinationError::MalformedMessage("x:2:INVITE:1".to_string()))
        );
        assert_eq!(
            "1:2:ACCEPT:1".parse::<Message>(),
            Err(CoordinationError::UnknownCommand("ACCEPT".to_string()))
        );
    }

    #[test]
    fn parse_rsvp_bodies() {
        assert_eq!(
            RsvpBody::parse("1:0:").unwrap(),
            RsvpBody {
                round: 1,
                vrnd: 0,
                vval: String::new(),
            }
        );
        assert_eq!(
            RsvpBody::parse("11:3:bar").unwrap(),
            RsvpBody {
                round: 11,
                vrnd: 3,
                vval: "bar".to_string(),
            }
        );
    }

    #[test]
    fn rsvp_body_field_count_is_exact() {
        for body in ["1:0", "1", "", "1:0:x:y"] {
            assert_eq!(
                RsvpBody::parse(body),
                Err(CoordinationError::MalformedBody {
                    cmd: Command::Rsvp,
                    body: body.to_string(),
                })
            );
        }
        assert!(matches!(
            RsvpBody::parse("a:0:"),
            Err(CoordinationError::MalformedBody { .. })
        ));
    }
}
