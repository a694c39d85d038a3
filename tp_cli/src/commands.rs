use std::fmt;
use tin_patti::{Chips, PlayerId};

/// A table action requested from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the table.
    Status,
    /// Seat a new player.
    Join { nickname: String, admin: bool },
    /// Remove a player.
    Leave { player: PlayerId },
    /// Give every player the initial balance.
    Seed { caller: PlayerId },
    /// Give chips to every player, or to one.
    Grant {
        caller: PlayerId,
        amount: Chips,
        to: Option<PlayerId>,
    },
    Bet { player: PlayerId, amount: Chips },
    /// Clear every bet for a new round.
    Clear { caller: PlayerId },
    /// Pay the pot to a winner.
    Payout { caller: PlayerId, winner: PlayerId },
    /// Close the table.
    Exit { caller: Option<PlayerId> },
    /// Show the local identity.
    WhoAmI,
    /// Create the local identity.
    Identity { nickname: String },
    /// Seat the local identity.
    Sit { admin: bool },
    /// Give the unseated local identity the initial balance again.
    ResetBalance,
    /// Forget the local identity.
    Forget,
}

/// Options given as flags rather than positional words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// `--as ID`: the player performing the action.
    pub caller: Option<String>,
    /// `--to ID`: the player receiving a grant.
    pub to: Option<String>,
    /// `--admin`: seat as admin.
    pub admin: bool,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No command word given.
    MissingCommand,
    /// A required positional argument is missing.
    MissingArgument { command: &'static str, argument: &'static str },
    /// A privileged command without `--as`.
    MissingCaller(&'static str),
    /// Not a player id.
    InvalidPlayerId(String),
    /// Not a chip amount.
    InvalidAmount(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCommand => write!(f, "No command given. Try '--help'"),
            Self::MissingArgument { command, argument } => {
                write!(f, "'{command}' requires {argument}")
            }
            Self::MissingCaller(command) => {
                write!(f, "'{command}' is admin-only; pass '--as ADMIN_ID'")
            }
            Self::InvalidPlayerId(value) => write!(f, "Invalid player id '{value}'"),
            Self::InvalidAmount(value) => write!(
                f,
                "Invalid amount '{value}'. Must be a whole number of chips (e.g., 'bet ID 20')"
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Try '--help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse positional words and flags into a [`Command`].
///
/// # Examples
///
/// ```
/// use tp_cli::commands::{Command, Flags, parse_command};
///
/// let words = vec!["join".to_string(), "Alice".to_string()];
/// let flags = Flags { admin: true, ..Flags::default() };
/// assert_eq!(
///     parse_command(&words, &flags),
///     Ok(Command::Join { nickname: "Alice".to_string(), admin: true })
/// );
/// ```
pub fn parse_command(words: &[String], flags: &Flags) -> Result<Command, ParseError> {
    let (first, rest) = words.split_first().ok_or(ParseError::MissingCommand)?;

    match first.as_str() {
        "status" => Ok(Command::Status),
        "join" => Ok(Command::Join {
            nickname: rest.join(" "),
            admin: flags.admin,
        })
        .and_then(|cmd| match &cmd {
            Command::Join { nickname, .. } if nickname.trim().is_empty() => {
                Err(ParseError::MissingArgument {
                    command: "join",
                    argument: "a nickname",
                })
            }
            _ => Ok(cmd),
        }),
        "leave" => Ok(Command::Leave {
            player: player_arg(rest.first(), "leave")?,
        }),
        "seed" => Ok(Command::Seed {
            caller: caller(flags, "seed")?,
        }),
        "grant" => Ok(Command::Grant {
            caller: caller(flags, "grant")?,
            amount: amount_arg(rest.first(), "grant")?,
            to: flags.to.as_deref().map(parse_player).transpose()?,
        }),
        "bet" => Ok(Command::Bet {
            player: player_arg(rest.first(), "bet")?,
            amount: amount_arg(rest.get(1), "bet")?,
        }),
        "clear" => Ok(Command::Clear {
            caller: caller(flags, "clear")?,
        }),
        "payout" => Ok(Command::Payout {
            caller: caller(flags, "payout")?,
            winner: player_arg(rest.first(), "payout")?,
        }),
        "exit" => Ok(Command::Exit {
            caller: flags.caller.as_deref().map(parse_player).transpose()?,
        }),
        "whoami" => Ok(Command::WhoAmI),
        "identity" => match rest.join(" ") {
            nickname if nickname.trim().is_empty() => Err(ParseError::MissingArgument {
                command: "identity",
                argument: "a nickname",
            }),
            nickname => Ok(Command::Identity { nickname }),
        },
        "sit" => Ok(Command::Sit { admin: flags.admin }),
        "reset-balance" => Ok(Command::ResetBalance),
        "forget" => Ok(Command::Forget),
        other => Err(ParseError::UnrecognizedCommand(other.to_string())),
    }
}

fn parse_player(value: &str) -> Result<PlayerId, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::InvalidPlayerId(value.to_string()))
}

fn player_arg(value: Option<&String>, command: &'static str) -> Result<PlayerId, ParseError> {
    let value = value.ok_or(ParseError::MissingArgument {
        command,
        argument: "a player id",
    })?;
    parse_player(value)
}

fn amount_arg(value: Option<&String>, command: &'static str) -> Result<Chips, ParseError> {
    let value = value.ok_or(ParseError::MissingArgument {
        command,
        argument: "an amount",
    })?;
    value
        .parse()
        .map_err(|_| ParseError::InvalidAmount(value.to_string()))
}

fn caller(flags: &Flags, command: &'static str) -> Result<PlayerId, ParseError> {
    let value = flags
        .caller
        .as_deref()
        .ok_or(ParseError::MissingCaller(command))?;
    parse_player(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        input.split_whitespace().map(str::to_string).collect()
    }

    fn as_admin(id: PlayerId) -> Flags {
        Flags {
            caller: Some(id.to_string()),
            ..Flags::default()
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(
            parse_command(&words("status"), &Flags::default()),
            Ok(Command::Status)
        );
    }

    #[test]
    fn test_parse_missing_command() {
        assert_eq!(
            parse_command(&[], &Flags::default()),
            Err(ParseError::MissingCommand)
        );
    }

    #[test]
    fn test_parse_join_keeps_spaces() {
        assert_eq!(
            parse_command(&words("join Big Al"), &Flags::default()),
            Ok(Command::Join {
                nickname: "Big Al".to_string(),
                admin: false
            })
        );
    }

    #[test]
    fn test_parse_join_without_name() {
        assert!(matches!(
            parse_command(&words("join"), &Flags::default()),
            Err(ParseError::MissingArgument { command: "join", .. })
        ));
    }

    #[test]
    fn test_parse_bet() {
        let id = PlayerId::generate();
        assert_eq!(
            parse_command(&words(&format!("bet {id} 20")), &Flags::default()),
            Ok(Command::Bet {
                player: id,
                amount: 20
            })
        );
    }

    #[test]
    fn test_parse_bet_negative_amount() {
        let id = PlayerId::generate();
        assert_eq!(
            parse_command(&words(&format!("bet {id} -5")), &Flags::default()),
            Err(ParseError::InvalidAmount("-5".to_string()))
        );
    }

    #[test]
    fn test_parse_grant_to_one_player() {
        let admin = PlayerId::generate();
        let bob = PlayerId::generate();
        let flags = Flags {
            to: Some(bob.to_string()),
            ..as_admin(admin)
        };
        assert_eq!(
            parse_command(&words("grant 75"), &flags),
            Ok(Command::Grant {
                caller: admin,
                amount: 75,
                to: Some(bob)
            })
        );
    }

    #[test]
    fn test_parse_privileged_without_caller() {
        assert_eq!(
            parse_command(&words("seed"), &Flags::default()),
            Err(ParseError::MissingCaller("seed"))
        );
        assert_eq!(
            parse_command(&words("clear"), &Flags::default()),
            Err(ParseError::MissingCaller("clear"))
        );
    }

    #[test]
    fn test_parse_payout() {
        let admin = PlayerId::generate();
        let winner = PlayerId::generate();
        assert_eq!(
            parse_command(&words(&format!("payout {winner}")), &as_admin(admin)),
            Ok(Command::Payout {
                caller: admin,
                winner
            })
        );
    }

    #[test]
    fn test_parse_exit_caller_is_optional() {
        assert_eq!(
            parse_command(&words("exit"), &Flags::default()),
            Ok(Command::Exit { caller: None })
        );
    }

    #[test]
    fn test_parse_identity_commands() {
        assert_eq!(
            parse_command(&words("identity Big Dana"), &Flags::default()),
            Ok(Command::Identity {
                nickname: "Big Dana".to_string()
            })
        );
        assert_eq!(
            parse_command(&words("reset-balance"), &Flags::default()),
            Ok(Command::ResetBalance)
        );
    }

    #[test]
    fn test_parse_invalid_player_id() {
        assert_eq!(
            parse_command(&words("leave bob"), &Flags::default()),
            Err(ParseError::InvalidPlayerId("bob".to_string()))
        );
    }

    #[test]
    fn test_parse_unrecognized() {
        let err = parse_command(&words("deal"), &Flags::default()).unwrap_err();
        assert!(err.to_string().contains("deal"));
    }
}
