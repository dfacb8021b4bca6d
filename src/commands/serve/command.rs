//! Slash-command text parsing.

use indoc::indoc;

pub const FIND_USAGE: &str = "usage: /issue find NUMBER";
pub const CLOSE_USAGE: &str = "usage: /issue close NUMBER";
pub const REOPEN_USAGE: &str = "usage: /issue reopen NUMBER";
pub const ASSIGN_USAGE: &str = "usage: /issue assign NUMBER [@CHATNAME|@me|GITHUBNAME]";
pub const UNASSIGN_USAGE: &str = "usage: /issue unassign NUMBER";
pub const REGISTER_USAGE: &str = "usage: /issue register GITHUBNAME";
pub const GET_ALIAS_USAGE: &str = "usage: /issue get-alias";
pub const UNREGISTER_USAGE: &str = "usage: /issue unregister";

pub const HELP: &str = indoc! {"
    usage: /issue COMMAND [ARGS]
    Commands:
    \thelp                                   show this message
    \tfind NUMBER                            show an issue
    \tclose NUMBER                           close an issue
    \treopen NUMBER                          reopen a closed issue
    \tassign NUMBER [@CHATNAME|@me|GITHUBNAME]  assign an issue
    \tunassign NUMBER                        remove the assignee of an issue
    \tregister GITHUBNAME                    link your chat name to a github user
    \tget-alias                              show the github user you are linked to
    \tunregister                             remove your github user link"
};

/// Who an `assign` should go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTarget {
    /// `@me`: the requester's own alias.
    Me,
    /// `@handle`: another chat user's alias.
    Chat(String),
    /// A literal GitHub username.
    GitHub(String),
}

impl AssignTarget {
    fn parse(arg: &str) -> Self {
        match arg.strip_prefix('@') {
            Some("me") => Self::Me,
            Some(handle) => Self::Chat(handle.to_string()),
            None => Self::GitHub(arg.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    Find(u64),
    Close(u64),
    Reopen(u64),
    Assign { number: u64, target: AssignTarget },
    Unassign(u64),
    Register(String),
    GetAlias,
    Unregister,
}

/// Parse the `text` field of a slash-command delivery.
///
/// Unknown or empty text is `Help`. A known command with bad arguments
/// yields that command's usage string as the error.
pub fn parse(text: &str) -> Result<BotCommand, &'static str> {
    let mut words = text.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(BotCommand::Help);
    };
    let args: Vec<&str> = words.collect();

    match name {
        "find" => number_arg(&args, FIND_USAGE).map(BotCommand::Find),
        "close" => number_arg(&args, CLOSE_USAGE).map(BotCommand::Close),
        "reopen" => number_arg(&args, REOPEN_USAGE).map(BotCommand::Reopen),
        "unassign" => number_arg(&args, UNASSIGN_USAGE).map(BotCommand::Unassign),
        "assign" => match args.as_slice() {
            [number, target] => Ok(BotCommand::Assign {
                number: parse_number(number, ASSIGN_USAGE)?,
                target: AssignTarget::parse(target),
            }),
            _ => Err(ASSIGN_USAGE),
        },
        "register" => match args.as_slice() {
            [user] => Ok(BotCommand::Register((*user).to_string())),
            _ => Err(REGISTER_USAGE),
        },
        "get-alias" if args.is_empty() => Ok(BotCommand::GetAlias),
        "get-alias" => Err(GET_ALIAS_USAGE),
        "unregister" if args.is_empty() => Ok(BotCommand::Unregister),
        "unregister" => Err(UNREGISTER_USAGE),
        _ => Ok(BotCommand::Help),
    }
}

fn number_arg(args: &[&str], usage: &'static str) -> Result<u64, &'static str> {
    match args {
        [number] => parse_number(number, usage),
        _ => Err(usage),
    }
}

fn parse_number(arg: &str, usage: &'static str) -> Result<u64, &'static str> {
    arg.parse().map_err(|_| usage)
}
