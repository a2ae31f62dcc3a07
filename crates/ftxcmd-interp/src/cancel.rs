//! `cancel [limit | conditional [ID] | ID]`.

use ftxcmd_core::{CancelRequest, CancelScope};

use crate::error::{CommandError, CommandResult};
use crate::session::Session;

const USAGE: &str = "use: cancel [limit | conditional [ID] | ID]";

fn is_order_id(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Build a cancel request for the selected market.
pub fn build_cancel(tokens: &[&str], session: &Session) -> CommandResult<CancelRequest> {
    let market = session.require_market()?.clone();

    let scope = match tokens.get(1..).unwrap_or_default() {
        [] => CancelScope::All,
        ["limit"] => CancelScope::LimitOnly,
        ["conditional"] => CancelScope::ConditionalOnly(None),
        ["conditional", id] if !id.is_empty() => CancelScope::ConditionalOnly(Some(id.to_string())),
        [id] if is_order_id(id) => CancelScope::ById(id.to_string()),
        _ => {
            return Err(CommandError::malformed(format!(
                "cannot cancel '{}', {USAGE}",
                tokens[1..].join(" ")
            )))
        }
    };

    Ok(CancelRequest { market, scope })
}
