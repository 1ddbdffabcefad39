//! `dns` and `curl`: name resolution and HTTP fetches.

use armory_board::Board;

use crate::dispatch::errors::DispatchError;

const HTTP_OK: u16 = 200;

pub(crate) fn resolve(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let [name] = tokens else {
        return Err(DispatchError::UnknownCommand);
    };
    let resolution = board.network.resolve(name).map_err(DispatchError::Query)?;
    Ok(resolution.to_string())
}

/// Fetches `url`. Only a 200 response shows its body; any other status is
/// reported as a single line.
pub(crate) fn fetch(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let [url] = tokens else {
        return Err(DispatchError::UnknownCommand);
    };
    let response = board.network.get(url).map_err(DispatchError::Fetch)?;
    if response.status != HTTP_OK {
        return Ok(format!("GET {url}: {}", response.status_line()));
    }
    Ok(String::from_utf8_lossy(&response.body).into_owned())
}
