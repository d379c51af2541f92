//! Parsing of `gammu networkinfo` output.
//!
//! Gammu prints one `Key : value` pair per line. Depending on the version the
//! area and cell codes are either appended to the `Network` line
//! (`230 03 (Vodafone, Czech Republic), LAC 0E38, CID 0001CAF3`) or printed on
//! their own `LAC` and `CID` lines. Both layouts are accepted.

use gsmloc_core::RawNetworkInfo;

use crate::error::BackendError;

pub(crate) fn parse_network_info(output: &str) -> Result<RawNetworkInfo, BackendError> {
    let mut network_code = None;
    let mut lac = None;
    let mut cid = None;

    for (key, value) in output.lines().filter_map(|l| l.split_once(':')) {
        let key = key.trim();
        let value = value.trim();
        match key {
            "Network" => {
                let mut tokens = value.split_whitespace();
                if let (Some(mcc), Some(mnc)) = (tokens.next(), tokens.next()) {
                    if !mnc.starts_with('(') {
                        network_code = Some(format!("{mcc} {mnc}"));
                    }
                }
                lac = lac.or_else(|| inline_code(value, "LAC"));
                cid = cid.or_else(|| inline_code(value, "CID"));
            }
            "LAC" => lac = first_token(value).or(lac),
            "CID" => cid = first_token(value).or(cid),
            _ => {}
        }
    }

    let missing = |what: &str| BackendError::Parse(format!("no {what} in networkinfo output"));
    Ok(RawNetworkInfo {
        network_code: network_code.ok_or_else(|| missing("network code"))?,
        lac: lac.ok_or_else(|| missing("LAC"))?,
        cid: cid.ok_or_else(|| missing("CID"))?,
    })
}

fn first_token(value: &str) -> Option<String> {
    value.split_whitespace().next().map(ToOwned::to_owned)
}

/// Finds `<label> <code>` inside a comma separated value.
fn inline_code(value: &str, label: &str) -> Option<String> {
    value.split(',').find_map(|part| {
        let mut tokens = part.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(l), Some(code)) if l == label => Some(code.to_owned()),
            _ => None,
        }
    })
}
