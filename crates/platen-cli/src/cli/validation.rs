/// Parse and validate a TCP port for the preview server.
///
/// Port 0 is rejected because the server must be reachable at a port the
/// user can type into a browser.
///
/// # Errors
///
/// Returns an error message if the value is not a number in 1..=65535.
pub fn parse_port(s: &str) -> Result<u16, String> {
    let port: u16 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid port number (1-65535)", s))?;

    if port == 0 {
        return Err("Port 0 is not allowed; choose a port between 1 and 65535".to_string());
    }

    Ok(port)
}

/// Parse a poll interval in milliseconds (must be positive).
pub fn parse_interval_ms(s: &str) -> Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(0) => Err("Poll interval must be greater than 0".to_string()),
        Ok(ms) => Ok(ms),
        Err(_) => Err(format!("'{}' is not a valid interval in milliseconds", s)),
    }
}
