/// Parse a listening port.
///
/// Port 0 is rejected: the server URL printed to the user and used by
/// `--open` must be known before binding.
///
/// # Errors
///
/// Returns an error message if the value is not a number in 1-65535.
pub fn parse_port(s: &str) -> Result<u16, String> {
    let port: u16 = s
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535: '{}'", s))?;

    if port == 0 {
        return Err("Port must be between 1 and 65535".to_string());
    }

    Ok(port)
}

/// Parse a host name to listen on.
///
/// Accepts a bare host name or IP address; schemes, ports and paths are
/// rejected so `--host http://localhost:3000` gives a clear error instead of
/// a resolver failure.
pub fn parse_host(s: &str) -> Result<String, String> {
    let host = s.trim();

    if host.is_empty() {
        return Err("Host cannot be empty".to_string());
    }

    if host.contains("://") {
        return Err(format!("Host must not include a scheme: '{}'", s));
    }

    if host.contains('/') {
        return Err(format!("Host must not include a path: '{}'", s));
    }

    // a single colon means host:port; IPv6 literals have several
    if host.matches(':').count() == 1 {
        return Err(format!("Host must not include a port, use --port: '{}'", s));
    }

    Ok(host.to_string())
}
