/// Quotes `input` for a POSIX shell so it is read back as exactly one word.
pub fn shell_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('\'');
    for ch in input.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');
    escaped
}

/// A copy-pasteable curl line reproducing a backend request.
pub fn curl_command(url: &str, timeout_ms: u64) -> String {
    let seconds = timeout_ms.div_ceil(1000).max(1);
    format!("curl -sS --max-time {seconds} -- {}", shell_escape(url))
}
