// Output demarcation - Locating the JSON payload in analyzer console output
//
// The external analyzer prints human-readable progress before its actual
// result, all on stdout. The payload is taken to start at the first line
// that (left-trimmed) begins with '[' or '{' and runs to the end of the
// output. A progress line that itself starts with a bracket therefore
// shadows the real payload; that is the collaborator contract as it stands.

/// Return the payload slice of `output`, or `None` when no line looks like
/// the start of a JSON value.
pub fn extract_json_payload(output: &str) -> Option<&str> {
    let mut offset = 0;
    for line in output.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            let indent = line.len() - trimmed.len();
            return Some(&output[offset + indent..]);
        }
        offset += line.len();
    }
    None
}
