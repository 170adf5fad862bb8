/// Split a comma separated list, dropping blanks
pub fn parse_id_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
        .collect()
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Accept only http(s) base URLs
pub fn validate_url(url: &str) -> Result<String, String> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(format!(
            "OpenGPTs URL must start with http:// or https:// (got `{}`)",
            url
        ))
    }
}
