use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("Invalid frontmatter format: {0}")]
    InvalidFormat(String),
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Parse markdown content with YAML frontmatter.
///
/// Returns the deserialized frontmatter, the title taken from the H1 heading
/// after the frontmatter, and the body (everything after the title).
///
/// # Format
/// ```markdown
/// ---
/// key: value
/// ---
/// # Title
///
/// Body content...
/// ```
pub fn parse_frontmatter<T: DeserializeOwned>(
    content: &str,
) -> Result<(T, String, String), FrontmatterError> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.first() != Some(&"---") {
        return Err(FrontmatterError::InvalidFormat(
            "Content must start with '---'".to_string(),
        ));
    }

    let end_idx = lines
        .iter()
        .skip(1)
        .position(|&line| line == "---")
        .ok_or_else(|| {
            FrontmatterError::InvalidFormat("Missing closing '---' for frontmatter".to_string())
        })?;

    let frontmatter_yaml = lines.get(1..=end_idx).unwrap_or(&[]).join("\n");
    let metadata: T = serde_yaml::from_str(&frontmatter_yaml)?;

    // Skip the closing ---
    let body_start = end_idx.saturating_add(2);
    let body_lines: Vec<&str> = lines
        .get(body_start..)
        .unwrap_or(&[])
        .iter()
        .skip_while(|line| line.is_empty())
        .copied()
        .collect();

    let title = body_lines
        .first()
        .and_then(|line| line.strip_prefix("# "))
        .map(str::to_string);

    let (title, body) = match title {
        Some(title) => {
            let body = join_trimmed(body_lines.get(1..).unwrap_or(&[]));
            (title, body)
        }
        None => (String::new(), join_trimmed(&body_lines)),
    };

    Ok((metadata, title, body))
}

fn join_trimmed(lines: &[&str]) -> String {
    lines
        .iter()
        .skip_while(|line| line.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Generate markdown content with YAML frontmatter.
pub fn generate_frontmatter<T: Serialize>(
    metadata: &T,
    title: &str,
    body: &str,
) -> Result<String, FrontmatterError> {
    let yaml = serde_yaml::to_string(metadata)?;
    // serde_yaml adds a trailing newline
    let yaml = yaml.trim_end();

    if body.is_empty() {
        Ok(format!("---\n{yaml}\n---\n\n# {title}\n"))
    } else {
        Ok(format!("---\n{yaml}\n---\n\n# {title}\n\n{body}\n"))
    }
}
