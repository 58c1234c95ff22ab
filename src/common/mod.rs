pub mod frontmatter;

pub use frontmatter::{generate_frontmatter, parse_frontmatter, FrontmatterError};
