//! JSON rendering: a pretty-printed array of posts, augmentation included.

use crate::error::Result;
use crate::model::Post;

pub fn render_json(posts: &[Post]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(posts)?;
    out.push('\n');
    Ok(out)
}
