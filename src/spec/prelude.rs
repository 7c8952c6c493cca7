// Leading-noise removal for pasted spec content
//
// People paste terminal sessions like
//   anon@host:/tmp$ cat openapi.yaml
//   openapi: 3.0.0
// so everything above the first line that opens a document is dropped.

const DOCUMENT_STARTS: &[&str] = &["openapi:", "swagger:", "{"];

/// Return `content` starting at the first line whose trimmed text begins with
/// `openapi:`, `swagger:` or `{`. Content without such a line is returned unchanged.
pub fn strip_leading_noise(content: &str) -> &str {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if DOCUMENT_STARTS.iter().any(|start| trimmed.starts_with(start)) {
            return &content[offset..];
        }
        offset += line.len();
    }
    content
}
