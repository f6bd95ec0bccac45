use regex::{NoExpand, Regex};

/// Rewrite the first `root <app_dir>;` directive to `root <app_dir>/public;`.
///
/// Returns `Ok(None)` when the config has no such directive. Only the first
/// occurrence is rewritten.
pub fn rewrite_document_root(config: &str, app_dir: &str) -> Result<Option<String>, regex::Error> {
    let pattern = Regex::new(&format!(r"root\s+{};", regex::escape(app_dir)))?;
    if !pattern.is_match(config) {
        return Ok(None);
    }
    let replacement = format!("root {app_dir}/public;");
    Ok(Some(
        pattern.replace(config, NoExpand(&replacement)).into_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_is_not_expanded() {
        let patched = rewrite_document_root("root /srv/$app;", "/srv/$app")
            .unwrap()
            .unwrap();
        assert_eq!(patched, "root /srv/$app/public;");
    }
}
