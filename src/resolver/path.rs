//! Canonical template paths.

/// Build the logical path for a template.
///
/// A non-empty `prefix` becomes the leading directory; partials get a
/// leading underscore on their base name. Segments are used verbatim.
///
/// ```
/// use stencil::resolver::build_path;
///
/// assert_eq!(build_path("show", "posts", false), "posts/show");
/// assert_eq!(build_path("form", "posts", true), "posts/_form");
/// ```
pub fn build_path(name: &str, prefix: &str, partial: bool) -> String {
    let mut path = String::with_capacity(prefix.len() + name.len() + 2);
    if !prefix.is_empty() {
        path.push_str(prefix);
        path.push('/');
    }
    if partial {
        path.push('_');
    }
    path.push_str(name);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_changes_the_filename_not_the_prefix() {
        assert_eq!(build_path("show", "posts", true), "posts/_show");
        assert_eq!(build_path("show", "posts", false), "posts/show");
        assert_eq!(build_path("show", "", true), "_show");
    }

    #[test]
    fn empty_prefix_has_no_separator() {
        assert_eq!(build_path("index", "", false), "index");
    }

    #[test]
    fn nested_prefix_is_kept_verbatim() {
        assert_eq!(build_path("item", "admin/posts", true), "admin/posts/_item");
    }
}
