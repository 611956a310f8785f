use std::collections::BTreeSet;

/// Split a comma-separated description into lowercase, trimmed tags.
///
/// Total over its input: `None`, blank text and stray commas all yield an
/// empty set.
pub fn extract_tags(description: Option<&str>) -> BTreeSet<String> {
    let Some(description) = description else {
        return BTreeSet::new();
    };

    description
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}
