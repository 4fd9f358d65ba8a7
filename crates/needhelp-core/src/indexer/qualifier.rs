//! Dotted package qualifiers and their prefix chains.

/// Expand a dotted package name into its prefix chain, shortest first.
///
/// `com.example.app` yields `com`, `com.example`, `com.example.app`. The full
/// name is always the last element, so an empty name yields `[""]`. Scanning
/// stops at a separator in position 0, which leaves `.foo.bar` unexpanded.
pub fn split_package_name(package_name: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut end = package_name.find('.');
    while let Some(idx) = end.filter(|&i| i > 0) {
        result.push(package_name[..idx].to_string());
        end = package_name[idx + 1..].find('.').map(|off| idx + 1 + off);
    }
    result.push(package_name.to_string());
    result
}

/// Pull the qualifier out of a declaration line such as `import a.b.C;`.
///
/// The span runs from the end of the first `keyword` occurrence up to the next
/// `;`. Lines without the keyword, without a terminating `;`, or with an empty
/// span yield `None`.
pub fn declared_qualifier<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let start = line.find(keyword)? + keyword.len();
    let end = start + line[start..].find(';')?;
    if start < end {
        Some(line[start..end].trim())
    } else {
        None
    }
}

/// Prefix chain of the qualifier declared on `line`, or nothing if malformed.
pub fn declared_packages(line: &str, keyword: &str) -> Vec<String> {
    declared_qualifier(line, keyword)
        .map(split_package_name)
        .unwrap_or_default()
}
