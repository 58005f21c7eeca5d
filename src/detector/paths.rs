use std::collections::BTreeSet;

/// Schema directory of a changed path, if it lies under `root_dir`.
///
/// `SQL/sales/tables/orders.sql` with root `SQL` yields `sales`. A file
/// directly under the root is not a schema.
pub fn schema_name<'a>(path: &'a str, root_dir: &str) -> Option<&'a str> {
    let root = root_dir.trim_end_matches('/');
    let rest = path.trim().strip_prefix(root)?.strip_prefix('/')?;

    let mut segments = rest.split('/');
    let schema = segments.next().filter(|s| !s.is_empty())?;
    segments.next().filter(|s| !s.is_empty())?;

    Some(schema)
}

/// Distinct schema names touched by `paths`
pub fn extract_schema_names<I, S>(paths: I, root_dir: &str) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .filter_map(|path| schema_name(path.as_ref(), root_dir).map(str::to_string))
        .collect()
}
