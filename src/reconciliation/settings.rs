/// Run-time switches for the reconciler, built once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilerSettings {
    /// Update applications that already exist instead of skipping them
    pub overwrite: bool,
    /// Name of the environment to deploy to; the first one when unset
    pub environment: Option<String>,
    /// Display name of the application to deploy; the first one when unset
    pub application: Option<String>,
}

/// `yes` in any case enables overwriting, anything else disables it
pub fn parse_overwrite_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overwrite_flag() {
        assert!(parse_overwrite_flag("yes"));
        assert!(parse_overwrite_flag("YES"));
        assert!(parse_overwrite_flag(" Yes "));
        assert!(!parse_overwrite_flag("no"));
        assert!(!parse_overwrite_flag("true"));
        assert!(!parse_overwrite_flag("1"));
        assert!(!parse_overwrite_flag(""));
    }
}
