/// Read-time behavior toggles. `Default` reproduces the literal historical
/// reader behavior exactly: list-check `0xFF` decodes to a `Missing` cell,
/// and an attribute tag outside the known set is a hard error.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// When true, a list-check row whose index is `0xFF` decodes to
    /// `Cell::String(String::new())` instead of `Cell::Missing`, matching
    /// the empty-string convention the original reader used for string
    /// columns.
    pub missing_list_check_as_empty_string: bool,

    /// When true, an attribute tag not in the known set is skipped via the
    /// same `u32 length, length bytes` shape every other attribute uses,
    /// instead of raising `UnknownAttribute`.
    pub tolerate_unknown_attributes: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            missing_list_check_as_empty_string: false,
            tolerate_unknown_attributes: false,
        }
    }
}
