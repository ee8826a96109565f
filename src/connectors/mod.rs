//! One pipeline per dataset, from raw rows to a finished [`Document`].
//!
//! Connectors are pure: they take rows already read into memory and return
//! the document payload. Reading input and storing output is the CLI's job.
//!
//! [`Document`]: crate::document::Document

pub mod carbon;
pub mod co2;
pub mod covid;
pub mod ecdc;
pub mod vaccines;

/// Splits a comma separated list, dropping empty items.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_split_and_trim_list() {
        assert_eq!(
            split_list("Norway, France,,South Korea "),
            vec!["Norway", "France", "South Korea"]
        );
        assert!(split_list("").is_empty());
    }
}
