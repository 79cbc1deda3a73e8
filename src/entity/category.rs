use std::collections::BTreeSet;

pub const ARMED_FORCES: &str = "armed_forces";
pub const BANK: &str = "bank";
pub const GOVERNMENT: &str = "government";
pub const HALF_DAY: &str = "half_day";
pub const OPTIONAL: &str = "optional";
pub const PUBLIC: &str = "public";
pub const SCHOOL: &str = "school";
pub const WORKDAY: &str = "workday";

/// Population order of the requested categories: the default category first
/// when requested, then the rest alphabetically.
pub fn sorted_categories(categories: &BTreeSet<String>, default_category: Option<&str>) -> Vec<String> {
    match default_category {
        Some(default) if categories.contains(default) => {
            let mut sorted = vec![default.to_owned()];
            sorted.extend(categories.iter().filter(|c| c.as_str() != default).cloned());
            sorted
        },
        _ => categories.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_category_goes_first() {
        let categories: BTreeSet<String> = [BANK, PUBLIC, SCHOOL].iter().map(|c| c.to_string()).collect();
        assert_eq!(sorted_categories(&categories, Some(PUBLIC)), vec![PUBLIC, BANK, SCHOOL]);
        assert_eq!(sorted_categories(&categories, Some(OPTIONAL)), vec![BANK, PUBLIC, SCHOOL]);
        assert_eq!(sorted_categories(&categories, None), vec![BANK, PUBLIC, SCHOOL]);
    }
}
